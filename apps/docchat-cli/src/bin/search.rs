//! Retrieval-only debug binary: embed one query, print the scored hits,
//! exit. Useful for checking what the engine would stuff into the prompt.

use std::env;

use docchat_core::config::AppConfig;
use docchat_engine::pipeline;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--limit N]", args[0]);
        eprintln!("Example: {} 'chicken coop ventilation' --limit 5", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];
    let mut limit = 10usize;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(l) = args[i + 1].parse::<usize>() {
                        limit = l;
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    let config = AppConfig::load()?;
    println!("🔍 docchat-search\n=================");
    println!("Query: {}", query_text);
    println!("Docs directory: {}", config.docs_dir().display());

    let (embedder, index) = pipeline::build_index(&config)?;
    let query_vec = embedder.embed_batch(&[query_text.to_string()])?.remove(0);
    let hits = index.search_vec(&query_vec, limit)?;

    println!("\n🔍 Found {} results for: \"{}\"", hits.len(), query_text);
    for (i, hit) in hits.iter().enumerate() {
        if let Some(chunk) = index.chunk(&hit.id) {
            println!(
                "\n  {}. score={:.4}  id={}  path={}",
                i + 1,
                hit.score,
                hit.id,
                chunk.doc_path
            );
            println!("     📝 Content: {}", chunk.content);
        }
    }
    Ok(())
}
