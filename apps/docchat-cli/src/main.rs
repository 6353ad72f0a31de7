//! docchat: ask questions about a folder of documents.
//!
//! Linear startup (config, documents, embeddings, index, backend client),
//! then a blocking interactive loop until the operator types "exit".

use tracing_subscriber::EnvFilter;

use docchat_core::config::AppConfig;
use docchat_engine::pipeline;

mod repl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    println!("📚 docchat");
    println!("==========");
    let engine = pipeline::build_engine(&config)?;
    if engine.chunk_count() == 0 {
        println!("⚠️  No documents indexed; answers will have no context.");
    }
    println!("Type a question, or 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl::run(&engine, stdin.lock(), stdout.lock()).await
}
