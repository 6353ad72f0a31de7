//! One-shot setup pipeline: load documents -> chunk -> embed -> build index.
//!
//! Runs once at startup; any failure here propagates and terminates the
//! process. The index lives in memory for the lifetime of the run.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use docchat_core::config::AppConfig;
use docchat_core::loader::DocumentLoader;
use docchat_core::traits::Embedder;
use docchat_embed::default_embedder;
use docchat_llm::OllamaClient;
use docchat_vector::MemoryVectorIndex;

use crate::QueryEngine;

const EMBED_BATCH_SIZE: usize = 32;

/// Load the docs directory and build the in-memory index over it.
pub fn build_index(config: &AppConfig) -> Result<(Box<dyn Embedder>, MemoryVectorIndex)> {
    let docs_dir = config.docs_dir();
    println!("Loading documents from {}", docs_dir.display());

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(&docs_dir)?;
    println!("Loaded {} chunks", chunks.len());

    let embedder = default_embedder(&config.embedding)?;
    let embeddings = embed_chunks(&*embedder, &chunks)?;

    let index = MemoryVectorIndex::build(chunks, &embeddings, embedder.dim())?;
    println!("✅ Index ready ({} chunks)", index.len());
    Ok((embedder, index))
}

/// The full linear setup: index plus generation backend.
pub fn build_engine(config: &AppConfig) -> Result<QueryEngine> {
    let (embedder, index) = build_index(config)?;
    let generator = OllamaClient::new(&config.llm)?;
    println!("Language model: {} at {}", config.llm.model, config.llm.base_url);
    Ok(QueryEngine::new(
        embedder,
        index,
        Box::new(generator),
        config.retrieval.top_k,
    ))
}

fn embed_chunks(
    embedder: &dyn Embedder,
    chunks: &[docchat_core::types::DocumentChunk],
) -> Result<Vec<Vec<f32>>> {
    if chunks.is_empty() {
        return Ok(vec![]);
    }
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let mut embeddings = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        embeddings.extend(embedder.embed_batch(&texts)?);
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("embeddings computed");
    Ok(embeddings)
}
