//! Domain types shared by the loader, embedder, index, and engine.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A source file read from the docs directory, before chunking.
///
/// Owned by the loader, consumed once by the chunker; never mutated after
/// ingestion.
#[derive(Debug, Clone)]
pub struct Document {
    pub doc_id: String,
    pub path: String,
    pub text: String,
}

/// A chunk of a source document that is independently embedded and indexed.
///
/// - `id`: globally unique chunk identifier (`"<doc_id>:<chunk_index>"`)
/// - `doc_id`: stable document identity (file stem)
/// - `doc_path`: original path to the source file
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub doc_path: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// The minimal surface returned by the vector index.
///
/// `id` matches `DocumentChunk::id`. `score` is cosine similarity; higher is
/// always better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
}
