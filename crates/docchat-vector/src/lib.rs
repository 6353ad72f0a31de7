//! In-memory vector index over document chunks.
//!
//! Thin wrapper around an HNSW graph with cosine distance. The index is
//! built exactly once from the full chunk set and never updated afterwards;
//! every run of the application rebuilds it from scratch.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use hnsw_rs::hnsw::{Hnsw, Neighbour};
use hnsw_rs::prelude::*;

use docchat_core::types::{ChunkId, DocumentChunk, SearchHit};

// HNSW construction parameters. M and ef tuned for corpora in the
// hundreds-to-tens-of-thousands of chunks range.
const MAX_NB_CONNECTION: usize = 16;
const NB_LAYER: usize = 16;
const EF_CONSTRUCTION: usize = 200;

pub struct MemoryVectorIndex {
    hnsw: Hnsw<'static, f32, DistCosine>,
    chunks: Vec<DocumentChunk>,
    by_id: HashMap<ChunkId, usize>,
    dim: usize,
}

impl MemoryVectorIndex {
    /// Build the index from chunks and their embeddings (parallel slices).
    ///
    /// Zero chunks is valid and yields an empty, searchable index.
    pub fn build(chunks: Vec<DocumentChunk>, embeddings: &[Vec<f32>], dim: usize) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(anyhow!(
                "Chunk/embedding count mismatch: {} chunks, {} embeddings",
                chunks.len(),
                embeddings.len()
            ));
        }
        for (i, emb) in embeddings.iter().enumerate() {
            if emb.len() != dim {
                return Err(anyhow!(
                    "Embedding {} has wrong dimension: expected {}, got {}",
                    i,
                    dim,
                    emb.len()
                ));
            }
            if emb.iter().any(|v| !v.is_finite()) {
                return Err(anyhow!("Embedding {} contains NaN or infinite values", i));
            }
        }

        let mut hnsw: Hnsw<f32, DistCosine> = Hnsw::new(
            MAX_NB_CONNECTION,
            chunks.len().max(1),
            NB_LAYER,
            EF_CONSTRUCTION,
            DistCosine,
        );
        let mut by_id = HashMap::with_capacity(chunks.len());
        for (pos, (chunk, emb)) in chunks.iter().zip(embeddings.iter()).enumerate() {
            let normalized = normalize_vector(emb);
            hnsw.insert((&normalized, pos));
            // Hits resolve through this map, so a duplicate id would silently
            // shadow another chunk's text.
            if by_id.insert(chunk.id.clone(), pos).is_some() {
                return Err(anyhow!("Duplicate chunk id: {}", chunk.id));
            }
        }
        hnsw.set_searching_mode(true);
        tracing::info!("Built vector index over {} chunks (dim {})", chunks.len(), dim);

        Ok(Self { hnsw, chunks, by_id, dim })
    }

    /// k-NN search. Scores are cosine similarity, sorted highest first.
    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.dim {
            return Err(anyhow!(
                "Query has wrong dimension: expected {}, got {}",
                self.dim,
                query_vec.len()
            ));
        }
        if query_vec.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!("Query vector contains NaN or infinite values"));
        }
        if self.chunks.is_empty() || k == 0 {
            return Ok(vec![]);
        }

        let normalized = normalize_vector(query_vec);
        let ef_search = (k * 2).max(50);
        let neighbours: Vec<Neighbour> = self.hnsw.search(&normalized, k.min(self.chunks.len()), ef_search);

        let mut hits: Vec<SearchHit> = neighbours
            .into_iter()
            .filter_map(|n| {
                self.chunks.get(n.d_id).map(|chunk| SearchHit {
                    id: chunk.id.clone(),
                    score: 1.0 - n.distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(hits)
    }

    /// Resolve a hit back to its chunk.
    pub fn chunk(&self, id: &str) -> Option<&DocumentChunk> {
        self.by_id.get(id).and_then(|&pos| self.chunks.get(pos))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn normalize_vector(vector: &[f32]) -> Vec<f32> {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return vector.to_vec();
    }
    vector.iter().map(|&x| x / magnitude).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_vector_unit_length() {
        let v = vec![3.0, 4.0];
        let normalized = normalize_vector(&v);
        assert!((normalized[0] - 0.6).abs() < 0.001);
        assert!((normalized[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn normalize_zero_vector_is_identity() {
        let v = vec![0.0, 0.0, 0.0];
        assert_eq!(normalize_vector(&v), vec![0.0, 0.0, 0.0]);
    }
}
