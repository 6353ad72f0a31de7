//! The query engine: embed the question, retrieve the closest chunks,
//! assemble the QA prompt, and ask the generation backend.

use async_trait::async_trait;

use docchat_core::error::{Error, Result};
use docchat_core::traits::{AnswerEngine, Embedder, Generator};
use docchat_core::types::{DocumentChunk, SearchHit};
use docchat_vector::MemoryVectorIndex;

pub mod pipeline;
pub mod prompt;

use prompt::ContextSnippet;

pub struct QueryEngine {
    embedder: Box<dyn Embedder>,
    index: MemoryVectorIndex,
    generator: Box<dyn Generator>,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(
        embedder: Box<dyn Embedder>,
        index: MemoryVectorIndex,
        generator: Box<dyn Generator>,
        top_k: usize,
    ) -> Self {
        Self { embedder, index, generator, top_k }
    }

    /// Retrieve the chunks most similar to `query`, without generation.
    pub fn retrieve(&self, query: &str) -> Result<Vec<(SearchHit, &DocumentChunk)>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("query is empty".to_string()));
        }
        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Embedding(e.to_string()))?
            .remove(0);
        let hits = self
            .index
            .search_vec(&query_vec, self.top_k)
            .map_err(|e| Error::Index(e.to_string()))?;
        let mut resolved = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(chunk) = self.index.chunk(&hit.id) {
                resolved.push((hit, chunk));
            }
        }
        Ok(resolved)
    }

    /// Answer one question: retrieve, build the prompt, generate.
    ///
    /// Zero retrieved chunks is not an error; the prompt simply carries an
    /// empty context section.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let retrieved = self.retrieve(query)?;
        tracing::debug!("Retrieved {} chunks for query", retrieved.len());

        let contexts: Vec<ContextSnippet> = retrieved
            .iter()
            .map(|(_, chunk)| ContextSnippet {
                source: chunk.doc_path.clone(),
                text: chunk.content.clone(),
            })
            .collect();
        let prompt = prompt::build_qa_prompt(query.trim(), &contexts);
        self.generator.generate(&prompt).await
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }
}

#[async_trait]
impl AnswerEngine for QueryEngine {
    async fn answer(&self, query: &str) -> Result<String> {
        QueryEngine::answer(self, query).await
    }
}
