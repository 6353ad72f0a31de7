pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A text-completion backend. The only async seam in the system.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> crate::error::Result<String>;
}

/// The surface the interactive loop talks to: one question in, one answer out.
#[async_trait::async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(&self, query: &str) -> crate::error::Result<String>;
}
