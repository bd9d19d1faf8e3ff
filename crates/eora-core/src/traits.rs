use async_trait::async_trait;

use crate::error::Result;
use crate::types::ScoredChunk;

/// Text embedding model. Implementations return L2-normalized vectors of
/// length `dim()`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| crate::Error::Embedding("embedder returned no vector".to_string()))
    }
}

/// OAuth token + chat-completion client for the remote LLM service.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn get_token(&self, secret: &str) -> Result<String>;
    async fn get_answer(&self, prompt: &str, token: &str) -> Result<String>;
}

/// Turns a page URL into structured Markdown.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String>;
}

/// Read side of the persistent vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embeds `query` with the index's embedder and returns up to `k` chunks,
    /// most similar first.
    async fn similarity_search_with_score(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;
}
