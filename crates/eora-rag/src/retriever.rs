use tracing::debug;

use eora_core::traits::VectorIndex;
use eora_core::Result;

pub const DEFAULT_TOP_K: usize = 5;

const UNKNOWN_SOURCE: &str = "Источник не указан";

/// A retrieved chunk with the page it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: Option<String>,
    pub score: f32,
}

/// Top-`k` chunks for `query`, most similar first.
pub async fn retrieve(index: &dyn VectorIndex, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
    let hits = index.similarity_search_with_score(query, k).await?;
    debug!(query, hits = hits.len(), "retrieved context");
    Ok(hits
        .into_iter()
        .map(|hit| RetrievedChunk {
            source: hit.chunk.source().map(str::to_string),
            content: hit.chunk.content,
            score: hit.score,
        })
        .collect())
}

/// Renders each chunk followed by its `Источник:` line, blocks separated by a
/// blank line.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("{}\nИсточник: {}", c.content, c.source.as_deref().unwrap_or(UNKNOWN_SOURCE)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub async fn get_context(index: &dyn VectorIndex, query: &str) -> Result<String> {
    Ok(format_context(&retrieve(index, query, DEFAULT_TOP_K).await?))
}
