use thiserror::Error;

/// Failure taxonomy shared by every stage of the pipeline.
///
/// Extraction failures (`Fetch`, and `Auth`/`Completion` raised while
/// restructuring a page) are degraded per link by the caller. Query-time
/// `Auth`/`Completion` failures are turned into user-visible messages by the
/// front ends. `Index` and `Embedding` failures abort startup.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("token request failed: {0}")]
    Auth(String),

    #[error("chat completion failed: {0}")]
    Completion(String),

    #[error("vector index failure: {0}")]
    Index(String),

    #[error("embedding failure: {0}")]
    Embedding(String),

    #[error("record cache {path}: {reason}")]
    Cache { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch { url: url.into(), reason: reason.to_string() }
    }

    pub fn cache(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Cache { path: path.display().to_string(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
