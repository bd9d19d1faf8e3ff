//! Domain types flowing through extraction, chunking and indexing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A page URL from the configured corpus list.
pub type SourceLink = String;

/// Chunk metadata. Always carries `source`; `Header` is present when the
/// chunk was opened by a `###` heading.
pub type Metadata = BTreeMap<String, String>;

pub const SOURCE_KEY: &str = "source";
pub const HEADER_KEY: &str = "Header";

/// Result of extracting one link. `text` is `None` when extraction failed.
///
/// This is also the on-disk shape of the JSON record cache:
/// `{"text": string|null, "source": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub text: Option<String>,
    pub source: SourceLink,
}

impl RawRecord {
    pub fn new(text: Option<String>, source: impl Into<String>) -> Self {
        Self { text, source: source.into() }
    }

    /// Metadata every chunk of this record inherits.
    pub fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert(SOURCE_KEY.to_string(), self.source.clone());
        meta
    }
}

/// A contiguous slice of a source document; the unit stored in and
/// retrieved from the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self { content: content.into(), metadata }
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    pub fn header(&self) -> Option<&str> {
        self.metadata.get(HEADER_KEY).map(String::as_str)
    }
}

/// A chunk returned by similarity search. Higher `score` is more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}
