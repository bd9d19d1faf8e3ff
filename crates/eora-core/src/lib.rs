//! Shared domain types, error taxonomy, seam traits and configuration for the
//! EORA case-study assistant.

pub mod cache;
pub mod chunker;
pub mod config;
pub mod error;
pub mod links;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{Chunk, Metadata, RawRecord, ScoredChunk};
