//! Retrieval-augmented answering over the EORA case-study corpus.
//!
//! [`CorpusBuilder`] turns the link list into a persistent index once;
//! [`Assistant`] then answers questions against it with retrieved context.

pub mod assistant;
pub mod corpus;
pub mod prompt;
pub mod retriever;

pub use assistant::{Answerer, Assistant};
pub use corpus::CorpusBuilder;
pub use prompt::{build_prompt, CitationStyle};
pub use retriever::{format_context, get_context, retrieve, RetrievedChunk, DEFAULT_TOP_K};
