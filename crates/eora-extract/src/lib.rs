//! Page extraction: fetch a case-study page, strip it down to visible text
//! and have the LLM restructure it into `###`-sectioned Markdown.

pub mod batch;
pub mod clean;
mod page;
pub mod prompt;

pub use batch::{extract_links, into_records, LinkOutcome};
pub use clean::clean_html;
pub use page::LlmPageExtractor;
pub use prompt::restructure_prompt;
