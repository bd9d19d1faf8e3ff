use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use eora_core::traits::{LlmClient, VectorIndex};
use eora_core::Result;

use crate::prompt::{answer, CitationStyle};
use crate::retriever::{format_context, retrieve};

/// Anything that can answer a user's question. Front ends only see this.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String>;
}

/// Question answering over a built index.
pub struct Assistant {
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LlmClient>,
    secret: String,
    style: CitationStyle,
    top_k: usize,
}

impl Assistant {
    pub fn new(index: Arc<dyn VectorIndex>, llm: Arc<dyn LlmClient>, secret: impl Into<String>) -> Self {
        Self { index, llm, secret: secret.into(), style: CitationStyle::default(), top_k: crate::DEFAULT_TOP_K }
    }

    pub fn with_style(mut self, style: CitationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl Answerer for Assistant {
    /// Retrieves context, fetches a fresh token, then asks the model.
    async fn ask(&self, question: &str) -> Result<String> {
        let chunks = retrieve(self.index.as_ref(), question, self.top_k).await?;
        let context = format_context(&chunks);
        debug!(chunks = chunks.len(), context_chars = context.chars().count(), "assembled context");
        let token = self.llm.get_token(&self.secret).await?;
        let reply = answer(self.llm.as_ref(), &context, question, &token, self.style).await?;
        info!(question_chars = question.chars().count(), answer_chars = reply.chars().count(), "answered question");
        Ok(reply)
    }
}
