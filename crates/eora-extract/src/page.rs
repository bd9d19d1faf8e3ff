use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use eora_core::config::ExtractSettings;
use eora_core::traits::{LlmClient, PageExtractor};
use eora_core::{Error, Result};

use crate::clean::clean_html;
use crate::prompt::restructure_prompt;

/// Fetches a page, cleans it and asks the LLM for a Markdown rendition.
///
/// A fresh token is requested for every page.
pub struct LlmPageExtractor {
    http: Client,
    llm: Arc<dyn LlmClient>,
    secret: String,
}

impl LlmPageExtractor {
    pub fn new(settings: &ExtractSettings, llm: Arc<dyn LlmClient>, secret: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &settings.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build page HTTP client: {e}")))?;
        Ok(Self { http, llm, secret: secret.into() })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.http.get(url).send().await.map_err(|e| Error::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {status}")));
        }
        resp.text().await.map_err(|e| Error::fetch(url, e))
    }
}

#[async_trait]
impl PageExtractor for LlmPageExtractor {
    async fn extract(&self, url: &str) -> Result<String> {
        let html = self.fetch(url).await?;
        let text = clean_html(&html);
        debug!(url, html_bytes = html.len(), text_chars = text.chars().count(), "cleaned page");
        let token = self.llm.get_token(&self.secret).await?;
        self.llm.get_answer(&restructure_prompt(&text), &token).await
    }
}
