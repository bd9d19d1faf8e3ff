use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, warn};

use eora_core::config::LlmSettings;
use eora_core::traits::LlmClient;
use eora_core::{Error, Result};

use crate::wire::{parse_completion_response, parse_token_response, ChatRequest};

/// HTTP client for the GigaChat OAuth and completion endpoints.
///
/// One `reqwest::Client` serves every token and completion call.
pub struct GigaChatClient {
    settings: LlmSettings,
    http: Client,
}

impl GigaChatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if settings.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for the LLM endpoints");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build LLM HTTP client: {e}")))?;
        Ok(Self { settings: settings.clone(), http })
    }

    pub fn settings(&self) -> &LlmSettings { &self.settings }
}

#[async_trait]
impl LlmClient for GigaChatClient {
    async fn get_token(&self, secret: &str) -> Result<String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("rquid"),
            HeaderValue::from_str(&self.settings.rq_uid).map_err(|e| Error::Auth(format!("invalid RqUID: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", secret.trim()))
                .map_err(|e| Error::Auth(format!("invalid client secret: {e}")))?,
        );

        let resp = self
            .http
            .post(&self.settings.auth_url)
            .headers(headers)
            .body(format!("scope={}", self.settings.scope))
            .send()
            .await
            .map_err(|e| Error::Auth(format!("could not reach {}: {e}", self.settings.auth_url)))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Auth(format!("token response unreadable: {e}")))?;
        if !status.is_success() {
            return Err(Error::Auth(format!("token endpoint returned {status}: {body}")));
        }
        debug!("obtained LLM access token");
        parse_token_response(&body)
    }

    async fn get_answer(&self, prompt: &str, token: &str) -> Result<String> {
        let request = ChatRequest::user_prompt(&self.settings, prompt);
        let resp = self
            .http
            .post(&self.settings.chat_url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("could not reach {}: {e}", self.settings.chat_url)))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Completion(format!("completion response unreadable: {e}")))?;
        if !status.is_success() {
            return Err(Error::Completion(format!("completion endpoint returned {status}: {body}")));
        }
        debug!(prompt_chars = prompt.chars().count(), "received completion");
        parse_completion_response(&body)
    }
}
