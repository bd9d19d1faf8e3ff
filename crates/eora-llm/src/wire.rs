//! Request and response bodies of the GigaChat HTTP API.
//!
//! Parsing lives in plain functions so the response handling can be tested
//! without a network.

use serde::{Deserialize, Serialize};

use eora_core::config::LlmSettings;
use eora_core::{Error, Result};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub top_p: f32,
    pub n: u32,
    pub stream: bool,
    pub max_tokens: u32,
    pub repetition_penalty: f32,
}

impl<'a> ChatRequest<'a> {
    /// Single user turn carrying `prompt`, sampling parameters from settings.
    pub fn user_prompt(settings: &'a LlmSettings, prompt: &'a str) -> Self {
        Self {
            model: &settings.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: settings.temperature,
            top_p: settings.top_p,
            n: 1,
            stream: false,
            max_tokens: settings.max_tokens,
            repetition_penalty: settings.repetition_penalty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Extracts `access_token` from the OAuth endpoint's JSON body.
pub fn parse_token_response(body: &str) -> Result<String> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| Error::Auth(format!("malformed token response: {e}")))?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::Auth("token response has no access_token".to_string())),
    }
}

/// Extracts `choices[0].message.content` from a completion body.
pub fn parse_completion_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Completion(format!("malformed completion response: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Completion("completion response has no choices".to_string()))
}
