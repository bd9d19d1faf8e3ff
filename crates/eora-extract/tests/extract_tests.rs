use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eora_core::config::ExtractSettings;
use eora_core::traits::{LlmClient, PageExtractor};
use eora_core::{Error, Result};
use eora_extract::{extract_links, into_records, LlmPageExtractor};

struct ScriptedExtractor {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl PageExtractor for ScriptedExtractor {
    async fn extract(&self, url: &str) -> Result<String> {
        self.seen.lock().expect("lock").push(url.to_string());
        if url.contains("broken") {
            return Err(Error::fetch(url, "HTTP 500"));
        }
        Ok(format!("### Проект: {url}"))
    }
}

struct CountingLlm {
    calls: AtomicUsize,
}

#[async_trait]
impl LlmClient for CountingLlm {
    async fn get_token(&self, _secret: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("token".to_string())
    }
    async fn get_answer(&self, _prompt: &str, _token: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("### Проект".to_string())
    }
}

fn links() -> Vec<String> {
    ["https://eora.ru/cases/a", "https://eora.ru/cases/broken", "https://eora.ru/cases/c"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[tokio::test]
async fn failed_link_does_not_stop_the_batch() {
    let extractor = ScriptedExtractor { seen: Mutex::new(Vec::new()) };
    let outcomes = extract_links(&extractor, &links()).await;

    assert_eq!(*extractor.seen.lock().expect("lock"), links(), "links are visited in order");
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[1].result.is_err());

    let records = into_records(outcomes);
    let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, ["https://eora.ru/cases/a", "https://eora.ru/cases/broken", "https://eora.ru/cases/c"]);
    assert_eq!(records[0].text.as_deref(), Some("### Проект: https://eora.ru/cases/a"));
    assert!(records[1].text.is_none());
    assert!(records[2].text.is_some());
}

#[tokio::test]
async fn empty_link_list_yields_no_records() {
    let extractor = ScriptedExtractor { seen: Mutex::new(Vec::new()) };
    let records = into_records(extract_links(&extractor, &[]).await);
    assert!(records.is_empty());
}

#[tokio::test]
async fn unreachable_page_fails_before_calling_the_llm() {
    let llm = Arc::new(CountingLlm { calls: AtomicUsize::new(0) });
    let settings = ExtractSettings { timeout_secs: Some(2), user_agent: Some("eora-test".to_string()) };
    let extractor = LlmPageExtractor::new(&settings, llm.clone(), "secret").expect("extractor");

    let err = extractor.extract("http://127.0.0.1:9/cases/x").await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }), "got {err:?}");
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}
