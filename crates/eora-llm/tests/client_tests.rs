use eora_core::config::LlmSettings;
use eora_core::traits::LlmClient;
use eora_core::Error;
use eora_llm::GigaChatClient;

fn unreachable_settings() -> LlmSettings {
    LlmSettings {
        auth_url: "http://127.0.0.1:9/oauth".to_string(),
        chat_url: "http://127.0.0.1:9/chat".to_string(),
        timeout_secs: Some(2),
        ..LlmSettings::default()
    }
}

#[test]
fn builds_with_relaxed_tls() {
    let settings = LlmSettings { accept_invalid_certs: true, ..LlmSettings::default() };
    let client = GigaChatClient::new(&settings).expect("client");
    assert!(client.settings().accept_invalid_certs);
}

#[tokio::test]
async fn unreachable_auth_endpoint_is_an_auth_error() {
    let client = GigaChatClient::new(&unreachable_settings()).expect("client");
    let err = client.get_token("c2VjcmV0").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_chat_endpoint_is_a_completion_error() {
    let client = GigaChatClient::new(&unreachable_settings()).expect("client");
    let err = client.get_answer("вопрос", "token").await.unwrap_err();
    assert!(matches!(err, Error::Completion(_)), "got {err:?}");
}

#[tokio::test]
async fn secret_with_newline_is_rejected_before_sending() {
    let client = GigaChatClient::new(&unreachable_settings()).expect("client");
    let err = client.get_token("abc\ndef").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}
