//! HTTP collaborator tests against a mock server

use std::time::Duration;
use viewmode_core::{
    ChatMessage, CompletionBackend, MetadataLookup, OembedClient, OpenAiBackend, OpenAiSettings,
};
use wiremock::{
    matchers::{bearer_token, body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn settings_for(server: &MockServer) -> OpenAiSettings {
    let mut settings = OpenAiSettings::new("test-key", "gpt-4.1-mini");
    settings.base_url = format!("{}/v1", server.uri());
    settings.timeout = Duration::from_secs(5);
    settings
}

fn prompt() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("classify"),
        ChatMessage::user("Lakers vs Warriors Highlights"),
    ]
}

#[tokio::test]
async fn test_completion_returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4.1-mini",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"picture_mode\":\"Sports\",\"audio_profile\":\"Sport\"}"
                },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(settings_for(&server)).unwrap();
    let text = backend.complete(&prompt()).await.unwrap();

    assert_eq!(text, r#"{"picture_mode":"Sports","audio_profile":"Sport"}"#);
}

#[tokio::test]
async fn test_completion_sends_configured_temperature() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"temperature": 0.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "{}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.temperature = Some(0.0);
    let backend = OpenAiBackend::new(settings).unwrap();

    assert_eq!(backend.complete(&prompt()).await.unwrap(), "{}");
}

#[tokio::test]
async fn test_completion_non_success_status_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(settings_for(&server)).unwrap();
    let err = backend.complete(&prompt()).await.unwrap_err();

    assert_eq!(err.kind(), "backend");
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_completion_without_content_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(settings_for(&server)).unwrap();
    assert!(backend.complete(&prompt()).await.is_err());
}

#[tokio::test]
async fn test_completion_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.timeout = Duration::from_millis(100);
    let backend = OpenAiBackend::new(settings).unwrap();

    let err = backend.complete(&prompt()).await.unwrap_err();
    assert_eq!(err.kind(), "timeout", "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_oembed_resolves_title_and_channel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oembed"))
        .and(query_param("url", "https://youtu.be/abcdef"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "UFC 310 Highlights: Best Knockouts",
            "author_name": "UFC",
            "thumbnail_url": "https://i.ytimg.com/vi/abcdef/hqdefault.jpg"
        })))
        .mount(&server)
        .await;

    let client =
        OembedClient::new(format!("{}/oembed", server.uri()), Duration::from_secs(2)).unwrap();
    let meta = client
        .lookup("https://youtu.be/abcdef")
        .await
        .unwrap()
        .expect("metadata");

    assert_eq!(meta.title, "UFC 310 Highlights: Best Knockouts");
    assert_eq!(meta.author_name.as_deref(), Some("UFC"));
    assert!(meta.prompt_text().contains("CHANNEL: UFC"));
}

#[tokio::test]
async fn test_oembed_missing_title_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oembed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"title": "  "})),
        )
        .mount(&server)
        .await;

    let client =
        OembedClient::new(format!("{}/oembed", server.uri()), Duration::from_secs(2)).unwrap();
    assert_eq!(client.lookup("https://youtu.be/x").await.unwrap(), None);
}

#[tokio::test]
async fn test_oembed_not_found_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oembed"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client =
        OembedClient::new(format!("{}/oembed", server.uri()), Duration::from_secs(2)).unwrap();
    assert!(client.lookup("https://youtu.be/private").await.is_err());
}
