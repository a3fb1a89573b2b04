// tests/generation_failures.rs
// The generation client never panics or errors outward: every failure mode
// collapses to None.

use anyhow::anyhow;
use kona_news::config::ModelKind;
use kona_news::generate::client::GenerationClient;
use kona_news::generate::prompt::GenerationRequest;
use kona_news::generate::provider::MockProvider;

fn request() -> GenerationRequest {
    GenerationRequest {
        news_summary: "Title: t\nDescription: d\nSource: s".to_string(),
        sources: vec!["https://example.test/1".to_string()],
    }
}

fn client_with(responses: Vec<anyhow::Result<String>>) -> GenerationClient {
    GenerationClient::new(
        Box::new(MockProvider::new(responses)),
        ModelKind::Claude,
        10,
    )
}

#[tokio::test]
async fn empty_response_text_is_none() {
    let client = client_with(vec![Ok(String::new())]);
    assert!(client.generate(&request()).await.is_none());
}

#[tokio::test]
async fn non_json_response_is_none() {
    let client = client_with(vec![Ok("plain prose, no json".to_string())]);
    assert!(client.generate(&request()).await.is_none());
}

#[tokio::test]
async fn malformed_fenced_block_is_none() {
    let client = client_with(vec![Ok("```json\n{\"title\": \"broken\"".to_string())]);
    assert!(client.generate(&request()).await.is_none());
}

#[tokio::test]
async fn transport_error_is_none() {
    let client = client_with(vec![Err(anyhow!("dns failure"))]);
    assert!(client.generate(&request()).await.is_none());
}

#[tokio::test]
async fn fenced_valid_payload_is_some() {
    let client = client_with(vec![Ok(
        "```json\n{\"title\":\"t\",\"content\":\"c\"}\n```".to_string()
    )]);
    let payload = client.generate(&request()).await.expect("payload");
    assert_eq!(payload.title, "t");
    assert_eq!(payload.content, "c");
}
