// Provider HTTP tests against a mock upstream
// Author: kelexine (https://github.com/kelexine)

use medcot::config::{HttpConfig, HuggingFaceConfig, OpenAiConfig};
use medcot::diagnosis::{render_error, DiagnosisResult};
use medcot::error::{DiagnosisError, ErrorClass};
use medcot::providers::{build_http_client, HuggingFaceProvider, OpenAiProvider, VisionProvider};
use medcot::vision::NormalizedImage;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn tiny_image() -> NormalizedImage {
    NormalizedImage {
        name: "scan.jpg".to_string(),
        width: 2,
        height: 2,
        data: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
    }
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn openai(endpoint: String, api_key: Option<&str>) -> OpenAiProvider {
    let config = OpenAiConfig {
        endpoint,
        api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    OpenAiProvider::new(&config, build_http_client(&HttpConfig::default()).unwrap())
}

fn huggingface(base_url: String, api_key: Option<&str>) -> HuggingFaceProvider {
    let config = HuggingFaceConfig {
        router_base_url: base_url,
        api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    HuggingFaceProvider::new(&config, build_http_client(&HttpConfig::default()).unwrap())
}

#[tokio::test]
async fn test_openai_sends_image_and_returns_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "gpt-4o", "max_tokens": 1000})),
            Matcher::Regex("data:image/jpeg;base64,/9j/4AAQ".to_string()),
            Matcher::Regex("\"type\":\"image_url\"".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("肺部未见异常\n建议随访"))
        .create_async()
        .await;

    let provider = openai(format!("{}/v1/chat/completions", server.url()), Some("sk-test-key"));
    let text = provider.send(&tiny_image(), "describe").await.unwrap();

    mock.assert_async().await;
    assert_eq!(text, "肺部未见异常\n建议随访");

    let result = DiagnosisResult::from_response(&text, Duration::from_millis(1200));
    assert_eq!(result.summary, "肺部未见异常\n\n⏱️ 响应时间：1.2 秒");
    assert_eq!(result.reasoning, "建议随访");
}

#[tokio::test]
async fn test_openai_unauthorized_surfaces_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let body = "{\"error\":{\"message\":\"Incorrect API key provided\"}}";
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(body)
        .create_async()
        .await;

    let provider = openai(format!("{}/v1/chat/completions", server.url()), Some("sk-wrong"));
    let err = provider.send(&tiny_image(), "describe").await.unwrap_err();

    mock.assert_async().await;
    match &err {
        DiagnosisError::Provider {
            status,
            status_text,
            body: returned,
        } => {
            assert_eq!(*status, 401);
            assert_eq!(status_text, "Unauthorized");
            assert_eq!(returned, body);
        }
        other => panic!("expected provider error, got {:?}", other),
    }

    let rendered = DiagnosisResult::from_error(&err);
    assert!(rendered.summary.contains("401"));
    assert!(rendered.reasoning.is_empty());
}

#[tokio::test]
async fn test_missing_credential_skips_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let provider = openai(format!("{}/v1/chat/completions", server.url()), None);
    assert!(!provider.has_credential());

    let err = provider.send(&tiny_image(), "describe").await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.class(), ErrorClass::Auth);
    assert!(render_error(&err).contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_empty_content_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(""))
        .create_async()
        .await;

    let provider = openai(format!("{}/v1/chat/completions", server.url()), Some("sk-test-key"));
    let text = provider.send(&tiny_image(), "describe").await.unwrap();
    assert_eq!(text, "");

    let result = DiagnosisResult::from_response(&text, Duration::from_secs(1));
    assert!(result.summary.starts_with("（无响应内容）"));
}

#[tokio::test]
async fn test_malformed_body_is_network_class() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let provider = openai(format!("{}/v1/chat/completions", server.url()), Some("sk-test-key"));
    let err = provider.send(&tiny_image(), "describe").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Network);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let provider = openai(
        "http://127.0.0.1:1/v1/chat/completions".to_string(),
        Some("sk-test-key"),
    );
    let err = provider.send(&tiny_image(), "describe").await.unwrap_err();
    assert!(matches!(err, DiagnosisError::Network(_)));
}

#[tokio::test]
async fn test_huggingface_routes_through_inference_provider() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/nebius/v1/chat/completions")
        .match_header("authorization", "Bearer hf_testtoken123")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "llava-hf/llava-1.5-13b-hf"})),
            Matcher::Regex("data:image/jpeg;base64,".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("1. 左下肺结节\n2. 建议增强CT"))
        .create_async()
        .await;

    let provider = huggingface(server.url(), Some("hf_testtoken123"));
    assert_eq!(
        provider.endpoint(),
        format!("{}/nebius/v1/chat/completions", server.url())
    );

    let text = provider.send(&tiny_image(), "请分析").await.unwrap();

    mock.assert_async().await;
    assert_eq!(text, "1. 左下肺结节\n2. 建议增强CT");
}

#[tokio::test]
async fn test_huggingface_server_error_passthrough() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/nebius/v1/chat/completions")
        .with_status(503)
        .with_body("model is loading")
        .create_async()
        .await;

    let provider = huggingface(server.url(), Some("hf_testtoken123"));
    let err = provider.send(&tiny_image(), "请分析").await.unwrap_err();

    let rendered = render_error(&err);
    assert_eq!(rendered, "❌ 请求失败：503 Service Unavailable\nmodel is loading");
}
