//! HTTP-level tests for `/api/ai`, driving the router in-process against
//! wiremock provider servers.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scribe_llm::{ChatGateway, GatewayConfig, ProviderSettings};
use scribe_types::Provider;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ORIGIN: &str = "http://localhost:3000";

fn app(config: GatewayConfig) -> Router {
    scribe_proxy::router(Arc::new(ChatGateway::new(&config)), ORIGIN).expect("router")
}

fn all_providers(server: &MockServer) -> GatewayConfig {
    let settings = |p: Provider| {
        ProviderSettings::defaults_for(p)
            .with_api_key("test-key")
            .with_base_url(server.uri())
    };
    GatewayConfig {
        openai: settings(Provider::OpenAi),
        anthropic: settings(Provider::Anthropic),
        google: settings(Provider::Google),
    }
}

fn post_ai(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/ai")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, ORIGIN)
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "My text is currently empty."},
                {"role": "user", "content": "Help me start"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "Start with a question."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = json!({
        "provider": "claude",
        "chatHistory": [
            {"role": "user", "content": "My text is currently empty."},
            {"role": "user", "content": "Help me start"}
        ]
    });
    let (status, value) = send(app(all_providers(&server)), post_ai(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"text": "Start with a question."}));
}

#[tokio::test]
async fn empty_body_goes_to_default_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Hi!"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, value) = send(app(all_providers(&server)), post_ai(Body::empty())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["text"], "Hi!");
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let (status, value) = send(app(GatewayConfig::default()), post_ai("{oops")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], "Invalid JSON body");
    assert!(value["details"].is_string());
}

#[tokio::test]
async fn missing_key_reports_configuration_error() {
    let body = json!({"provider": "gemini", "chatHistory": [{"role": "user", "content": "Hi"}]});
    let (status, value) = send(app(GatewayConfig::default()), post_ai(body.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value, json!({"error": "Missing GEMINI_KEY in backend env"}));
}

#[tokio::test]
async fn upstream_failure_keeps_status_and_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"type": "rate_limit_error", "message": "slow down"}
        })))
        .mount(&server)
        .await;

    let body = json!({"provider": "chatgpt", "chatHistory": [{"role": "user", "content": "Hi"}]});
    let (status, value) = send(app(all_providers(&server)), post_ai(body.to_string())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(value["error"], "AI request failed");
    assert_eq!(value["details"]["error"]["message"], "slow down");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let big = "x".repeat(scribe_proxy::MAX_BODY_BYTES + 1);
    let body = json!({"chatHistory": [{"role": "user", "content": big}]});
    let resp = app(GatewayConfig::default())
        .oneshot(post_ai(body.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/ai")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app(GatewayConfig::default()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ORIGIN
    );
}

#[tokio::test]
async fn healthz_is_ok() {
    let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let resp = app(GatewayConfig::default()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
