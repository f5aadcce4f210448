//! HTTP surface for the chat gateway.
//!
//! Exposes `POST /api/ai` taking `{provider, chatHistory}` and answering with
//! `{text}` or `{error, details}`, plus a `GET /healthz` liveness probe.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use scribe_llm::ChatGateway;
use scribe_types::{GatewayError, InboundChatRequest};

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state accessible from Axum routes.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
}

/// Builds the router. `allowed_origin` is a single origin, or `*` for any.
pub fn router(gateway: Arc<ChatGateway>, allowed_origin: &str) -> anyhow::Result<Router> {
    let origin = if allowed_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(allowed_origin.trim())?)
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/api/ai", post(chat))
        .route("/healthz", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { gateway }))
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let inbound = match parse_inbound(&body) {
        Ok(inbound) => inbound,
        Err(message) => {
            tracing::warn!(%message, "rejecting malformed chat body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON body", "details": message })),
            )
                .into_response();
        }
    };

    match state.gateway.handle_inbound(&inbound).await {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => error_response(&err),
    }
}

/// An empty body counts as `{}`; anything else must be a JSON object.
fn parse_inbound(body: &[u8]) -> Result<InboundChatRequest, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InboundChatRequest::default());
    }
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn error_response(err: &GatewayError) -> Response {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.to_body())).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
