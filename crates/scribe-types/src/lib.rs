//! Shared types and errors for the Scribe chat proxy.
//!
//! This crate provides the foundational types used by the other Scribe crates:
//! - `GatewayError`: the uniform failure contract handed back to callers
//! - `ChatMessage` / `ChatRequest` / `ChatReply`: the canonical conversation
//! - `InboundChatRequest`: the loosely-typed JSON the browser sends
//! - `coerce_content`: turns any JSON value into a plain message string

mod chat;

pub use chat::*;

use serde::Serialize;

/// Unified error type for a single gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The selected provider has no secret configured. Raised before any
    /// network activity; other providers stay usable.
    #[error("Missing {env_var} in backend env")]
    Configuration {
        provider: Provider,
        env_var: &'static str,
    },

    /// The provider answered with a non-2xx status (`status` is `Some`) or the
    /// transport failed before a status was received (`status` is `None`).
    #[error("{provider} request failed{}", fmt_status(.status))]
    Upstream {
        provider: Provider,
        status: Option<u16>,
        details: serde_json::Value,
    },
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" with HTTP {s}")).unwrap_or_default()
}

/// Status used when the upstream never produced one.
pub const GENERIC_SERVER_ERROR: u16 = 500;

impl GatewayError {
    /// The provider the failing request targeted.
    pub fn provider(&self) -> Provider {
        match self {
            GatewayError::Configuration { provider, .. } | GatewayError::Upstream { provider, .. } => {
                *provider
            }
        }
    }

    /// Maps the error to the HTTP status returned to the caller.
    pub fn http_status(&self) -> u16 {
        match self {
            GatewayError::Configuration { .. } => GENERIC_SERVER_ERROR,
            GatewayError::Upstream { status, .. } => status.unwrap_or(GENERIC_SERVER_ERROR),
        }
    }

    /// Operator-facing diagnostic payload, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            GatewayError::Configuration { .. } => None,
            GatewayError::Upstream { details, .. } => Some(details),
        }
    }

    /// Short message placed in the `error` field of the response body.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Configuration { .. } => self.to_string(),
            GatewayError::Upstream { .. } => "AI request failed".to_string(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
            details: self.details().cloned(),
        }
    }
}

/// JSON body written for every failed call: `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A convenience alias for `Result<T, GatewayError>`.
pub type Result<T> = std::result::Result<T, GatewayError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
