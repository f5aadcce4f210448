use scribe_types::{ChatMessage, Provider};

// ---------------------------------------------------------------------------
// WireRequest
// ---------------------------------------------------------------------------

/// A fully shaped outbound call: where to POST, which headers to send, and the
/// JSON body. Headers include the provider's authentication header.
#[derive(Clone)]
pub struct WireRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

impl WireRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Header values carry secrets.
impl std::fmt::Debug for WireRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(k, _)| *k).collect();
        f.debug_struct("WireRequest")
            .field("url", &self.url)
            .field("headers", &names)
            .field("body", &self.body)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Extracted
// ---------------------------------------------------------------------------

/// Outcome of pulling text out of a provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// The expected field path was present. The text may be empty.
    Text(String),
    /// The expected field path was absent somewhere along the way.
    Missing,
}

impl Extracted {
    pub fn into_text(self) -> String {
        match self {
            Extracted::Text(text) => text,
            Extracted::Missing => String::new(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Extracted::Missing)
    }
}

/// Joins the string `text` field of each part with newlines and trims the
/// result. Parts without a string `text` contribute an empty line.
pub(crate) fn join_part_texts(parts: &[serde_json::Value]) -> String {
    parts
        .iter()
        .map(|p| p["text"].as_str().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// ProviderAdapter
// ---------------------------------------------------------------------------

/// Per-provider translation between the canonical conversation and the
/// provider's wire shapes. Both methods are pure.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;
    fn model(&self) -> &str;
    fn build_request(&self, conversation: &[ChatMessage]) -> WireRequest;
    fn extract_text(&self, body: &serde_json::Value) -> Extracted;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
