use serde_json::json;

use crate::provider::join_part_texts;
use crate::{Extracted, ProviderAdapter, ProviderSettings, WireRequest};
use scribe_types::{coerce_content, ChatMessage, Provider};

// ---------------------------------------------------------------------------
// OpenAiAdapter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OpenAiAdapter {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiAdapter {
    pub fn new(api_key: String) -> Self {
        let defaults = ProviderSettings::defaults_for(Provider::OpenAi);
        Self {
            api_key,
            base_url: defaults.base_url,
            model: defaults.model,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Returns `None` when the settings carry no secret.
    pub fn from_settings(settings: &ProviderSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;
        Some(Self {
            api_key,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The raw key goes out as a bearer token; a key stored with its
    /// `Bearer ` prefix already is sent verbatim.
    fn authorization(&self) -> String {
        if self.api_key.starts_with("Bearer ") {
            self.api_key.clone()
        } else {
            format!("Bearer {}", self.api_key)
        }
    }
}

impl std::fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, conversation: &[ChatMessage]) -> WireRequest {
        let messages: Vec<serde_json::Value> = conversation
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        WireRequest {
            url: format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/')),
            headers: vec![
                ("content-type", "application/json".to_string()),
                ("authorization", self.authorization()),
            ],
            body: json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "messages": messages,
            }),
        }
    }

    /// Only an absent or null `content` is missing; any other scalar is
    /// rendered as text.
    fn extract_text(&self, body: &serde_json::Value) -> Extracted {
        let content = &body["choices"][0]["message"]["content"];
        match content {
            serde_json::Value::Null => Extracted::Missing,
            serde_json::Value::Array(parts) => Extracted::Text(join_part_texts(parts)),
            other => Extracted::Text(coerce_content(other).trim().to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
