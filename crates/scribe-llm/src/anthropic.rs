use serde_json::json;

use crate::provider::join_part_texts;
use crate::{Extracted, ProviderAdapter, ProviderSettings, WireRequest};
use scribe_types::{ChatMessage, Provider};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// AnthropicAdapter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AnthropicAdapter {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicAdapter {
    pub fn new(api_key: String) -> Self {
        let defaults = ProviderSettings::defaults_for(Provider::Anthropic);
        Self {
            api_key,
            base_url: defaults.base_url,
            model: defaults.model,
            max_tokens: defaults.max_tokens,
        }
    }

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
}

impl std::fmt::Debug for AnthropicAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Request translation (canonical → Anthropic JSON)
// ---------------------------------------------------------------------------

fn convert_message(msg: &ChatMessage) -> serde_json::Value {
    json!({ "role": msg.role.as_str(), "content": msg.content })
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, conversation: &[ChatMessage]) -> WireRequest {
        let messages: Vec<serde_json::Value> = conversation.iter().map(convert_message).collect();

        WireRequest {
            url: format!("{}/v1/messages", self.base_url.trim_end_matches('/')),
            headers: vec![
                ("content-type", "application/json".to_string()),
                ("x-api-key", self.api_key.clone()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
            body: json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "messages": messages,
            }),
        }
    }

    /// Keeps `text` blocks only; `tool_use`, `thinking` and other block types
    /// are dropped.
    fn extract_text(&self, body: &serde_json::Value) -> Extracted {
        let Some(content) = body["content"].as_array() else {
            return Extracted::Missing;
        };
        let text_blocks: Vec<serde_json::Value> = content
            .iter()
            .filter(|block| block["type"] == "text")
            .cloned()
            .collect();
        Extracted::Text(join_part_texts(&text_blocks))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
