use serde_json::json;

use crate::provider::join_part_texts;
use crate::{Extracted, ProviderAdapter, ProviderSettings, WireRequest};
use scribe_types::{ChatMessage, Provider, Role};

// ---------------------------------------------------------------------------
// GeminiAdapter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct GeminiAdapter {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl GeminiAdapter {
    pub fn new(api_key: String) -> Self {
        let defaults = ProviderSettings::defaults_for(Provider::Google);
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

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Message conversion helpers
// ---------------------------------------------------------------------------

fn convert_message(msg: &ChatMessage) -> serde_json::Value {
    let role = match msg.role {
        Role::Assistant => "model",
        Role::User => "user",
    };
    json!({ "role": role, "parts": [{ "text": msg.content }] })
}

// ---------------------------------------------------------------------------
// ProviderAdapter implementation
// ---------------------------------------------------------------------------

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model(&self) -> &str {
        &self.model
    }

    /// Gemini rejects empty parts, so blank turns are dropped here.
    fn build_request(&self, conversation: &[ChatMessage]) -> WireRequest {
        let contents: Vec<serde_json::Value> = conversation
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(convert_message)
            .collect();

        WireRequest {
            url: format!(
                "{}/models/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                self.model
            ),
            headers: vec![
                ("content-type", "application/json".to_string()),
                ("x-goog-api-key", self.api_key.clone()),
            ],
            body: json!({
                "contents": contents,
                "generationConfig": { "maxOutputTokens": self.max_tokens },
            }),
        }
    }

    fn extract_text(&self, body: &serde_json::Value) -> Extracted {
        match body["candidates"][0]["content"]["parts"].as_array() {
            Some(parts) => Extracted::Text(join_part_texts(parts)),
            None => Extracted::Missing,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
