use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Assistant,
}

impl Role {
    /// Only the exact tag `"assistant"` maps to `Assistant`; every other value,
    /// including a missing or non-string role, is a user turn.
    pub fn from_wire(value: Option<&serde_json::Value>) -> Self {
        match value.and_then(|v| v.as_str()) {
            Some("assistant") => Role::Assistant,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

// ---------------------------------------------------------------------------
// Content coercion
// ---------------------------------------------------------------------------

/// Converts any JSON value into plain message text. Never fails.
///
/// | input  | output |
/// |--------|--------|
/// | string | the string itself |
/// | null   | `""` |
/// | bool / number | display form (`true`, `42`, `1.5`) |
/// | array  | each element rendered (strings as-is, objects via their `text` field, anything else `""`), joined with `\n` |
/// | object | compact JSON |
pub fn coerce_content(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.as_str(),
                Value::Object(_) => item["text"].as_str().unwrap_or(""),
                _ => "",
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Normalizes one loosely-typed history entry. Non-object entries become
    /// an empty user turn.
    pub fn from_wire(value: &serde_json::Value) -> Self {
        Self {
            role: Role::from_wire(value.get("role")),
            content: coerce_content(value.get("content").unwrap_or(&serde_json::Value::Null)),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Google];

    /// Parses the inbound selector. Tags match exactly; anything else,
    /// including other casings, maps to the default provider.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "chatgpt" => Provider::OpenAi,
            "claude" => Provider::Anthropic,
            "gemini" => Provider::Google,
            other => {
                tracing::debug!(tag = other, "unrecognized provider, using default");
                Provider::default()
            }
        }
    }

    /// Same as [`from_tag`](Provider::from_tag) for an arbitrary JSON value;
    /// a missing or non-string value selects the default provider.
    pub fn from_wire(value: Option<&serde_json::Value>) -> Self {
        match value.and_then(|v| v.as_str()) {
            Some(tag) => Self::from_tag(tag),
            None => Provider::default(),
        }
    }

    /// The tag the browser uses for this provider.
    pub fn tag(&self) -> &'static str {
        match self {
            Provider::OpenAi => "chatgpt",
            Provider::Anthropic => "claude",
            Provider::Google => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google",
        })
    }
}

// ---------------------------------------------------------------------------
// ChatRequest / ChatReply
// ---------------------------------------------------------------------------

/// Canonical request: oldest turn first, newest user turn last. An empty
/// conversation is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub provider: Provider,
    pub conversation: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(provider: Provider, conversation: Vec<ChatMessage>) -> Self {
        Self {
            provider,
            conversation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}

// ---------------------------------------------------------------------------
// InboundChatRequest
// ---------------------------------------------------------------------------

/// The JSON body posted by the browser: `{provider, chatHistory}`. Both fields
/// are kept untyped so that normalization, not deserialization, decides what
/// a malformed value means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundChatRequest {
    #[serde(default)]
    pub provider: Option<serde_json::Value>,
    #[serde(default, rename = "chatHistory")]
    pub chat_history: Option<Vec<serde_json::Value>>,
}

impl InboundChatRequest {
    pub fn normalize(&self) -> ChatRequest {
        let conversation = self
            .chat_history
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ChatMessage::from_wire)
            .collect();

        ChatRequest {
            provider: Provider::from_wire(self.provider.as_ref()),
            conversation,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
