use tracing::Instrument;

use crate::{
    env_vars, AnthropicAdapter, GatewayConfig, GeminiAdapter, OpenAiAdapter, ProviderAdapter,
    WireRequest,
};
use scribe_types::{ChatReply, ChatRequest, GatewayError, InboundChatRequest, Provider};

// ---------------------------------------------------------------------------
// ChatGateway
// ---------------------------------------------------------------------------

/// Single entry point for chat calls. Holds one adapter per provider whose
/// secret is configured and a pooled HTTP client; nothing else is shared
/// between calls, so `&self` calls may run concurrently.
#[derive(Debug, Clone)]
pub struct ChatGateway {
    client: reqwest::Client,
    openai: Option<OpenAiAdapter>,
    anthropic: Option<AnthropicAdapter>,
    google: Option<GeminiAdapter>,
}

impl ChatGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            openai: OpenAiAdapter::from_settings(&config.openai),
            anthropic: AnthropicAdapter::from_settings(&config.anthropic),
            google: GeminiAdapter::from_settings(&config.google),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The adapter serving `provider`, or `None` if its secret is missing.
    pub fn adapter(&self, provider: Provider) -> Option<&dyn ProviderAdapter> {
        match provider {
            Provider::OpenAi => self.openai.as_ref().map(|a| a as &dyn ProviderAdapter),
            Provider::Anthropic => self.anthropic.as_ref().map(|a| a as &dyn ProviderAdapter),
            Provider::Google => self.google.as_ref().map(|a| a as &dyn ProviderAdapter),
        }
    }

    /// Normalize a browser payload and dispatch it.
    pub async fn handle_inbound(
        &self,
        inbound: &InboundChatRequest,
    ) -> Result<ChatReply, GatewayError> {
        self.handle(inbound.normalize()).await
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        let span = tracing::info_span!(
            "chat",
            request_id = %uuid::Uuid::new_v4(),
            provider = %request.provider,
            messages = request.conversation.len(),
        );
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        let provider = request.provider;
        let adapter = self.adapter(provider).ok_or_else(|| {
            let err = GatewayError::Configuration {
                provider,
                env_var: env_vars(provider).key,
            };
            tracing::error!(%err, "provider not configured");
            err
        })?;

        let wire = adapter.build_request(&request.conversation);
        tracing::debug!(model = adapter.model(), url = %wire.url, "sending chat request");

        let body = self.send(provider, wire).await.inspect_err(|err| {
            tracing::error!(
                status = err.http_status(),
                details = ?err.details(),
                "AI request failed"
            );
        })?;

        let extracted = adapter.extract_text(&body);
        if extracted.is_missing() {
            tracing::warn!("provider response had no text field, replying with empty text");
        }
        let text = extracted.into_text();
        tracing::info!(chars = text.len(), "chat reply");
        Ok(ChatReply { text })
    }

    /// One POST, no retries. A 2xx body that is not JSON becomes `Null` so
    /// the adapter's extraction degrades instead of failing.
    async fn send(
        &self,
        provider: Provider,
        wire: WireRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        let mut builder = self.client.post(&wire.url);
        for (name, value) in &wire.headers {
            builder = builder.header(*name, value);
        }

        let resp = builder
            .json(&wire.body)
            .send()
            .await
            .map_err(|e| transport_error(provider, &e))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_error(provider, &e))?;

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                provider,
                status: Some(status.as_u16()),
                details: parse_details(&bytes),
            });
        }

        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "provider returned a non-JSON success body");
            serde_json::Value::Null
        }))
    }
}

fn transport_error(provider: Provider, err: &reqwest::Error) -> GatewayError {
    GatewayError::Upstream {
        provider,
        status: err.status().map(|s| s.as_u16()),
        details: serde_json::Value::String(err.to_string()),
    }
}

/// Upstream error bodies are kept as JSON when they parse, otherwise as text.
fn parse_details(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
