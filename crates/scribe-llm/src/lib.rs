//! Chat gateway with multi-provider support (OpenAI, Anthropic, Gemini).
//!
//! Provides the `ProviderAdapter` trait, one adapter per provider,
//! `GatewayConfig` for secrets and endpoints, and `ChatGateway` for routing a
//! canonical conversation to the selected provider.

mod anthropic;
mod config;
mod gateway;
mod gemini;
mod openai;
mod provider;

pub use anthropic::AnthropicAdapter;
pub use config::*;
pub use gateway::*;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use provider::*;
