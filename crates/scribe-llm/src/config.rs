use scribe_types::Provider;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// ProviderSettings
// ---------------------------------------------------------------------------

/// Endpoint, model and secret for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

impl ProviderSettings {
    pub fn defaults_for(provider: Provider) -> Self {
        let (model, base_url) = match provider {
            Provider::OpenAi => ("gpt-4o", "https://api.openai.com"),
            Provider::Anthropic => ("claude-sonnet-4-20250514", "https://api.anthropic.com"),
            Provider::Google => (
                "gemini-2.5-flash",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
        };
        Self {
            api_key: None,
            model: model.to_string(),
            base_url: base_url.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Names of the environment variables read for one provider.
#[derive(Debug, Clone, Copy)]
pub struct EnvVars {
    pub key: &'static str,
    pub model: &'static str,
    pub base_url: &'static str,
}

pub fn env_vars(provider: Provider) -> EnvVars {
    match provider {
        Provider::OpenAi => EnvVars {
            key: "OPENAI_KEY",
            model: "OPENAI_MODEL",
            base_url: "OPENAI_BASE_URL",
        },
        Provider::Anthropic => EnvVars {
            key: "CLAUDE_KEY",
            model: "CLAUDE_MODEL",
            base_url: "CLAUDE_BASE_URL",
        },
        Provider::Google => EnvVars {
            key: "GEMINI_KEY",
            model: "GEMINI_MODEL",
            base_url: "GEMINI_BASE_URL",
        },
    }
}

pub const MAX_TOKENS_VAR: &str = "AI_MAX_TOKENS";

/// Process-wide provider configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::defaults_for(Provider::OpenAi),
            anthropic: ProviderSettings::defaults_for(Provider::Anthropic),
            google: ProviderSettings::defaults_for(Provider::Google),
        }
    }
}

impl GatewayConfig {
    /// Create from environment variables. A provider whose key is unset or
    /// blank is disabled; the others are unaffected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](GatewayConfig::from_env) with an injectable
    /// variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let max_tokens = match non_blank(MAX_TOKENS_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: MAX_TOKENS_VAR,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_TOKENS,
        };

        let load = |provider: Provider| {
            let vars = env_vars(provider);
            let mut settings = ProviderSettings::defaults_for(provider);
            settings.api_key = non_blank(vars.key).map(|k| k.trim().to_string());
            if let Some(model) = non_blank(vars.model) {
                settings.model = model.trim().to_string();
            }
            if let Some(url) = non_blank(vars.base_url) {
                settings.base_url = url.trim().trim_end_matches('/').to_string();
            }
            settings.max_tokens = max_tokens;
            settings
        };

        Ok(Self {
            openai: load(Provider::OpenAi),
            anthropic: load(Provider::Anthropic),
            google: load(Provider::Google),
        })
    }

    pub fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        }
    }

    pub fn enabled_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.settings(*p).is_enabled())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert!(config.enabled_providers().is_empty());
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.anthropic.model, "claude-sonnet-4-20250514");
        assert_eq!(config.google.model, "gemini-2.5-flash");
        assert_eq!(config.google.max_tokens, 1000);
    }

    #[test]
    fn reads_keys_and_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("OPENAI_KEY", "sk-test"),
            ("CLAUDE_KEY", "  "),
            ("GEMINI_KEY", "g-key"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("OPENAI_BASE_URL", "http://localhost:9000/"),
            ("AI_MAX_TOKENS", "256"),
        ]))
        .unwrap();

        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai.base_url, "http://localhost:9000");
        assert!(config.anthropic.api_key.is_none());
        assert_eq!(config.google.model, "gemini-2.5-pro");
        assert_eq!(config.anthropic.max_tokens, 256);
        assert_eq!(
            config.enabled_providers(),
            vec![Provider::OpenAi, Provider::Google]
        );
    }

    #[test]
    fn invalid_max_tokens_is_rejected() {
        let err = GatewayConfig::from_lookup(lookup_from(&[("AI_MAX_TOKENS", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "AI_MAX_TOKENS", .. }));

        let err = GatewayConfig::from_lookup(lookup_from(&[("AI_MAX_TOKENS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("CLAUDE_KEY", "sk-ant-secret")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
