//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tracity_core::{Error, Result};

use crate::types::LLMProvider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// LLM configuration (read from llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
        }
    }
}

impl LlmConfig {
    /// Load config from file, falling back to env vars and defaults.
    /// A missing file is normal; an unreadable one is logged and ignored.
    pub fn load(config_path: &Path) -> Self {
        let mut config = match Self::read(config_path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("No LLM config at {}", config_path.display());
                LlmConfig::default()
            }
            Err(e) => {
                warn!("Ignoring {}: {}", config_path.display(), e);
                LlmConfig::default()
            }
        };

        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = non_empty_env("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = non_empty_env("GROQ_API_KEY");
        }

        config
    }

    /// Parse the config file alone. `Ok(None)` when it does not exist.
    pub fn read(config_path: &Path) -> Result<Option<Self>> {
        let raw = match std::fs::read_to_string(config_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Config(format!("malformed LLM config: {}", e)))
    }

    /// Resolve provider, model and key. `None` when nothing usable is set.
    pub fn resolve_provider(&self) -> Option<(LLMProvider, String, String)> {
        let openai = || {
            self.openai_api_key
                .as_ref()
                .map(|k| (LLMProvider::OpenAI, self.openai_model.clone(), k.clone()))
        };
        let anthropic = || {
            self.anthropic_api_key
                .as_ref()
                .map(|k| (LLMProvider::Anthropic, self.anthropic_model.clone(), k.clone()))
        };
        let groq = || {
            self.groq_api_key
                .as_ref()
                .map(|k| (LLMProvider::Groq, self.groq_model.clone(), k.clone()))
        };

        match self.preferred_provider.as_str() {
            "openai" => openai(),
            "anthropic" => anthropic(),
            "groq" => groq(),
            // Auto mode: Anthropic > Groq > OpenAI
            "auto" => anthropic().or_else(groq).or_else(openai),
            other => {
                warn!("Unknown preferred provider '{}'", other);
                None
            }
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
