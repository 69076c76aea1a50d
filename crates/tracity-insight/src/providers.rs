//! Text-generation providers.
//!
//! OpenAI and Groq share the chat-completions format; Anthropic uses the
//! Messages API. Responses are returned as raw text and parsed by the
//! summarizer, which treats them as untrusted.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::types::LLMProvider;
use tracity_core::{Error, Result};

/// Text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str, max_tokens: usize)
        -> Result<String>;
}

/// Completion client for a hosted LLM API.
pub struct LlmClient {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
    temperature: f64,
}

impl LlmClient {
    pub fn new(provider: LLMProvider, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            provider,
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.7,
        }
    }

    async fn complete_openai_compat(
        &self,
        url: &str,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: usize,
    ) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        debug!("Requesting completion from {} with model {}", url, self.model);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Upstream("response carried no message content".into()))
    }

    async fn complete_anthropic(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: usize,
    ) -> Result<String> {
        let body = json!({
            "model": self.model,
            "system": system_prompt,
            "messages": [{"role": "user", "content": user_prompt}],
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        debug!("Requesting completion from Anthropic with model {}", self.model);

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let parsed = read_json(response).await?;
        let text: String = parsed["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|b| b["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            Err(Error::Upstream("response carried no text blocks".into()))
        } else {
            Ok(text)
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Upstream(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Upstream(format!("Invalid response body: {}", e)))
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: usize,
    ) -> Result<String> {
        match self.provider {
            LLMProvider::OpenAI => {
                self.complete_openai_compat(
                    "https://api.openai.com/v1/chat/completions",
                    system_prompt,
                    user_prompt,
                    max_tokens,
                )
                .await
            }
            LLMProvider::Groq => {
                self.complete_openai_compat(
                    "https://api.groq.com/openai/v1/chat/completions",
                    system_prompt,
                    user_prompt,
                    max_tokens,
                )
                .await
            }
            LLMProvider::Anthropic => {
                self.complete_anthropic(system_prompt, user_prompt, max_tokens)
                    .await
            }
        }
    }
}

/// Stand-in used when no provider is configured. Every call fails, so
/// insight paths take their local fallback.
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn complete(&self, _: &str, _: &str, _: usize) -> Result<String> {
        Err(Error::Upstream("No LLM provider configured".into()))
    }
}

/// Pick a generator from configuration.
pub fn build_generator(config: &LlmConfig) -> Arc<dyn TextGenerator> {
    match config.resolve_provider() {
        Some((provider, model, api_key)) => {
            info!("Insight generation via {} ({})", provider, model);
            Arc::new(LlmClient::new(provider, model, api_key))
        }
        None => {
            warn!("No LLM provider configured; insights use the static fallback");
            Arc::new(UnconfiguredGenerator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        let err = UnconfiguredGenerator.complete("s", "u", 10).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }
}
