use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, LlmError};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LlmError>;
}

/// Shared handle to the configured provider. Cheap to clone, never mutated after construction.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let base_url = config.base_url.as_deref();

        let adapter: Arc<dyn LLMAdapter> = match config.provider.as_str() {
            "google" | "gemini" => Arc::new(crate::llm::google::GoogleAdapter::new(
                &config.api_key,
                base_url,
                timeout,
            )?),
            "openai" | "openrouter" | "groq" => {
                let base_url = base_url.unwrap_or(match config.provider.as_str() {
                    "openrouter" => crate::llm::openai::OPENROUTER_API_BASE,
                    "groq" => crate::llm::openai::GROQ_API_BASE,
                    _ => crate::llm::openai::OPENAI_API_BASE,
                });
                Arc::new(crate::llm::openai::OpenAIAdapter::new(
                    &config.api_key,
                    base_url,
                    timeout,
                )?)
            }
            other => {
                return Err(AppError::Config(format!("Unsupported provider: {}", other)));
            }
        };

        Ok(Self {
            adapter,
            provider_name: config.provider.clone(),
        })
    }

    pub fn with_adapter(name: impl Into<String>, adapter: Arc<dyn LLMAdapter>) -> Self {
        Self {
            adapter,
            provider_name: name.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LlmError> {
        self.adapter.create_chat_completion(request).await
    }
}

/// Builds the `reqwest` client every HTTP adapter shares.
pub(crate) fn http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Turns a non-success response into an `LlmError`, honouring `Retry-After` seconds.
pub(crate) async fn error_from_response(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();

    LlmError::from_status(status, body, retry_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_config_error() {
        let config = LLMConfig {
            provider: "carrier-pigeon".to_string(),
            api_key: "k".to_string(),
            ..LLMConfig::default()
        };
        match LLM::from_config(&config) {
            Err(AppError::Config(msg)) => assert!(msg.contains("carrier-pigeon")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_known_providers_construct() {
        for provider in ["google", "gemini", "openai", "openrouter", "groq"] {
            let config = LLMConfig {
                provider: provider.to_string(),
                api_key: "k".to_string(),
                ..LLMConfig::default()
            };
            let llm = LLM::from_config(&config).expect("provider should build");
            assert_eq!(llm.provider_name(), provider);
        }
    }
}
