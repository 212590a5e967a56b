//! Structured Generation Client
//!
//! Sends a rendered prompt (plus a response schema when structured output is wanted)
//! to the configured provider, retrying transient failures within the attempt budget.
//!
//! Outcomes are three-way:
//! - `Ok(Some(value))` — the model produced a usable result;
//! - `Ok(None)` — the call succeeded but produced nothing usable (empty or malformed);
//! - `Err(AppError::Generation { .. })` — the remote call itself failed.

use tracing::{info, warn};

use crate::config::LLMConfig;
use crate::generation::structures::{parse_structured, StructuredOutput};
use crate::llm::LLM;
use crate::types::{AppError, AppResult, ArtifactKind, LLMMessage, LLMRequest, LlmError};
use crate::utils::retry::{with_retry, RetryPolicy};

const SYSTEM_INSTRUCTION: &str = "You are an educational content generator. Base every answer strictly on the provided material and follow the requested output format exactly.";

#[derive(Clone)]
pub struct GenerationClient {
    llm: LLM,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    retry: RetryPolicy,
}

impl GenerationClient {
    pub fn new(llm: LLM, config: &LLMConfig) -> Self {
        Self {
            llm,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            retry: RetryPolicy::from_config(config),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.llm.provider_name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str, response_schema: Option<serde_json::Value>) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: Some(self.max_output_tokens),
            temperature: Some(self.temperature),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            response_schema,
        }
    }

    /// Runs one logical call with retries and returns the raw model text.
    async fn invoke(&self, kind: ArtifactKind, request: &LLMRequest) -> AppResult<String> {
        let outcome = with_retry(
            &self.retry,
            LlmError::is_transient,
            LlmError::retry_after,
            move |attempt| {
                info!(kind = %kind, attempt, "Calling generation model");
                self.llm.create_chat_completion(request)
            },
        )
        .await;

        match outcome {
            Ok((response, attempts)) => {
                info!(
                    kind = %kind,
                    attempts,
                    content_len = response.content.len(),
                    finish_reason = %response.finish_reason,
                    total_tokens = response.usage.total_tokens,
                    "Generation model answered"
                );
                Ok(response.content)
            }
            Err((source, attempts)) => Err(AppError::Generation {
                kind,
                attempts,
                source,
            }),
        }
    }

    /// Requests a schema-constrained answer and decodes it into `T`.
    pub async fn generate_structured<T: StructuredOutput>(&self, prompt: &str) -> AppResult<Option<T>> {
        let request = self.request(prompt, Some(T::response_schema()));
        let raw = self.invoke(T::KIND, &request).await?;

        if raw.trim().is_empty() {
            warn!(kind = %T::KIND, "Model returned no content");
            return Ok(None);
        }

        match parse_structured::<T>(&raw) {
            Ok(value) => {
                let validated = value.validated();
                if validated.is_none() {
                    warn!(kind = %T::KIND, "Model output failed validation");
                }
                Ok(validated)
            }
            Err(e) => {
                warn!(kind = %T::KIND, error = %e, "Model output did not match the schema");
                Ok(None)
            }
        }
    }

    /// Requests free text. Blank answers count as nothing generated.
    pub async fn generate_text(&self, kind: ArtifactKind, prompt: &str) -> AppResult<Option<String>> {
        let request = self.request(prompt, None);
        let raw = self.invoke(kind, &request).await?;
        let text = raw.trim();

        if text.is_empty() {
            warn!(kind = %kind, "Model returned no content");
            Ok(None)
        } else {
            Ok(Some(text.to_string()))
        }
    }
}
