// OpenAI-compatible chat-completions adapter (OpenAI, OpenRouter, Groq)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::provider::{error_from_response, http_client, LLMAdapter};
use crate::types::{AppResult, LLMRequest, LLMResponse, LlmError, TokenUsage};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

pub struct OpenAIAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAIAdapter {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(request: &LLMRequest) -> ChatRequest {
        let mut messages: Vec<ChatMessage> = request
            .system_instruction
            .iter()
            .map(|text| ChatMessage {
                role: "system".to_string(),
                content: text.clone(),
            })
            .collect();
        messages.extend(request.messages.iter().map(|m| ChatMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        }));

        let response_format = request.response_schema.as_ref().map(|schema| {
            serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_output",
                    "schema": to_json_schema(schema.clone()),
                }
            })
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format,
        }
    }
}

/// Response schemas are written in Gemini's OpenAPI dialect (`"type": "OBJECT"`,
/// `"nullable": true`); JSON Schema proper wants lowercase type names and expresses
/// nullability as a `["<type>", "null"]` union.
fn to_json_schema(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            let nullable = matches!(map.get("nullable"), Some(Value::Bool(true)));
            Value::Object(
                map.into_iter()
                    .filter(|(key, v)| !(key == "nullable" && v.is_boolean()))
                    .map(|(key, v)| {
                        let v = match (key.as_str(), v) {
                            ("type", Value::String(t)) => {
                                let t = Value::String(t.to_ascii_lowercase());
                                if nullable {
                                    Value::Array(vec![t, Value::String("null".to_string())])
                                } else {
                                    t
                                }
                            }
                            (_, other) => to_json_schema(other),
                        };
                        (key, v)
                    })
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(to_json_schema).collect()),
        other => other,
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse chat response: {}", e)))?;

        let (content, finish_reason) = match parsed.choices.into_iter().next() {
            Some(choice) => (
                choice.message.content.unwrap_or_default(),
                choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            ),
            None => (String::new(), "no_choices".to_string()),
        };

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        debug!(content_len = content.len(), finish_reason = %finish_reason, "Chat completion received");

        Ok(LLMResponse {
            content,
            finish_reason,
            usage,
        })
    }
}
