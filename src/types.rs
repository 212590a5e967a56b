// Type definitions, LLM wire types and the crate-wide error enum

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Category of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Summary,
    Exercise,
    Flashcard,
    Roadmap,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Summary => write!(f, "summary"),
            ArtifactKind::Exercise => write!(f, "exercise"),
            ArtifactKind::Flashcard => write!(f, "flashcard"),
            ArtifactKind::Roadmap => write!(f, "roadmap"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
    /// JSON schema the provider must constrain its answer to. `None` asks for free text.
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Failure of a single call to a remote model endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Timeouts, rate limits, dropped connections and 5xx answers are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Timeout
                | LlmError::Connection(_)
                | LlmError::RateLimited { .. }
                | LlmError::Server { .. }
        )
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Maps a non-success HTTP status plus body text onto the error taxonomy.
    pub fn from_status(status: u16, message: String, retry_after: Option<Duration>) -> Self {
        match status {
            408 => LlmError::Timeout,
            429 => LlmError::RateLimited { retry_after },
            500..=599 => LlmError::Server { status, message },
            _ => LlmError::Client { status, message },
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() || err.is_request() {
            LlmError::Connection(err.to_string())
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            LlmError::from_status(status.as_u16(), err.to_string(), None)
        } else {
            LlmError::Connection(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Generation of {kind} failed after {attempts} attempt(s): {source}")]
    Generation {
        kind: ArtifactKind,
        attempts: u32,
        #[source]
        source: LlmError,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation { .. } => StatusCode::BAD_GATEWAY,
            AppError::Template(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::Connection("reset".into()).is_transient());
        assert!(LlmError::RateLimited { retry_after: None }.is_transient());
        assert!(LlmError::Server { status: 503, message: "busy".into() }.is_transient());

        assert!(!LlmError::Client { status: 400, message: "bad".into() }.is_transient());
        assert!(!LlmError::InvalidResponse("garbage".into()).is_transient());
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(LlmError::from_status(408, String::new(), None), LlmError::Timeout));
        assert!(matches!(
            LlmError::from_status(429, String::new(), Some(Duration::from_secs(3))),
            LlmError::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(3)
        ));
        assert!(matches!(
            LlmError::from_status(502, "upstream".into(), None),
            LlmError::Server { status: 502, .. }
        ));
        assert!(matches!(
            LlmError::from_status(401, "key".into(), None),
            LlmError::Client { status: 401, .. }
        ));
    }

    #[test]
    fn test_status_codes() {
        let exhausted = AppError::Generation {
            kind: ArtifactKind::Exercise,
            attempts: 7,
            source: LlmError::Timeout,
        };
        assert_eq!(exhausted.status_code(), StatusCode::BAD_GATEWAY);
        assert!(exhausted.to_string().contains("exercise"));
        assert!(exhausted.to_string().contains("7 attempt"));

        assert_eq!(
            AppError::Validation("count".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
