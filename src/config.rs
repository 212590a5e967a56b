use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub generation: GenerationConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

// Hand-written so the credential never reaches the logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            max_attempts: 7,
            retry_base_delay_ms: 250,
            retry_max_delay_ms: 8_000,
            request_timeout_secs: 120,
            temperature: 0.4,
            max_output_tokens: 8_192,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    Structured,
    Text,
}

impl std::str::FromStr for SummaryFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(SummaryFormat::Structured),
            "text" | "plain" => Ok(SummaryFormat::Text),
            other => anyhow::bail!("unknown summary format '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub summary_format: SummaryFormat,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            summary_format: SummaryFormat::Structured,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

fn parsed<T>(name: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", name, raw, e))
}

fn first_set(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = LLMConfig::default();

        Ok(Self {
            server: ServerConfig {
                port: parsed("PORT", "8000")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or(defaults.provider),
                api_key: first_set(&["LLM_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"])
                    .context("LLM_API_KEY (or GEMINI_API_KEY) must be set")?,
                model: first_set(&["LLM_MODEL", "GEMINI_MODEL"]).unwrap_or(defaults.model),
                base_url: first_set(&["LLM_BASE_URL"]),
                max_attempts: parsed("LLM_MAX_RETRIES", "7")?,
                retry_base_delay_ms: parsed("LLM_RETRY_BASE_DELAY_MS", "250")?,
                retry_max_delay_ms: parsed("LLM_RETRY_MAX_DELAY_MS", "8000")?,
                request_timeout_secs: parsed("LLM_TIMEOUT_SECS", "120")?,
                temperature: parsed("LLM_TEMPERATURE", "0.4")?,
                max_output_tokens: parsed("LLM_MAX_OUTPUT_TOKENS", "8192")?,
            },
            generation: GenerationConfig {
                summary_format: parsed("SUMMARY_FORMAT", "structured")?,
            },
            upload: UploadConfig {
                max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "26214400")?,
            },
        })
    }
}
