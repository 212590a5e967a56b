// Scripted adapter for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::provider::LLMAdapter;
use crate::types::{LLMRequest, LLMResponse, LlmError, TokenUsage};

/// Replays queued results in order; once the queue is drained it keeps returning `fallback`.
pub struct MockAdapter {
    script: Mutex<VecDeque<Result<LLMResponse, LlmError>>>,
    fallback: Result<LLMResponse, LlmError>,
    calls: AtomicU32,
    requests: Mutex<Vec<LLMRequest>>,
}

impl MockAdapter {
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_fallback(Ok(text_response(content)))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with_fallback(Err(error))
    }

    pub fn with_fallback(fallback: Result<LLMResponse, LlmError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, result: Result<LLMResponse, LlmError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn then_fail(self, error: LlmError, times: usize) -> Self {
        (0..times).fold(self, |mock, _| mock.then(Err(error.clone())))
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LLMRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

pub fn text_response(content: impl Into<String>) -> LLMResponse {
    LLMResponse {
        content: content.into(),
        finish_reason: "STOP".to_string(),
        usage: TokenUsage::default(),
    }
}

#[async_trait]
impl LLMAdapter for MockAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
