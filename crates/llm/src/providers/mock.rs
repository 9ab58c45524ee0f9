//! Scripted chat client for tests and offline development.

use crate::client::{ChatClient, ChatRequest, ChatResponse, ChatUsage};
use std::sync::atomic::{AtomicUsize, Ordering};
use tutor_core::{AppError, AppResult};

/// Mock chat client that returns a canned reply (or a simulated upstream
/// failure) and counts how many times it was called.
///
/// The call counter lets tests assert that input-validation paths never
/// reach the remote service.
pub struct MockChatClient {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockChatClient {
    /// Create a mock that always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that simulates an upstream failure on every call.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `respond` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChatClient for MockChatClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn respond(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.reply {
            Some(ref reply) => Ok(ChatResponse {
                content: reply.trim().to_string(),
                model: request.model.clone(),
                usage: ChatUsage::default(),
            }),
            None => Err(AppError::Llm("simulated upstream failure".to_string())),
        }
    }
}
