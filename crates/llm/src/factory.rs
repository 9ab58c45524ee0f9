//! Chat client factory.
//!
//! Resolves configuration into a concrete [`ChatClient`] implementation.
//! The credential check happens here, at startup, so a missing API key never
//! surfaces mid-request.

use crate::client::ChatClient;
use crate::providers::OpenAiChatClient;
use std::sync::Arc;
use tutor_core::config::ChatSettings;
use tutor_core::{AppError, AppResult};

/// Create a chat client from application settings.
///
/// # Errors
/// Returns a `Config` error when the API key is absent and an `Llm` error
/// when the underlying HTTP client cannot be constructed.
pub fn create_chat_client(
    settings: &ChatSettings,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn ChatClient>> {
    let api_key = api_key.ok_or_else(|| {
        AppError::Config("Chat client requires OPENAI_API_KEY to be set".to_string())
    })?;

    let client = OpenAiChatClient::new(&settings.endpoint, api_key)?;
    Ok(Arc::new(client))
}
