//! OpenAI chat-completion provider.
//!
//! Talks to the `/v1/chat/completions` endpoint of the OpenAI API (or any
//! compatible server). Requests carry a bounded timeout and are retried once
//! on transient network failure; every other error is terminal for the
//! request.

use crate::client::{ChatClient, ChatRequest, ChatResponse, ChatUsage, Role};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_core::{AppError, AppResult};

/// Request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI wire format: a single message.
#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

/// OpenAI wire format: completion request.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI wire format: completion response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI chat client.
pub struct OpenAiChatClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

/// Normalize a base URL into the chat-completions endpoint.
fn completions_endpoint(base_url: &str) -> String {
    let normalized = base_url.trim_end_matches('/');
    if normalized.ends_with("/chat/completions") {
        return normalized.to_string();
    }
    if normalized.ends_with("/v1") {
        return format!("{}/chat/completions", normalized);
    }
    format!("{}/v1/chat/completions", normalized)
}

impl OpenAiChatClient {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: completions_endpoint(&base_url.into()),
            api_key: api_key.into(),
            client,
        })
    }

    /// Flatten system/history/user into the OpenAI messages array.
    fn to_messages(request: &ChatRequest) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);

        if let Some(ref system) = request.system {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for turn in &request.history {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(ApiMessage {
                role: role.to_string(),
                content: turn.content.clone(),
            });
        }

        messages.push(ApiMessage {
            role: "user".to_string(),
            content: request.user.clone(),
        });

        messages
    }

    async fn send(&self, body: &ApiRequest) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
    }
}

#[async_trait::async_trait]
impl ChatClient for OpenAiChatClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn respond(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::debug!(model = %request.model, "Sending chat completion request");

        let body = ApiRequest {
            model: request.model.clone(),
            messages: Self::to_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        // One retry on connect/timeout errors; everything else is terminal.
        let response = match self.send(&body).await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!("Transient network failure, retrying once: {}", e);
                self.send(&body)
                    .await
                    .map_err(|e| AppError::Llm(format!("Chat completion request failed: {}", e)))?
            }
            Err(e) => {
                return Err(AppError::Llm(format!(
                    "Chat completion request failed: {}",
                    e
                )))
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Chat completion API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse completion response: {}", e)))?;

        let first = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Completion response had no choices".to_string()))?;

        let usage = api_response
            .usage
            .map(|u| ChatUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        tracing::debug!(tokens = usage.total_tokens(), "Received chat completion");

        Ok(ChatResponse {
            content: first.message.content.trim().to_string(),
            model: api_response.model.unwrap_or_else(|| request.model.clone()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_endpoint_bare_host() {
        assert_eq!(
            completions_endpoint("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_completions_endpoint_trailing_slash() {
        assert_eq!(
            completions_endpoint("https://api.openai.com/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_completions_endpoint_versioned() {
        assert_eq!(
            completions_endpoint("http://localhost:8000/v1"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_completions_endpoint_full_path() {
        assert_eq!(
            completions_endpoint("http://localhost:8000/v1/chat/completions"),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_messages_order() {
        let request = ChatRequest::new("question", "gpt-3.5-turbo")
            .with_system("instructions")
            .with_history(vec![
                crate::client::ChatTurn::user("earlier question"),
                crate::client::ChatTurn::assistant("earlier answer"),
            ]);

        let messages = OpenAiChatClient::to_messages(&request);
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages.last().unwrap().content, "question");
    }
}
