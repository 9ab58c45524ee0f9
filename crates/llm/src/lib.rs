//! Chat-completion integration for the math tutor backend.
//!
//! This crate provides a provider-agnostic abstraction for the remote
//! chat-completion service. The HTTP handlers talk to the [`ChatClient`]
//! trait only, so the OpenAI implementation can be swapped for the scripted
//! mock in tests without touching callers.
//!
//! # Example
//! ```no_run
//! use tutor_llm::{ChatClient, ChatRequest, providers::OpenAiChatClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiChatClient::new("https://api.openai.com", "sk-test")?;
//! let request = ChatRequest::new("Explain fractions", "gpt-3.5-turbo")
//!     .with_system("You are a patient math tutor.");
//! let response = client.respond(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatClient, ChatRequest, ChatResponse, ChatTurn, ChatUsage, Role};
pub use factory::create_chat_client;
pub use providers::{MockChatClient, OpenAiChatClient};
