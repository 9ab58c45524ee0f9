//! Prompt assembly for the math tutor backend.
//!
//! Each generative endpoint has a fixed prompt shape: a system instruction
//! plus a user message rendered from a Handlebars template. The endpoints
//! differ only in which upstream component feeds the template: a topic, a
//! free-form query, or a query plus retrieved context.

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::{build_answer_prompt, build_example_prompt, build_explanation_prompt};
pub use types::BuiltPrompt;
