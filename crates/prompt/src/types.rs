//! Prompt types.

use serde::{Deserialize, Serialize};

/// A fully built prompt ready to send to the chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System instruction
    pub system: String,

    /// User message
    pub user: String,
}
