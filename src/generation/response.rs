//! Generation response types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for generation calls
///
/// The `Display` output is shown to users as the failing step's output, so
/// provider messages are passed through without decoration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    /// API error without an HTTP status
    pub fn api(message: impl Into<String>) -> Self {
        GenerationError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// API error carrying the HTTP status
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        GenerationError::Api {
            status: Some(status),
            message: message.into(),
        }
    }
}

/// Response from the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated text
    pub content: String,

    /// Model that produced the text (if reported)
    pub model: Option<String>,

    /// Token usage information (if available)
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    /// Create a new response with text only
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
            usage: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
