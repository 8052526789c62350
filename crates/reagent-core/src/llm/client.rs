//! Completion client trait and types

use async_trait::async_trait;

use crate::error::Result;

/// One plain-text completion request.
///
/// Prompt in, text out. Stop sequences are a hint: a client that cannot
/// honor them forwards the prompt unchanged and ignores the field.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            stop: vec![],
        }
    }

    /// Set stop sequences
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }
}

/// Text-completion client trait
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// Get model name
    fn model(&self) -> &str;

    /// Complete a prompt into raw text
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
