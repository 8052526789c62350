//! Deterministic mock completion client for loop and reliability tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};

use crate::error::{AgentError, Result};

use super::{CompletionClient, CompletionRequest};

/// Deterministic step for scripted mock completions.
#[derive(Debug, Clone)]
pub enum MockStepKind {
    /// Return this text verbatim.
    Text(String),
    /// Return a completion-service error.
    Error(String),
}

/// Scripted completion step with optional delay.
#[derive(Debug, Clone)]
pub struct MockStep {
    pub delay_ms: u64,
    pub kind: MockStepKind,
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Text(content.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            kind: MockStepKind::Error(message.into()),
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// A deterministic mock completion client driven by scripted steps.
///
/// Every received request is captured for assertion. When the script runs
/// out the client returns the configured fallback text, or an error if no
/// fallback was set, so an over-iterating loop fails loudly.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    model: String,
    script: Arc<Mutex<VecDeque<MockStep>>>,
    fallback: Option<String>,
    captured: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: None,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn from_steps(model: impl Into<String>, steps: Vec<MockStep>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            fallback: None,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Text returned for every request once the script is exhausted.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    pub async fn push_step(&self, step: MockStep) {
        self.script.lock().await.push_back(step);
    }

    /// Requests received so far, in order.
    pub async fn captured_requests(&self) -> Vec<CompletionRequest> {
        self.captured.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.captured.lock().await.len()
    }

    async fn next_step(&self) -> Option<MockStep> {
        self.script.lock().await.pop_front()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.captured.lock().await.push(request);

        let Some(step) = self.next_step().await else {
            return match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(AgentError::CompletionService(
                    "mock script exhausted".to_string(),
                )),
            };
        };

        if step.delay_ms > 0 {
            sleep(Duration::from_millis(step.delay_ms)).await;
        }

        match step.kind {
            MockStepKind::Text(content) => Ok(content),
            MockStepKind::Error(message) => Err(AgentError::CompletionService(message)),
        }
    }
}
