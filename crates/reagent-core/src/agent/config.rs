//! Routing loop configuration

use std::sync::Arc;
use std::time::Duration;

use crate::agent::trace::TraceLog;

/// What to do when the model names a tool the registry does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownToolPolicy {
    /// Fail the run with an unknown-tool error.
    #[default]
    Fail,
    /// Synthesize an observation naming the unknown tool and keep running.
    Observe,
}

/// What to do when a tool invocation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    /// Fail the run with the tool's error.
    #[default]
    Fail,
    /// Synthesize a `tool <name> failed: <message>` observation and keep
    /// running.
    Observe,
}

/// Cooperative cancellation request, checked between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

impl CancelRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

/// Configuration for a routing loop run
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum iterations before the run fails (default: 15).
    pub max_iterations: usize,
    /// Timeout for each tool invocation (default: 300s).
    pub tool_timeout: Duration,
    /// Optional timeout for each completion call. `None` leaves deadlines
    /// to the completion client (default).
    pub completion_timeout: Option<Duration>,
    /// Policy for tool names missing from the registry.
    pub unknown_tool_policy: UnknownToolPolicy,
    /// Policy for tool invocation failures.
    pub tool_failure_policy: ToolFailurePolicy,
    /// Optional append-only JSONL trace for execution diagnostics.
    pub trace: Option<Arc<TraceLog>>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopConfig {
    /// Create a config with default limits and fail-fast policies
    pub fn new() -> Self {
        Self {
            max_iterations: 15,
            tool_timeout: Duration::from_secs(300),
            completion_timeout: None,
            unknown_tool_policy: UnknownToolPolicy::default(),
            tool_failure_policy: ToolFailurePolicy::default(),
            trace: None,
        }
    }

    /// Set max iterations
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the per-invocation tool timeout
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Set a per-call completion timeout
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = Some(timeout);
        self
    }

    /// Set the unknown-tool policy
    pub fn with_unknown_tool_policy(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool_policy = policy;
        self
    }

    /// Set the tool-failure policy
    pub fn with_tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.tool_failure_policy = policy;
        self
    }

    /// Set a trace log for append-only JSONL execution tracing
    pub fn with_trace(mut self, trace: Arc<TraceLog>) -> Self {
        self.trace = Some(trace);
        self
    }
}
