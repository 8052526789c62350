//! Error types for the routing loop

use thiserror::Error;

/// Why a block of model output failed to parse into a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedCause {
    /// The output contained no non-empty lines.
    EmptyOutput,
    /// The second-to-last line does not carry an `Action: ` prefix
    /// (or there is no second-to-last line at all).
    MissingActionLine,
    /// The last line carries neither a final answer nor an
    /// `Action Input: ` prefix.
    MissingActionInputLine,
}

impl std::fmt::Display for MalformedCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::EmptyOutput => "model output was empty",
            Self::MissingActionLine => "second-to-last line does not have an action",
            Self::MissingActionInputLine => "last line does not have an action input",
        };
        f.write_str(msg)
    }
}

/// Routing loop error types
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Malformed directive: {0}")]
    MalformedDirective(MalformedCause),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Tool '{name}' failed: {message}")]
    ToolInvocation { name: String, message: String },

    #[error("Iteration limit exceeded: {0}")]
    IterationLimitExceeded(usize),

    #[error("Completion service error: {0}")]
    CompletionService(String),

    #[error("Run cancelled")]
    Cancelled,
}

/// Result type alias for routing loop operations
pub type Result<T> = std::result::Result<T, AgentError>;
