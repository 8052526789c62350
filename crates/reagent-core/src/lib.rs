//! Reagent - a reasoning-and-acting control loop for text-completion models
//!
//! This crate provides:
//! - Directive parser turning raw model output into structured decisions
//! - Router abstraction (zero-shot variant included) over one decision step
//! - Routing loop executing tools and replaying the growing transcript
//! - Ordered tool registry rendered into the prompt
//! - Completion client trait with an OpenAI-compatible HTTP implementation
//!   and a scripted mock for tests

pub mod agent;
pub mod error;
pub mod llm;
pub mod tools;

// Re-export commonly used types
pub use agent::{
    BASE_TEMPLATE, CancelRequest, Decision, Directive, LoopConfig, LoopStatus, PromptAssembler,
    Router, RoutingLoop, RoutingState, RunOutcome, ToolFailurePolicy, TraceLog, Transcript,
    TranscriptEntry, UnknownToolPolicy, ZeroShotRouter, parse_directive,
};
pub use error::{AgentError, MalformedCause, Result};
pub use llm::{CompletionClient, CompletionRequest, MockCompletionClient, MockStep, OpenAIClient};
pub use tools::{Tool, ToolRegistry};
