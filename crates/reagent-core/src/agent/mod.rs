//! Agent module - the reasoning-and-acting routing loop

pub mod config;
pub mod directive;
pub mod executor;
pub mod prompt;
pub mod router;
pub mod state;
pub mod trace;
pub mod transcript;

pub use config::{CancelRequest, LoopConfig, ToolFailurePolicy, UnknownToolPolicy};
pub use directive::{
    ACTION_INPUT_PREFIX, ACTION_PREFIX, Directive, FINAL_ANSWER_PREFIX, parse_directive,
};
pub use executor::RoutingLoop;
pub use prompt::{BASE_TEMPLATE, PromptAssembler};
pub use router::{
    DEFAULT_OBSERVATION_PREFIX, DEFAULT_ROUTER_PREFIX, Decision, Router, ZeroShotRouter,
};
pub use state::{LoopStatus, RoutingState, RunOutcome};
pub use trace::TraceLog;
pub use transcript::{Transcript, TranscriptEntry};
