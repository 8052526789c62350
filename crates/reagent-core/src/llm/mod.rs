//! LLM module - text-completion client abstraction

mod client;
mod mock_client;
mod openai;

pub use client::{CompletionClient, CompletionRequest};
pub use mock_client::{MockCompletionClient, MockStep, MockStepKind};
pub use openai::OpenAIClient;
