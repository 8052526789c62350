//! Router: one decision step over the transcript

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::agent::directive::{Directive, parse_directive};
use crate::agent::prompt::PromptAssembler;
use crate::agent::transcript::Transcript;
use crate::error::Result;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::tools::ToolRegistry;

/// Default prefix prepended to each observation in the rendered transcript.
pub const DEFAULT_OBSERVATION_PREFIX: &str = "Observation: ";

/// Default prefix appended once before each completion call.
pub const DEFAULT_ROUTER_PREFIX: &str = "Thought:";

/// Outcome of one decision step: the parsed directive plus the raw model
/// text that produced it, which the loop appends to the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub directive: Directive,
    pub raw_output: String,
}

/// One decision step: task and transcript in, directive out.
///
/// A router variant is a prompt builder plus the directive parser behind
/// this interface. Variants own their prefix strings; the loop uses
/// `observation_prefix` when rendering observations it appends. Parse
/// failures propagate unchanged since recovery policy belongs to the loop.
#[async_trait]
pub trait Router: Send + Sync {
    /// Prefix prepended to each appended observation
    fn observation_prefix(&self) -> &str {
        DEFAULT_OBSERVATION_PREFIX
    }

    /// Prefix appended immediately before invoking the completion service
    fn router_prefix(&self) -> &str {
        DEFAULT_ROUTER_PREFIX
    }

    /// Produce the next directive for the given task and transcript
    async fn decide(&self, input: &str, transcript: &Transcript) -> Result<Decision>;
}

/// Zero-shot router: one static instruction block listing every tool,
/// rendered at construction time.
pub struct ZeroShotRouter {
    client: Arc<dyn CompletionClient>,
    assembler: PromptAssembler,
}

impl ZeroShotRouter {
    /// Construct from a completion client and the tool set, using the
    /// default template
    pub fn from_client_and_tools(client: Arc<dyn CompletionClient>, tools: &ToolRegistry) -> Self {
        Self {
            client,
            assembler: PromptAssembler::new(tools),
        }
    }

    /// Construct with a custom prompt assembler
    pub fn with_assembler(client: Arc<dyn CompletionClient>, assembler: PromptAssembler) -> Self {
        Self { client, assembler }
    }
}

#[async_trait]
impl Router for ZeroShotRouter {
    async fn decide(&self, input: &str, transcript: &Transcript) -> Result<Decision> {
        let prompt = self.assembler.assemble(
            input,
            transcript,
            self.observation_prefix(),
            self.router_prefix(),
        );
        // Stop before the model fabricates its own observation.
        let stop = vec![format!("\n{}", self.observation_prefix())];

        debug!(
            model = %self.client.model(),
            prompt_len = prompt.len(),
            transcript_entries = transcript.len(),
            "Requesting completion"
        );

        let raw_output = self
            .client
            .complete(CompletionRequest::new(prompt).with_stop(stop))
            .await?;
        let directive = parse_directive(&raw_output)?;

        debug!(directive = ?directive, "Parsed directive");

        Ok(Decision {
            directive,
            raw_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AgentError, MalformedCause};
    use crate::llm::{MockCompletionClient, MockStep};
    use crate::tools::Tool;

    fn registry() -> ToolRegistry {
        ToolRegistry::from_tools(vec![Tool::from_fn(
            "Search",
            "useful for search",
            |_| Ok("ok".to_string()),
        )])
        .unwrap()
    }

    #[tokio::test]
    async fn decide_parses_action_and_keeps_raw_output() {
        let client = Arc::new(MockCompletionClient::from_steps(
            "mock-model",
            vec![MockStep::text(
                "I should search.\nAction: Search\nAction Input: \"q\"",
            )],
        ));
        let router = ZeroShotRouter::from_client_and_tools(client.clone(), &registry());

        let decision = router.decide("task", &Transcript::new()).await.unwrap();
        assert_eq!(
            decision.directive,
            Directive::Action {
                tool_name: "Search".to_string(),
                tool_input: "q".to_string(),
            }
        );
        assert_eq!(
            decision.raw_output,
            "I should search.\nAction: Search\nAction Input: \"q\""
        );
    }

    #[tokio::test]
    async fn decide_sends_instructions_transcript_and_stop_sequence() {
        let client = Arc::new(MockCompletionClient::from_steps(
            "mock-model",
            vec![MockStep::text("Final Answer: done")],
        ));
        let router = ZeroShotRouter::from_client_and_tools(client.clone(), &registry());

        let mut transcript = Transcript::new();
        transcript.push_observation("seen before");
        router.decide("the task", &transcript).await.unwrap();

        let captured = client.captured_requests().await;
        assert_eq!(captured.len(), 1);
        let prompt = &captured[0].prompt;
        assert!(prompt.contains("Search: useful for search"));
        assert!(prompt.contains("Question: the task"));
        assert!(prompt.contains("\nObservation: seen before\n"));
        assert!(prompt.ends_with("Thought:"));
        assert_eq!(captured[0].stop, vec!["\nObservation: ".to_string()]);
    }

    #[tokio::test]
    async fn malformed_output_propagates_unchanged() {
        let client = Arc::new(MockCompletionClient::from_steps(
            "mock-model",
            vec![MockStep::text("no directive here")],
        ));
        let router = ZeroShotRouter::from_client_and_tools(client, &registry());

        let err = router.decide("task", &Transcript::new()).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::MalformedDirective(MalformedCause::MissingActionLine)
        ));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let client = Arc::new(MockCompletionClient::from_steps(
            "mock-model",
            vec![MockStep::error("backend down")],
        ));
        let router = ZeroShotRouter::from_client_and_tools(client, &registry());

        let err = router.decide("task", &Transcript::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::CompletionService(_)));
    }
}
