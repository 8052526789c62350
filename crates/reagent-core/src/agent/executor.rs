//! Routing loop executor

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::agent::config::{CancelRequest, LoopConfig, ToolFailurePolicy, UnknownToolPolicy};
use crate::agent::directive::Directive;
use crate::agent::router::{Router, ZeroShotRouter};
use crate::agent::state::{RoutingState, RunOutcome};
use crate::error::{AgentError, Result};
use crate::llm::CompletionClient;
use crate::tools::ToolRegistry;

/// The reasoning-and-acting control loop.
///
/// Repeatedly asks the router for a decision, executes the chosen tool,
/// appends the observation to the transcript, and repeats until the model
/// finishes or a limit is hit. Each `run` owns a fresh state; a single
/// loop value can serve many sequential or concurrent runs.
pub struct RoutingLoop {
    router: Arc<dyn Router>,
    tools: Arc<ToolRegistry>,
    config: LoopConfig,
    cancel_rx: Option<Mutex<mpsc::Receiver<CancelRequest>>>,
}

impl RoutingLoop {
    /// Create a loop from a router, a tool registry, and a config
    pub fn new(router: Arc<dyn Router>, tools: Arc<ToolRegistry>, config: LoopConfig) -> Self {
        Self {
            router,
            tools,
            config,
            cancel_rx: None,
        }
    }

    /// Wire up the default zero-shot router over a completion client
    pub fn zero_shot(client: Arc<dyn CompletionClient>, tools: Arc<ToolRegistry>) -> Self {
        let router = Arc::new(ZeroShotRouter::from_client_and_tools(client, &tools));
        Self::new(router, tools, LoopConfig::new())
    }

    /// Replace the loop configuration
    pub fn with_config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a channel for cooperative cancellation, checked between
    /// iterations
    pub fn with_cancel_channel(mut self, rx: mpsc::Receiver<CancelRequest>) -> Self {
        self.cancel_rx = Some(Mutex::new(rx));
        self
    }

    /// Run the loop to completion for one task.
    ///
    /// Returns the final answer on success; any failure is a typed error
    /// naming the stage that failed.
    pub async fn run(&self, input: impl Into<String>) -> Result<RunOutcome> {
        let input = input.into();
        let mut state = RoutingState::new(self.config.max_iterations);

        info!(
            execution_id = %state.execution_id,
            max_iterations = self.config.max_iterations,
            tools = %self.tools.render_names(),
            "Starting routing loop"
        );
        if let Some(trace) = &self.config.trace {
            trace.log_start(
                &state.execution_id.to_string(),
                &input,
                &self.tools.render_names(),
            );
        }

        match self.drive(&input, &mut state).await {
            Ok(output) => {
                state.finish(&output);
                if let Some(trace) = &self.config.trace {
                    trace.log_finished(state.iteration, &output);
                }
                info!(
                    execution_id = %state.execution_id,
                    iterations = state.iteration,
                    elapsed_ms = state.elapsed_ms(),
                    "Routing loop finished"
                );
                Ok(RunOutcome {
                    output,
                    iterations: state.iteration,
                    state,
                })
            }
            Err(e) => {
                state.fail(e.to_string());
                if let Some(trace) = &self.config.trace {
                    trace.log_error(state.iteration, &e.to_string());
                }
                warn!(
                    execution_id = %state.execution_id,
                    iterations = state.iteration,
                    error = %e,
                    "Routing loop failed"
                );
                Err(e)
            }
        }
    }

    async fn drive(&self, input: &str, state: &mut RoutingState) -> Result<String> {
        loop {
            if let Some(request) = self.poll_cancellation().await {
                warn!(
                    execution_id = %state.execution_id,
                    reason = ?request.reason,
                    "Cancellation requested"
                );
                return Err(AgentError::Cancelled);
            }

            if let Some(trace) = &self.config.trace {
                trace.log_iteration_begin(state.iteration + 1);
            }

            let decision = match self.config.completion_timeout {
                Some(limit) => timeout(limit, self.router.decide(input, &state.transcript))
                    .await
                    .map_err(|_| {
                        AgentError::CompletionService(format!("timed out after {limit:?}"))
                    })??,
                None => self.router.decide(input, &state.transcript).await?,
            };
            if let Some(trace) = &self.config.trace {
                trace.log_decision(state.iteration + 1, &decision.directive);
            }

            match decision.directive {
                Directive::Finish { output } => {
                    debug!(execution_id = %state.execution_id, "Model produced final answer");
                    return Ok(output);
                }
                Directive::Action {
                    tool_name,
                    tool_input,
                } => {
                    let observation = self.observe(&tool_name, tool_input).await?;
                    if let Some(trace) = &self.config.trace {
                        trace.log_observation(state.iteration + 1, &tool_name, &observation);
                    }

                    state.transcript.push_model_output(decision.raw_output);
                    state.transcript.push_observation(observation);

                    if !state.next_iteration() {
                        warn!(
                            execution_id = %state.execution_id,
                            limit = state.max_iterations,
                            "Iteration budget exhausted"
                        );
                        return Err(AgentError::IterationLimitExceeded(state.max_iterations));
                    }
                }
            }
        }
    }

    /// Resolve and invoke one tool, producing the observation text.
    ///
    /// Unknown tools and invocation failures either fail the run or are
    /// turned into synthesized observations, per the configured policies.
    async fn observe(&self, tool_name: &str, tool_input: String) -> Result<String> {
        let tool = match self.tools.lookup(tool_name) {
            Ok(tool) => tool,
            Err(err) => {
                return match self.config.unknown_tool_policy {
                    UnknownToolPolicy::Fail => Err(err),
                    UnknownToolPolicy::Observe => {
                        warn!(tool = %tool_name, "Unknown tool requested, continuing");
                        Ok(format!("unknown tool: {tool_name}"))
                    }
                };
            }
        };

        debug!(tool = %tool_name, input = %tool_input, "Invoking tool");
        let message = match timeout(self.config.tool_timeout, tool.invoke(tool_input)).await {
            Ok(Ok(observation)) => {
                debug!(tool = %tool_name, observation_len = observation.len(), "Tool returned");
                return Ok(observation);
            }
            Ok(Err(AgentError::ToolInvocation { message, .. })) => message,
            Ok(Err(other)) => other.to_string(),
            Err(_) => format!("timed out after {:?}", self.config.tool_timeout),
        };

        match self.config.tool_failure_policy {
            ToolFailurePolicy::Fail => Err(AgentError::ToolInvocation {
                name: tool_name.to_string(),
                message,
            }),
            ToolFailurePolicy::Observe => {
                warn!(tool = %tool_name, error = %message, "Tool failed, continuing");
                Ok(format!("tool {tool_name} failed: {message}"))
            }
        }
    }

    async fn poll_cancellation(&self) -> Option<CancelRequest> {
        let rx = self.cancel_rx.as_ref()?;
        rx.lock().await.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::agent::router::Decision;
    use crate::agent::transcript::Transcript;
    use crate::agent::directive::parse_directive;
    use crate::llm::{MockCompletionClient, MockStep};
    use crate::tools::Tool;

    /// Router variant that replays canned model output without a
    /// completion client, with its own prefix strings.
    struct ScriptRouter {
        outputs: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptRouter {
        fn new(outputs: Vec<&'static str>) -> Self {
            Self {
                outputs: Mutex::new(VecDeque::from(outputs)),
            }
        }
    }

    #[async_trait]
    impl Router for ScriptRouter {
        fn observation_prefix(&self) -> &str {
            "Result> "
        }

        fn router_prefix(&self) -> &str {
            "Next>"
        }

        async fn decide(&self, _input: &str, _transcript: &Transcript) -> Result<Decision> {
            let raw = self
                .outputs
                .lock()
                .await
                .pop_front()
                .ok_or_else(|| AgentError::CompletionService("script exhausted".to_string()))?;
            Ok(Decision {
                directive: parse_directive(raw)?,
                raw_output: raw.to_string(),
            })
        }
    }

    fn echo_registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::from_tools(vec![Tool::from_fn("echo", "echoes input", |input| {
                Ok(format!("echo: {input}"))
            })])
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn custom_router_variant_drives_the_loop() {
        let router = Arc::new(ScriptRouter::new(vec![
            "Action: echo\nAction Input: \"hello\"",
            "Final Answer: done",
        ]));
        let agent = RoutingLoop::new(router, echo_registry(), LoopConfig::new());

        let outcome = agent.run("task").await.unwrap();
        assert_eq!(outcome.output, "done");
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.state.transcript.len(), 2);
    }

    #[tokio::test]
    async fn cancellation_before_first_iteration_skips_all_work() {
        let client = Arc::new(MockCompletionClient::new("mock-model"));
        let (tx, rx) = mpsc::channel(1);
        let agent =
            RoutingLoop::zero_shot(client.clone(), echo_registry()).with_cancel_channel(rx);

        tx.send(CancelRequest::new()).await.unwrap();
        let err = agent.run("task").await.unwrap_err();

        assert!(matches!(err, AgentError::Cancelled));
        assert_eq!(client.call_count().await, 0);
    }

    #[tokio::test]
    async fn cancellation_between_iterations_stops_further_tool_calls() {
        let (tx, rx) = mpsc::channel(1);
        // The tool itself requests cancellation, so exactly one invocation
        // happens before the next-iteration check observes it.
        let tools = Arc::new(
            ToolRegistry::from_tools(vec![Tool::new("stop", "requests a stop", move |_| {
                let tx = tx.clone();
                async move {
                    tx.send(CancelRequest::with_reason("user asked")).await.ok();
                    Ok("stopping".to_string())
                }
            })])
            .unwrap(),
        );
        let router = Arc::new(ScriptRouter::new(vec![
            "Action: stop\nAction Input: \"x\"",
            "Action: stop\nAction Input: \"x\"",
            "Action: stop\nAction Input: \"x\"",
        ]));
        let agent = RoutingLoop::new(router, tools, LoopConfig::new()).with_cancel_channel(rx);

        let err = agent.run("task").await.unwrap_err();
        assert!(matches!(err, AgentError::Cancelled));
    }

    #[tokio::test]
    async fn dropped_cancel_sender_does_not_cancel() {
        let (tx, rx) = mpsc::channel::<CancelRequest>(1);
        drop(tx);
        let router = Arc::new(ScriptRouter::new(vec!["Final Answer: fine"]));
        let agent =
            RoutingLoop::new(router, echo_registry(), LoopConfig::new()).with_cancel_channel(rx);

        let outcome = agent.run("task").await.unwrap();
        assert_eq!(outcome.output, "fine");
    }

    #[tokio::test]
    async fn completion_timeout_fails_the_run() {
        let client = Arc::new(MockCompletionClient::from_steps(
            "mock-model",
            vec![MockStep::text("Final Answer: late").with_delay(200)],
        ));
        let config = LoopConfig::new().with_completion_timeout(Duration::from_millis(20));
        let agent = RoutingLoop::zero_shot(client, echo_registry()).with_config(config);

        let err = agent.run("task").await.unwrap_err();
        match err {
            AgentError::CompletionService(msg) => assert!(msg.contains("timed out")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
