//! Routing loop state management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::transcript::Transcript;

/// Loop execution status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoopStatus {
    Running,
    Finished,
    Failed { error: String },
}

/// Per-run loop state.
///
/// Created at the start of a run, owned exclusively by that run, and never
/// reused after reaching a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingState {
    /// Execution ID
    pub execution_id: Uuid,

    /// Current status
    pub status: LoopStatus,

    /// Accumulated reasoning text and observations
    pub transcript: Transcript,

    /// Completed iteration count
    pub iteration: usize,

    /// Maximum iterations allowed
    pub max_iterations: usize,

    /// Final answer (if finished)
    pub final_output: Option<String>,

    /// Execution timestamps
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl RoutingState {
    /// Create a new running state with an empty transcript
    pub fn new(max_iterations: usize) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: LoopStatus::Running,
            transcript: Transcript::new(),
            iteration: 0,
            max_iterations,
            final_output: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Finish with the final answer
    pub fn finish(&mut self, output: impl Into<String>) {
        self.final_output = Some(output.into());
        self.status = LoopStatus::Finished;
        self.ended_at = Some(Utc::now());
    }

    /// Mark as failed
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = LoopStatus::Failed {
            error: error.into(),
        };
        self.ended_at = Some(Utc::now());
    }

    /// Check if terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, LoopStatus::Running)
    }

    /// Increment the iteration count, returns false once the budget is used up
    pub fn next_iteration(&mut self) -> bool {
        self.iteration += 1;
        self.iteration < self.max_iterations
    }

    pub fn elapsed_ms(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output: String,
    pub iterations: usize,
    pub state: RoutingState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_running() {
        let state = RoutingState::new(10);
        assert_eq!(state.status, LoopStatus::Running);
        assert_eq!(state.iteration, 0);
        assert_eq!(state.max_iterations, 10);
        assert!(state.transcript.is_empty());
        assert!(!state.is_terminal());
        assert!(state.ended_at.is_none());
    }

    #[test]
    fn finish_records_output_and_timestamp() {
        let mut state = RoutingState::new(10);
        state.finish("Paris");

        assert_eq!(state.status, LoopStatus::Finished);
        assert_eq!(state.final_output, Some("Paris".to_string()));
        assert!(state.is_terminal());
        assert!(state.ended_at.is_some());
    }

    #[test]
    fn fail_records_error() {
        let mut state = RoutingState::new(10);
        state.fail("something broke");

        assert!(matches!(
            state.status,
            LoopStatus::Failed { ref error } if error == "something broke"
        ));
        assert!(state.is_terminal());
    }

    #[test]
    fn next_iteration_flags_budget_exhaustion() {
        let mut state = RoutingState::new(3);

        assert!(state.next_iteration()); // 1
        assert!(state.next_iteration()); // 2
        assert!(!state.next_iteration()); // 3, budget used up

        assert_eq!(state.iteration, 3);
    }

    #[test]
    fn distinct_states_get_distinct_execution_ids() {
        assert_ne!(
            RoutingState::new(1).execution_id,
            RoutingState::new(1).execution_id
        );
    }
}
