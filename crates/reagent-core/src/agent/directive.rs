//! Directive extraction from raw model output

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, MalformedCause, Result};

pub const ACTION_PREFIX: &str = "Action: ";
pub const ACTION_INPUT_PREFIX: &str = "Action Input: ";
pub const FINAL_ANSWER_PREFIX: &str = "Final Answer: ";

const FINAL_ANSWER_MARKER: &str = "Final Answer";

/// Structured decision extracted from one block of model output.
///
/// Produced fresh each iteration; never persisted beyond the current
/// decision step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// Invoke a tool with the given input
    Action {
        tool_name: String,
        tool_input: String,
    },
    /// Terminate the loop with a final answer
    Finish { output: String },
}

/// Parse one block of model output into a directive.
///
/// Line-oriented and back-to-front: empty lines are dropped, then the last
/// line is checked for a final answer, then the trailing
/// `Action:` / `Action Input:` pair is required. The tool input has
/// surrounding spaces stripped and one layer of symmetric double quotes
/// removed; the tool name is taken verbatim after its prefix.
pub fn parse_directive(raw_output: &str) -> Result<Directive> {
    let lines: Vec<&str> = raw_output.split('\n').filter(|line| !line.is_empty()).collect();

    let Some(&last) = lines.last() else {
        return Err(AgentError::MalformedDirective(MalformedCause::EmptyOutput));
    };

    // A final answer short-circuits action parsing. A bare marker with
    // nothing after the full prefix yields an empty answer.
    if last.starts_with(FINAL_ANSWER_MARKER) {
        let output = last.get(FINAL_ANSWER_PREFIX.len()..).unwrap_or("");
        return Ok(Directive::Finish {
            output: output.to_string(),
        });
    }

    // An action needs a line above the input line; a single leftover line
    // cannot carry one.
    if lines.len() < 2 {
        return Err(AgentError::MalformedDirective(
            MalformedCause::MissingActionLine,
        ));
    }

    let Some(tool_input) = last.strip_prefix(ACTION_INPUT_PREFIX) else {
        return Err(AgentError::MalformedDirective(
            MalformedCause::MissingActionInputLine,
        ));
    };

    let Some(tool_name) = lines[lines.len() - 2].strip_prefix(ACTION_PREFIX) else {
        return Err(AgentError::MalformedDirective(
            MalformedCause::MissingActionLine,
        ));
    };

    Ok(Directive::Action {
        tool_name: tool_name.to_string(),
        tool_input: clean_tool_input(tool_input),
    })
}

/// Strip surrounding spaces, then one layer of double quotes if the input
/// is wrapped on both ends.
fn clean_tool_input(raw: &str) -> String {
    let trimmed = raw.trim_matches(' ');
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
