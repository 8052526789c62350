//! Append-only JSONL trace for loop execution diagnostics.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::agent::directive::Directive;

/// Append-only JSONL execution trace.
///
/// One JSON object per line, one line per loop event. Write failures are
/// logged and swallowed; tracing never fails a run.
#[derive(Debug, Clone)]
pub struct TraceLog {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct TraceEntry {
    timestamp: String,
    iteration: usize,
    event_type: &'static str,
    data: Value,
}

impl TraceLog {
    /// Create a new trace log at path, creating parent directories if needed.
    pub fn new(path: PathBuf) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, iteration: usize, event_type: &'static str, data: Value) {
        let entry = TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            iteration,
            event_type,
            data,
        };

        if let Err(e) = self.try_append(&entry) {
            warn!(error = %e, path = %self.path.display(), "Trace write failed");
        }
    }

    fn try_append(&self, entry: &TraceEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")
    }

    pub fn log_start(&self, execution_id: &str, input: &str, tool_names: &str) {
        self.append(
            0,
            "run_start",
            json!({
                "execution_id": execution_id,
                "input": input,
                "tools": tool_names,
            }),
        );
    }

    pub fn log_iteration_begin(&self, iteration: usize) {
        self.append(iteration, "iteration_begin", json!({}));
    }

    pub fn log_decision(&self, iteration: usize, directive: &Directive) {
        self.append(
            iteration,
            "decision",
            json!({
                "directive": serde_json::to_value(directive).unwrap_or(Value::Null),
            }),
        );
    }

    pub fn log_observation(&self, iteration: usize, tool_name: &str, observation: &str) {
        self.append(
            iteration,
            "observation",
            json!({
                "tool": tool_name,
                "observation": observation,
            }),
        );
    }

    pub fn log_finished(&self, iteration: usize, output: &str) {
        self.append(
            iteration,
            "run_finished",
            json!({
                "output": output,
            }),
        );
    }

    pub fn log_error(&self, iteration: usize, error: &str) {
        self.append(
            iteration,
            "error",
            json!({
                "error": error,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_append_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let trace = TraceLog::new(path.clone()).unwrap();

        trace.log_start("exec-1", "hello", "Search, Calculator");
        trace.log_iteration_begin(1);
        trace.log_decision(
            1,
            &Directive::Action {
                tool_name: "Search".to_string(),
                tool_input: "q".to_string(),
            },
        );
        trace.log_observation(1, "Search", "Paris");
        trace.log_finished(2, "Paris");

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for line in lines {
            let parsed: Value = serde_json::from_str(line).unwrap();
            assert!(parsed.get("timestamp").is_some());
            assert!(parsed.get("event_type").is_some());
            assert!(parsed.get("data").is_some());
        }
    }

    #[test]
    fn trace_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("trace.jsonl");
        let trace = TraceLog::new(path.clone()).unwrap();

        trace.log_error(3, "boom");
        assert!(path.exists());
    }
}
