//! Append-only conversational transcript

use serde::{Deserialize, Serialize};

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TranscriptEntry {
    /// Raw model output for one reasoning step
    ModelOutput(String),
    /// Result of executing a tool
    Observation(String),
}

/// Ordered history of reasoning text and observations.
///
/// Append-only: entries are never mutated in place. The rendered form is
/// the suffix appended to the prompt on each iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_model_output(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::ModelOutput(text.into()));
    }

    pub fn push_observation(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::Observation(text.into()));
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render for prompt injection: entries joined by single newlines, model
    /// output verbatim, observations carrying the given prefix.
    pub fn render(&self, observation_prefix: &str) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                TranscriptEntry::ModelOutput(text) => text.clone(),
                TranscriptEntry::Observation(text) => format!("{observation_prefix}{text}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
