//! Prompt assembly for the routing loop

use crate::agent::transcript::Transcript;
use crate::tools::ToolRegistry;

/// Default zero-shot instruction template.
///
/// Teaches the model the exact line grammar the directive parser expects.
/// `{tools}` and `{tool_names}` are filled at assembler construction,
/// `{input}` per run.
pub const BASE_TEMPLATE: &str = r#"Answer the following questions as best you can. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {input}"#;

/// Builds the per-iteration prompt from base instructions, the tool
/// catalog, and the running transcript.
///
/// The catalog renderings are substituted once at construction, so the
/// instruction block is stable for the assembler's lifetime. Substitution
/// is plain string replacement of the named slots.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    instructions: String,
}

impl PromptAssembler {
    /// Build an assembler over the default zero-shot template
    pub fn new(registry: &ToolRegistry) -> Self {
        Self::with_template(BASE_TEMPLATE, registry)
    }

    /// Build an assembler over a caller-supplied template with `{tools}`,
    /// `{tool_names}` and `{input}` placeholders
    pub fn with_template(template: &str, registry: &ToolRegistry) -> Self {
        let instructions = template
            .replace("{tools}", &registry.render_catalog())
            .replace("{tool_names}", &registry.render_names());
        Self { instructions }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Render the full prompt for one completion call: instructions with
    /// the task filled in, the rendered transcript, then the router prefix.
    pub fn assemble(
        &self,
        input: &str,
        transcript: &Transcript,
        observation_prefix: &str,
        router_prefix: &str,
    ) -> String {
        let mut prompt = self.instructions.replace("{input}", input);
        prompt.push('\n');
        if !transcript.is_empty() {
            prompt.push_str(&transcript.render(observation_prefix));
            prompt.push('\n');
        }
        prompt.push_str(router_prefix);
        prompt
    }
}
