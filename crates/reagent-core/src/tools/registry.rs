//! Tool registry for managing available tools

use crate::error::{AgentError, Result};
use crate::tools::tool::Tool;

/// Ordered registry of available tools.
///
/// Registration order is preserved: it determines catalog rendering order,
/// which the model sees, so it must be stable across calls. Names are
/// unique; lookups are by exact match.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Build a registry from tools, registering in order.
    pub fn from_tools(tools: impl IntoIterator<Item = Tool>) -> Result<Self> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool, keeping registration order
    pub fn register(&mut self, tool: Tool) -> Result<()> {
        if self.has(tool.name()) {
            return Err(AgentError::DuplicateToolName(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by exact name
    pub fn lookup(&self, name: &str) -> Result<&Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// All tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render `name: description` lines for the prompt, in registration order.
    pub fn render_catalog(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render comma-joined tool names for the prompt, in registration order.
    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }
}
