//! Tools module - capability records and their registry

mod registry;
mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolFn, ToolFuture};
