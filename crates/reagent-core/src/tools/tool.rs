//! Tool capability record

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;

pub type ToolFuture = BoxFuture<'static, Result<String>>;
pub type ToolFn = Arc<dyn Fn(String) -> ToolFuture + Send + Sync>;

/// A named, described, invocable capability.
///
/// A tool is a closed record: name, description, and the function to call,
/// not a trait object hierarchy. The name must be non-empty and is the key
/// the model uses to select the tool; the description is rendered into the
/// prompt catalog verbatim. Immutable once registered.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    invoke_fn: ToolFn,
}

impl Tool {
    /// Create a tool from an async function.
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            invoke_fn: Arc::new(move |input| Box::pin(f(input))),
        }
    }

    /// Create a tool from a plain synchronous function.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(String) -> Result<String> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self {
            name: name.into(),
            description: description.into(),
            invoke_fn: Arc::new(move |input| {
                let f = f.clone();
                Box::pin(async move { f(input) })
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Invoke the tool with the given input.
    pub async fn invoke(&self, input: impl Into<String>) -> Result<String> {
        (self.invoke_fn)(input.into()).await
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
