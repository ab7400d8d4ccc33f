use std::sync::Arc;

use agentkit_llm::{ChatCompletionFunction, ChatCompletionTool, ChatCompletionToolType, ToolCall};
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Execution(String),
}

/// A callable the model can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<String, ToolError>;

    /// Function tool advertised to the model
    fn definition(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: ChatCompletionFunction {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                parameters: self.parameters(),
            },
        }
    }
}

/// The tools bound to an agent
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Run one call and render its outcome as the content handed back to the model.
    /// Failures become error text so the model can correct itself.
    pub async fn invoke(&self, call: &ToolCall) -> String {
        let name = call.function.name.as_str();
        let Some(tool) = self.find(name) else {
            warn!("Model requested unknown tool {}", name);
            return format!("Error: Tool \"{}\" not found.\n Please fix your mistakes.", name);
        };

        let outcome = match parse_arguments(&call.function.arguments) {
            Ok(args) => {
                debug!("Invoking tool {} ({})", name, call.id);
                tool.execute(args).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                format!("Error: {}\n Please fix your mistakes.", e)
            }
        }
    }

    /// Run all calls concurrently; results keep the order of `calls`
    pub async fn invoke_all(&self, calls: &[ToolCall]) -> Vec<String> {
        join_all(calls.iter().map(|call| self.invoke(call))).await
    }
}

fn parse_arguments(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
