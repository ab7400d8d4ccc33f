use std::sync::Arc;

use agentkit_llm::{content_text, system, tool_calls, tool_result, ChatMessage, ChatProvider};
use async_stream::stream;
use tracing::{debug, info};

use super::{AgentEvent, EventStream, MemoryCheckpointer, ReasoningEngine, ThreadConfig};
use crate::tools::ToolSet;
use crate::AgentError;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful agent capable of interacting on-chain. \
Use the tools provided by CDP Agentkit effectively. and you will always pick network as base-sepolia";

/// Events emitted per run before it is stopped
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Reason-and-act loop: call the model, run the tools it asks for, feed the
/// results back, until the model answers without tool calls.
///
/// Each model reply is emitted as an agent message; the results of one round of
/// tool calls are emitted together as one tool message.
#[derive(Clone)]
pub struct ReactAgent {
    llm: Arc<dyn ChatProvider>,
    tools: ToolSet,
    memory: MemoryCheckpointer,
    system_prompt: String,
    max_steps: usize,
}

impl ReactAgent {
    pub fn new(llm: Arc<dyn ChatProvider>, tools: ToolSet) -> Self {
        Self {
            llm,
            tools,
            memory: MemoryCheckpointer::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn memory(&self) -> &MemoryCheckpointer {
        &self.memory
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

impl ReasoningEngine for ReactAgent {
    fn stream(&self, messages: Vec<ChatMessage>, thread: &ThreadConfig) -> Result<EventStream, AgentError> {
        if messages.is_empty() {
            return Err(AgentError::invocation("no input messages"));
        }

        let llm = self.llm.clone();
        let tools = self.tools.clone();
        let memory = self.memory.clone();
        let system_prompt = self.system_prompt.clone();
        let max_steps = self.max_steps;
        let thread_id = thread.thread_id.clone();

        let stream = stream! {
            memory.append(&thread_id, messages).await;
            let definitions = tools.definitions();
            let mut steps = 0usize;

            loop {
                if steps >= max_steps {
                    yield Err(AgentError::StepLimit(max_steps));
                    return;
                }

                let mut request = vec![system(system_prompt.as_str())];
                request.extend(memory.history(&thread_id).await);

                debug!("[{}] Calling {} with {} messages", thread_id, llm.model(), request.len());
                let reply = match llm.chat(&request, &definitions).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        yield Err(AgentError::from(e));
                        return;
                    }
                };
                let calls = tool_calls(&reply);
                let text = content_text(&reply);
                steps += 1;

                if calls.is_empty() {
                    memory.append(&thread_id, [reply]).await;
                    yield Ok(AgentEvent::agent(text));
                    break;
                }

                yield Ok(AgentEvent::agent(text));

                info!("[{}] Running {} tool call(s)", thread_id, calls.len());
                let outputs = tools.invoke_all(&calls).await;
                steps += 1;

                // the assistant turn and its results are stored together
                let mut checkpoint = vec![reply];
                checkpoint.extend(
                    calls
                        .iter()
                        .zip(outputs.iter())
                        .map(|(call, output)| tool_result(call.id.as_str(), output.as_str())),
                );
                memory.append(&thread_id, checkpoint).await;

                yield Ok(AgentEvent::ToolMessage { messages: outputs });
            }
        };

        Ok(Box::pin(stream))
    }
}
