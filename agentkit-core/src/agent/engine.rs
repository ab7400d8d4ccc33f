use agentkit_llm::ChatMessage;
use futures::stream::BoxStream;

use super::AgentEvent;
use crate::AgentError;

pub const DEFAULT_THREAD_ID: &str = "CDP Agentkit Chatbot API";

/// Lazy, single-consumer sequence of events for one prompt.
/// Dropping it abandons the underlying computation.
pub type EventStream = BoxStream<'static, Result<AgentEvent, AgentError>>;

/// Selects the conversation memory a run reads from and checkpoints into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadConfig {
    pub thread_id: String,
}

impl ThreadConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self { thread_id: thread_id.into() }
    }
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THREAD_ID)
    }
}

/// A reasoning loop that turns new input messages into a stream of events.
///
/// `stream` only fails when the computation cannot be started at all. Failures
/// after that point are yielded as `Err` items of the stream.
pub trait ReasoningEngine: Send + Sync {
    fn stream(&self, messages: Vec<ChatMessage>, thread: &ThreadConfig) -> Result<EventStream, AgentError>;
}
