use std::collections::HashMap;
use std::sync::Arc;

use agentkit_llm::ChatMessage;
use tokio::sync::RwLock;

/// In-memory conversation history, keyed by thread id.
/// Lost on restart.
#[derive(Clone, Default)]
pub struct MemoryCheckpointer {
    threads: Arc<RwLock<HashMap<String, Vec<ChatMessage>>>>,
}

impl MemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn history(&self, thread_id: &str) -> Vec<ChatMessage> {
        self.threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn append(&self, thread_id: &str, messages: impl IntoIterator<Item = ChatMessage>) {
        self.threads
            .write()
            .await
            .entry(thread_id.to_string())
            .or_default()
            .extend(messages);
    }

    pub async fn len(&self, thread_id: &str) -> usize {
        self.threads
            .read()
            .await
            .get(thread_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
