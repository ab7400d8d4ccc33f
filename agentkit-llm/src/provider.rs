use async_trait::async_trait;

use crate::{ChatCompletionTool, ChatMessage, LlmError};

/// Something that can answer a chat-completion request with one assistant message.
///
/// `LlmClient` is the HTTP implementation; the agent loop only depends on this trait
/// so it can be driven by scripted providers in tests.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ChatMessage, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
