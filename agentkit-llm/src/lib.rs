pub mod client;
pub mod error;
pub mod message;
pub mod provider;

pub use client::{LlmClient, LlmConfig};
pub use error::LlmError;
pub use message::{assistant, content_text, system, tool_calls, tool_result, user};
pub use provider::ChatProvider;

pub use openai_dive::v1::resources::chat::{
    ChatCompletionFunction, ChatCompletionParameters, ChatCompletionParametersBuilder,
    ChatCompletionResponse, ChatCompletionTool, ChatCompletionToolType, ChatMessage,
    ChatMessageContent, Function, ToolCall,
};
