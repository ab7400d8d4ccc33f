//! Helpers for building and reading chat messages without spelling out every
//! optional field of the wire types.

use openai_dive::v1::resources::chat::ChatMessageContentPart;

use crate::{ChatMessage, ChatMessageContent, ToolCall};

pub fn system(text: impl Into<String>) -> ChatMessage {
    ChatMessage::System {
        content: ChatMessageContent::Text(text.into()),
        name: None,
    }
}

pub fn user(text: impl Into<String>) -> ChatMessage {
    ChatMessage::User {
        content: ChatMessageContent::Text(text.into()),
        name: None,
    }
}

pub fn assistant(text: impl Into<String>, calls: Vec<ToolCall>) -> ChatMessage {
    let text = text.into();
    ChatMessage::Assistant {
        content: if text.is_empty() { None } else { Some(ChatMessageContent::Text(text)) },
        tool_calls: if calls.is_empty() { None } else { Some(calls) },
        name: None,
        audio: None,
        reasoning_content: None,
        refusal: None,
    }
}

pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> ChatMessage {
    ChatMessage::Tool {
        content: ChatMessageContent::Text(content.into()),
        tool_call_id: tool_call_id.into(),
    }
}

/// Flatten the textual content of a message; non-text parts are skipped
pub fn content_text(message: &ChatMessage) -> String {
    match message {
        ChatMessage::System { content, .. } | ChatMessage::User { content, .. } => {
            flatten(content)
        }
        ChatMessage::Assistant { content, .. } => content.as_ref().map(flatten).unwrap_or_default(),
        ChatMessage::Tool { content, .. } => flatten(content),
        _ => String::new(),
    }
}

/// Tool calls requested by an assistant message
pub fn tool_calls(message: &ChatMessage) -> Vec<ToolCall> {
    match message {
        ChatMessage::Assistant { tool_calls: Some(calls), .. } => calls.clone(),
        _ => Vec::new(),
    }
}

fn flatten(content: &ChatMessageContent) -> String {
    match content {
        ChatMessageContent::Text(t) => t.clone(),
        ChatMessageContent::ContentPart(parts) => parts
            .iter()
            .filter_map(|p| match p {
                ChatMessageContentPart::Text(text_part) => Some(text_part.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ChatMessageContent::None => String::new(),
    }
}
