use std::fmt;

/// One unit of progress emitted by the reasoning loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// Reasoning output from the model
    AgentMessage { messages: Vec<String> },
    /// Results of the tool calls requested by the previous agent message
    ToolMessage { messages: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    AgentMessage,
    ToolMessage,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AgentMessage => "agent-message",
            EventKind::ToolMessage => "tool-message",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AgentEvent {
    pub fn agent(message: impl Into<String>) -> Self {
        AgentEvent::AgentMessage { messages: vec![message.into()] }
    }

    pub fn tool(message: impl Into<String>) -> Self {
        AgentEvent::ToolMessage { messages: vec![message.into()] }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            AgentEvent::AgentMessage { .. } => EventKind::AgentMessage,
            AgentEvent::ToolMessage { .. } => EventKind::ToolMessage,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            AgentEvent::AgentMessage { messages } | AgentEvent::ToolMessage { messages } => messages,
        }
    }

    /// Content of the first message only; later messages of the event are not forwarded
    pub fn first_content(&self) -> Option<&str> {
        self.messages().first().map(String::as_str)
    }
}
