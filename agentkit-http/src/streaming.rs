use agentkit_core::{AgentError, AgentEvent};
use axum::response::sse::Event;
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Payload of the frame that marks a normally completed stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Trait for formatting AgentEvents into the payload of one data frame
pub trait EventFormatter: Send {
    type Output: Serialize + Send;

    /// Returns None if the event should not produce a frame
    fn format_event(&mut self, event: &AgentEvent) -> Option<Self::Output>;
}

/// Envelope of a data frame: `{"chunk": "<text>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub chunk: String,
}

/// Forwards the first content string of every event; empty content is skipped.
/// Later content strings of a multi-message event are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkFormatter;

impl EventFormatter for ChunkFormatter {
    type Output = Chunk;

    fn format_event(&mut self, event: &AgentEvent) -> Option<Chunk> {
        let content = event.first_content()?;
        if content.is_empty() {
            return None;
        }
        if event.messages().len() > 1 {
            debug!("{} carried {} messages, forwarding the first", event.kind(), event.messages().len());
        }
        Some(Chunk { chunk: content.to_string() })
    }
}

/// Raised into the response body when the agent fails after frames were sent.
/// The transport then closes the connection without the `[DONE]` frame.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("agent failed mid-stream: {0}")]
    MidStream(#[source] AgentError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Streaming,
    Completed,
    Aborted,
}

/// Drains the events of one prompt run and turns them into SSE frames, in order,
/// one frame per forwarded event, followed by the `[DONE]` frame.
pub struct StreamRelay<S, F> {
    events: S,
    formatter: F,
    request_id: String,
    state: RelayState,
    pending: Option<Event>,
    exhausted: bool,
    frames: usize,
}

impl<S, F> StreamRelay<S, F>
where
    S: Stream<Item = Result<AgentEvent, AgentError>> + Unpin + Send + 'static,
    F: EventFormatter + 'static,
{
    pub fn new(events: S, formatter: F, request_id: String) -> Self {
        Self {
            events,
            formatter,
            request_id,
            state: RelayState::Idle,
            pending: None,
            exhausted: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Drive the run until the first frame is ready, the run ends, or it fails.
    ///
    /// Nothing has been sent to the client yet, so a failure here can still be
    /// answered with an error status.
    pub async fn prime(&mut self) -> Result<(), AgentError> {
        if self.state != RelayState::Idle {
            return Ok(());
        }
        loop {
            match self.events.next().await {
                Some(Ok(event)) => {
                    if let Some(frame) = self.encode(&event) {
                        self.pending = Some(frame);
                        self.state = RelayState::Streaming;
                        return Ok(());
                    }
                }
                Some(Err(e)) => {
                    self.state = RelayState::Aborted;
                    return Err(e);
                }
                None => {
                    self.exhausted = true;
                    self.state = RelayState::Streaming;
                    return Ok(());
                }
            }
        }
    }

    /// Serialize the formatted event into a data frame
    fn encode(&mut self, event: &AgentEvent) -> Option<Event> {
        let output = self.formatter.format_event(event)?;
        match serde_json::to_string(&output) {
            Ok(json) => Some(Event::default().data(json)),
            Err(e) => {
                error!("[{}] Failed to serialize event: {}", self.request_id, e);
                None
            }
        }
    }

    async fn next_frame(&mut self) -> Option<Result<Event, RelayError>> {
        match self.state {
            RelayState::Completed | RelayState::Aborted => return None,
            RelayState::Idle => self.state = RelayState::Streaming,
            RelayState::Streaming => {}
        }

        if let Some(frame) = self.pending.take() {
            self.frames += 1;
            return Some(Ok(frame));
        }

        while !self.exhausted {
            match self.events.next().await {
                Some(Ok(event)) => {
                    if let Some(frame) = self.encode(&event) {
                        self.frames += 1;
                        return Some(Ok(frame));
                    }
                }
                Some(Err(e)) => {
                    error!("[{}] Agent failed after {} frame(s): {}", self.request_id, self.frames, e);
                    self.state = RelayState::Aborted;
                    return Some(Err(RelayError::MidStream(e)));
                }
                None => self.exhausted = true,
            }
        }

        info!("[{}] Stream completed with {} frame(s)", self.request_id, self.frames);
        self.state = RelayState::Completed;
        Some(Ok(Event::default().data(DONE_SENTINEL)))
    }

    /// SSE body: data frames as they are produced, then `[DONE]`.
    /// Dropping the stream (client gone) drops the run and frees the thread.
    pub fn into_sse_stream(self) -> impl Stream<Item = Result<Event, RelayError>> + Send + 'static {
        futures::stream::unfold(self, |mut relay| async move {
            let frame = relay.next_frame().await?;
            Some((frame, relay))
        })
    }
}

impl<S, F> Drop for StreamRelay<S, F> {
    fn drop(&mut self) {
        if self.state == RelayState::Streaming {
            warn!(
                "[{}] Client disconnected after {} frame(s), abandoning agent run",
                self.request_id, self.frames
            );
        }
    }
}
