use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::{Stream, StreamExt};
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use crate::agent::{AgentEvent, EventStream, ThreadConfig};
use crate::AgentError;

/// Exclusive hold on the conversation thread for the duration of one prompt run.
/// Dropping it lets the next queued prompt proceed.
pub struct ThreadLease {
    _thread_guard: OwnedMutexGuard<ThreadConfig>,
    thread_id: String,
    started: Instant,
}

impl ThreadLease {
    pub(crate) fn new(thread_guard: OwnedMutexGuard<ThreadConfig>) -> Self {
        let thread_id = thread_guard.thread_id.clone();
        Self {
            _thread_guard: thread_guard,
            thread_id,
            started: Instant::now(),
        }
    }
}

impl Drop for ThreadLease {
    fn drop(&mut self) {
        debug!(
            "[{}] Prompt run released after {:?}, releasing thread lock",
            self.thread_id,
            self.started.elapsed()
        );
    }
}

/// Events of one submitted prompt.
///
/// Holds the thread lease, so the conversation stays reserved until the run is
/// drained or dropped.
pub struct PromptRun {
    events: EventStream,
    _lease: ThreadLease,
}

impl PromptRun {
    pub(crate) fn new(events: EventStream, lease: ThreadLease) -> Self {
        Self { events, _lease: lease }
    }
}

impl Stream for PromptRun {
    type Item = Result<AgentEvent, AgentError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_next_unpin(cx)
    }
}
