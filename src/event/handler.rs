//! Terminal event reader.
//!
//! A background task merges crossterm's async event stream with a tick
//! interval and forwards both over an unbounded channel.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use crossterm::event::EventStream;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{Event, DEFAULT_TICK_RATE};

/// Stream of terminal events and ticks.
pub struct EventHandler {
    events: UnboundedReceiverStream<Event>,
    shutdown: CancellationToken,
    _task: JoinHandle<()>,
}

impl EventHandler {
    /// Start reading terminal events with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE)
    }

    /// Start reading terminal events, ticking every `tick_rate`.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut ticks = tokio::time::interval(tick_rate);
            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => Event::Tick,
                    next = reader.next() => match next {
                        Some(Ok(raw)) => match Event::from_terminal(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(err)) => {
                            warn!(%err, "failed to read terminal event");
                            continue;
                        }
                        None => break,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            events: UnboundedReceiverStream::new(rx),
            shutdown,
            _task: task,
        }
    }

    /// Stop the reader task.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// Stream for EventHandler
impl Stream for EventHandler {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}
