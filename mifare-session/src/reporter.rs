// mifare-session/src/reporter.rs

//! Progress/result reporting toward the caller.
//!
//! The session driver pushes every emission through a [`Reporter`]; a report
//! call must never block round execution. [`ChannelReporter`] crosses an
//! mpsc channel (the caller drains it from its own thread, the way a UI
//! bridge posts to its event loop); [`RecordingReporter`] accumulates events
//! for assertions in tests.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::types::{OperationKind, ReadRecord, WriteRecord};

/// One emission from the session driver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Event {
    /// Work remains after a round; counts are monotonically non-decreasing
    /// within one session.
    Progress {
        kind: OperationKind,
        total: usize,
        completed: usize,
    },
    /// Read session finished; every target eventually succeeded.
    ReadComplete { records: Vec<ReadRecord> },
    /// Write session finished; records carry per-target success or failure.
    WriteComplete { records: Vec<WriteRecord> },
    /// Reset session finished.
    ResetComplete { sectors_reset: usize },
    /// A session-level failure, with a code from the fixed vocabulary.
    Error { code: &'static str, message: String },
}

impl Event {
    /// Build an error event from a crate error.
    pub fn from_error(err: &crate::Error) -> Self {
        Event::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Sink for session events. Implementations must not block the caller.
pub trait Reporter: Send {
    /// Deliver one event.
    fn report(&self, event: Event);
}

/// Reporter backed by an mpsc sender. Sending never blocks; a disconnected
/// receiver just discards the event.
pub struct ChannelReporter {
    tx: mpsc::Sender<Event>,
}

impl ChannelReporter {
    /// Create a reporter plus the receiving end the caller drains.
    pub fn new() -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, event: Event) {
        if self.tx.send(event).is_err() {
            log::debug!("event receiver dropped; emission discarded");
        }
    }
}

/// Reporter that records events for later inspection. Clones share the same
/// buffer, so tests keep one handle while the driver owns another.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingReporter {
    /// Snapshot of everything reported so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }

    /// Drain and return everything reported so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().expect("reporter lock poisoned"))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: Event) {
        self.events
            .lock()
            .expect("reporter lock poisoned")
            .push(event);
    }
}
