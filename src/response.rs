use std::sync::Arc;
use std::time::Instant;

use hyper::StatusCode;
use parking_lot::Mutex;

use crate::headers::{self, RawHeaders};
use crate::pipe::PipeReader;

/// Wire-level trace holder shared between the connection layer and anything
/// downstream that wants the raw exchange for debugging.
#[derive(Debug, Default)]
pub struct WireLog {
    entries: Mutex<Vec<String>>,
}

impl WireLog {
    pub fn note(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// Correlation and debug attributes of the connection a message travelled
/// over. The worker only records timing here and propagates the wire log; it
/// never drives I/O through this handle.
#[derive(Debug, Default)]
pub struct ConnectionContext {
    pub wire_log: Option<Arc<WireLog>>,
    timings: Mutex<Timings>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Timings {
    worker_init_at: Option<Instant>,
    worker_start_at: Option<Instant>,
}

impl ConnectionContext {
    pub fn with_wire_log(wire_log: Arc<WireLog>) -> Self {
        Self {
            wire_log: Some(wire_log),
            timings: Mutex::new(Timings::default()),
        }
    }

    pub fn mark_worker_init(&self) {
        self.timings.lock().worker_init_at = Some(Instant::now());
    }

    pub fn mark_worker_start(&self) {
        self.timings.lock().worker_start_at = Some(Instant::now());
    }

    pub fn worker_init_at(&self) -> Option<Instant> {
        self.timings.lock().worker_init_at
    }

    pub fn worker_start_at(&self) -> Option<Instant> {
        self.timings.lock().worker_start_at
    }
}

/// A backend response whose headers are fully parsed. Owned by the connection
/// layer and read-only to the adaptation core; the body may still be
/// streaming into the pipe when this arrives.
#[derive(Debug)]
pub struct ReceivedResponse {
    pub status: StatusCode,
    pub status_line: String,
    /// Headers as received, casing preserved.
    pub headers: RawHeaders,
    /// Entries whose name duplicated one already captured above.
    pub excess_headers: RawHeaders,
    /// Whether this response type normally carries an entity body.
    pub expect_entity_body: bool,
    /// Set when upstream processing already failed; pending body bytes must
    /// be drained and dropped before this exchange proceeds.
    pub force_shutdown: bool,
    pub pipe: PipeReader,
    pub connection: Arc<ConnectionContext>,
}

impl ReceivedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        headers::lookup(&self.headers, name)
    }
}
