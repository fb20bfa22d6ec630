use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::AdaptError;
use crate::message::{AdaptedMessage, CoreProperties};
use crate::pipe::PipeReader;

/// Where an exchange entered the mediation engine. Resolved once when the
/// request context is built, not re-checked deep in the call chain.
#[derive(Debug, Clone)]
pub enum ExchangeOrigin {
    /// Request arrived over the HTTP transport from a client.
    Server { request_uri: String },
    /// Exchange was forwarded internally; there is no transport-level source.
    Internal,
}

/// State of the response-side message slot of an exchange.
#[derive(Debug, Default)]
enum InSlot {
    #[default]
    Vacant,
    /// A response-side shell was prepared earlier in the mediation.
    Prepared(Box<AdaptedMessage>),
    /// The slot was invalidated by an internal inconsistency.
    Torn(String),
}

/// The logical request/response pairing tracked across the full mediation.
/// Outlives any single response.
#[derive(Debug, Default)]
pub struct Exchange {
    inner: Mutex<ExchangeInner>,
}

#[derive(Debug, Default)]
struct ExchangeInner {
    complete: bool,
    in_slot: InSlot,
}

impl Exchange {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_complete(&self) -> bool {
        self.inner.lock().complete
    }

    pub fn set_complete(&self) {
        self.inner.lock().complete = true;
    }

    /// Place a prepared response-side shell into the slot.
    pub fn prepare_in_message(&self, msg: AdaptedMessage) {
        self.inner.lock().in_slot = InSlot::Prepared(Box::new(msg));
    }

    /// Invalidate the slot; the next resolution fails with the given reason.
    pub fn tear_in_slot(&self, reason: impl Into<String>) {
        self.inner.lock().in_slot = InSlot::Torn(reason.into());
    }

    /// Take the response-side message shell, if one was prepared. A vacant
    /// slot is a legitimate outcome; a torn slot is an internal fault.
    pub fn take_in_message(&self) -> Result<Option<AdaptedMessage>, AdaptError> {
        let mut inner = self.inner.lock();
        match std::mem::take(&mut inner.in_slot) {
            InSlot::Vacant => Ok(None),
            InSlot::Prepared(msg) => Ok(Some(*msg)),
            InSlot::Torn(reason) => {
                // leave the slot torn; resolution is not retried
                inner.in_slot = InSlot::Torn(reason.clone());
                Err(AdaptError::ExchangeResolution(reason))
            }
        }
    }
}

/// Context of the outbound request a received response answers. Lives for
/// the whole exchange; read-only to the adaptation core.
#[derive(Debug)]
pub struct RequestContext {
    pub exchange: Arc<Exchange>,
    pub origin: ExchangeOrigin,
    pub core: CoreProperties,
    /// Arbitrary properties, copied onto the adapted message only when the
    /// caller's allow-list names them.
    pub properties: HashMap<String, Value>,
    /// Body pipe of the originating request. Drained and dropped when
    /// upstream processing failed before the response completed.
    pub request_pipe: Option<PipeReader>,
}

impl RequestContext {
    pub fn new(exchange: Arc<Exchange>, origin: ExchangeOrigin) -> Self {
        Self {
            exchange,
            origin,
            core: CoreProperties::default(),
            properties: HashMap::new(),
            request_pipe: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn vacant_slot_resolves_to_none() {
        let exchange = Exchange::new();
        assert!(exchange.take_in_message().unwrap().is_none());
    }

    #[test]
    fn prepared_slot_is_taken_once() {
        let exchange = Exchange::new();
        exchange.prepare_in_message(AdaptedMessage::new(StatusCode::OK, "OK"));

        assert!(exchange.take_in_message().unwrap().is_some());
        assert!(exchange.take_in_message().unwrap().is_none());
    }

    #[test]
    fn torn_slot_keeps_failing() {
        let exchange = Exchange::new();
        exchange.tear_in_slot("operation context mismatch");

        assert!(exchange.take_in_message().is_err());
        assert!(exchange.take_in_message().is_err());
    }
}
