use std::collections::HashMap;
use std::sync::Arc;

use hyper::StatusCode;
use serde_json::Value;

use crate::error::AdaptError;
use crate::headers::{NormalizedHeaders, RawHeaders};
use crate::pipe::PipeReader;
use crate::response::{ConnectionContext, WireLog};

/// Error code attached when the engine fails while consuming a response.
pub const RESPONSE_PROCESSING_FAILURE: u32 = 101_510;

/// Properties every adapted message carries over from its exchange,
/// regardless of the caller-declared allow-list.
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    /// Handle to the client-facing connection the exchange arrived on.
    pub source_connection: Option<Arc<ConnectionContext>>,
    pub transport_in: Option<String>,
    pub transport_out: Option<String>,
    pub disable_addressing_in: bool,
    pub correlation_id: Option<String>,
    /// Tag of the mediation artifact that initiated the exchange.
    pub artifact_type: Option<String>,
    /// External path prefix of the frontend, used for redirect rewriting.
    pub service_prefix: Option<String>,
}

/// Placeholder body container. Content can only be attached to a message
/// once the empty placeholder exists.
#[derive(Debug, Default)]
pub struct Envelope;

/// Annotations attached when the engine rejects a delivered message.
#[derive(Debug)]
pub struct FaultInfo {
    pub code: u32,
    /// First line of the engine's error, human readable.
    pub message: String,
    /// Full diagnostic chain.
    pub detail: String,
    pub cause: anyhow::Error,
}

/// The engine-neutral message built from one received response. Exclusively
/// owned by the worker while under construction, then handed to the engine.
#[derive(Debug, Default)]
pub struct AdaptedMessage {
    pub status: Option<StatusCode>,
    pub status_line: String,
    pub headers: NormalizedHeaders,
    pub excess_headers: RawHeaders,
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub no_entity_body: bool,
    /// Application-level error marker (status >= 400), independent of any
    /// adaptation failure.
    pub fault: bool,
    pub core: CoreProperties,
    /// Caller-declared properties copied from the originating context.
    pub properties: HashMap<String, Value>,
    /// Location value as the backend sent it, before any rewrite.
    pub pre_location: Option<String>,
    /// 202 control-signal markers.
    pub accepted: bool,
    pub disable_addressing_out: bool,
    pub suppress_body_parse: bool,
    /// The transport behind this message never blocks the engine.
    pub non_blocking: bool,
    pub pipe: Option<PipeReader>,
    pub wire_log: Option<Arc<WireLog>>,
    pub fault_info: Option<FaultInfo>,
    /// The exchange this message answers.
    pub exchange: Option<Arc<crate::exchange::Exchange>>,
    envelope: Option<Envelope>,
}

impl AdaptedMessage {
    pub fn new(status: StatusCode, status_line: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            status_line: status_line.into(),
            ..Default::default()
        }
    }

    /// Attach the empty placeholder envelope. Must happen exactly once,
    /// before any body content is bound to the message.
    pub fn attach_envelope(&mut self) -> Result<(), AdaptError> {
        if self.envelope.is_some() {
            return Err(AdaptError::EnvelopeAttached);
        }
        self.envelope = Some(Envelope);
        Ok(())
    }

    pub fn has_envelope(&self) -> bool {
        self.envelope.is_some()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}
