use hyper::StatusCode;

use crate::config::TargetConfig;
use crate::exchange::RequestContext;
use crate::headers::NormalizedHeaders;
use crate::message::AdaptedMessage;
use crate::redirect;
use crate::response::ReceivedResponse;

/// Builds the engine-neutral message for a received response. Pure
/// header-level transformation: the pipe handle is attached but never
/// drained here.
pub struct ResponseAdapter<'a> {
    config: &'a TargetConfig,
}

impl<'a> ResponseAdapter<'a> {
    pub fn new(config: &'a TargetConfig) -> Self {
        Self { config }
    }

    /// Adapt one received response against its originating exchange.
    ///
    /// `None` is terminal: either the in-message slot was torn (logged) or
    /// the exchange already completed without one, as fire-and-forget
    /// termination sequences legitimately do.
    pub fn adapt(
        &self,
        response: &ReceivedResponse,
        ctx: &RequestContext,
        allowed_properties: &[String],
    ) -> Option<AdaptedMessage> {
        let mut msg = match ctx.exchange.take_in_message() {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                if ctx.exchange.is_complete() {
                    tracing::debug!(
                        "no in-message slot on a completed exchange, \
                         possibly a terminate sequence message"
                    );
                    return None;
                }
                AdaptedMessage::default()
            }
            Err(err) => {
                tracing::error!("error resolving in-message slot: {}", err);
                return None;
            }
        };

        // rewrite Location before anything else sees it, on a working copy
        // so the received mapping stays untouched
        let mut headers = response.headers.clone();
        msg.pre_location = redirect::rewrite_location(
            &mut headers,
            response.status,
            ctx.core.service_prefix.as_deref(),
            self.config,
        );

        msg.headers = NormalizedHeaders::from_raw(&headers);
        msg.excess_headers = response.excess_headers.clone();

        msg.core = ctx.core.clone();
        for name in allowed_properties {
            if let Some(value) = ctx.properties.get(name) {
                msg.properties.insert(name.clone(), value.clone());
            }
        }

        msg.status = Some(response.status);
        msg.status_line = response.status_line.clone();
        msg.fault = response.status.as_u16() >= 400;

        // 202 is a control signal, not a body-bearing response
        if response.status == StatusCode::ACCEPTED {
            msg.disable_addressing_out = true;
            msg.suppress_body_parse = true;
            msg.accepted = true;
        }

        msg.non_blocking = true;
        msg.exchange = Some(ctx.exchange.clone());
        msg.pipe = Some(response.pipe.clone());
        msg.wire_log = response.connection.wire_log.clone();

        Some(msg)
    }
}
