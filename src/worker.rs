use std::sync::Arc;

use crate::adapter::ResponseAdapter;
use crate::config::TargetConfig;
use crate::content;
use crate::engine::MessageEngine;
use crate::exchange::{ExchangeOrigin, RequestContext};
use crate::message::{AdaptedMessage, FaultInfo, RESPONSE_PROCESSING_FAILURE};
use crate::response::ReceivedResponse;

pub enum State {
    // response received, nothing adapted yet
    Initialized(ReceivedResponse),
    // message built and ready for the engine
    Adapted(ReceivedResponse, AdaptedMessage),
    // message handed to the engine, including its fault path
    Delivered,
    // no message was produced, nothing delivered
    Suppressed,
}

/// Per-exchange scope state, replacing ambient thread-local context. Acquired
/// when the worker starts and released when it exits, whichever path it took.
pub struct ExchangeScope {
    correlation_id: Option<String>,
    released: bool,
}

impl ExchangeScope {
    pub fn acquire(ctx: &RequestContext) -> Self {
        match &ctx.origin {
            ExchangeOrigin::Server { request_uri } => {
                tracing::trace!("acquired exchange scope for {}", request_uri);
            }
            ExchangeOrigin::Internal => {
                tracing::trace!("acquired exchange scope for internally forwarded exchange");
            }
        }

        Self {
            correlation_id: ctx.core.correlation_id.clone(),
            released: false,
        }
    }

    /// Idempotent; also runs from `Drop` so earlier failures cannot skip it.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        tracing::trace!("released exchange scope {:?}", self.correlation_id);
    }
}

impl Drop for ExchangeScope {
    fn drop(&mut self) {
        self.release();
    }
}

/// Runs adaptation for one completed response and hands the result to the
/// processing engine. One worker per response; workers for different
/// exchanges run unordered and independently.
pub struct DispatchWorker<E> {
    config: Arc<TargetConfig>,
    engine: Arc<E>,
    ctx: RequestContext,
    allowed_properties: Vec<String>,
}

impl<E: MessageEngine> DispatchWorker<E> {
    pub fn new(
        config: Arc<TargetConfig>,
        engine: Arc<E>,
        ctx: RequestContext,
        allowed_properties: Vec<String>,
    ) -> Self {
        if let Some(conn) = &ctx.core.source_connection {
            conn.mark_worker_init();
        }

        Self {
            config,
            engine,
            ctx,
            allowed_properties,
        }
    }

    pub async fn run(self, response: ReceivedResponse) {
        let mut scope = ExchangeScope::acquire(&self.ctx);
        if let Some(conn) = &self.ctx.core.source_connection {
            conn.mark_worker_start();
        }

        let mut state = State::Initialized(response);
        loop {
            match self.next(state).await {
                Some(next_state) => {
                    state = next_state;
                }
                None => {
                    break;
                }
            }
        }

        scope.release();
    }

    async fn next(&self, state: State) -> Option<State> {
        match state {
            State::Initialized(response) => {
                let adapter = ResponseAdapter::new(&self.config);
                match adapter.adapt(&response, &self.ctx, &self.allowed_properties) {
                    Some(msg) => Some(State::Adapted(response, msg)),
                    None => Some(State::Suppressed),
                }
            }
            State::Adapted(response, mut msg) => {
                // upstream already failed: whatever the request left in its
                // pipe must be consumed and dropped before this exchange
                // builds entity-body metadata
                if response.force_shutdown {
                    if let Some(pipe) = &self.ctx.request_pipe {
                        let discarded = pipe.discard().await;
                        tracing::debug!(
                            "discarded {} stale request body bytes after upstream failure",
                            discarded
                        );
                    }
                }

                if response.expect_entity_body {
                    let content_type = content::resolve(&response, &mut msg, &self.config);
                    if let Some(content_type) = &content_type {
                        msg.charset = Some(content::charset_of(content_type));
                        msg.no_entity_body = false;
                    }
                    msg.content_type = content_type;
                } else {
                    msg.no_entity_body = true;
                }

                if let Err(err) = msg.attach_envelope() {
                    tracing::error!("error attaching placeholder envelope: {}", err);
                    return Some(State::Suppressed);
                }

                Some(self.deliver(msg))
            }
            State::Delivered | State::Suppressed => None,
        }
    }

    /// Hand the message to the engine. A failure gets one best-effort fault
    /// notification back into the engine, never a retry; a failure of that
    /// notification is only logged.
    fn deliver(&self, mut msg: AdaptedMessage) -> State {
        if let Err(err) = self.engine.receive(&mut msg) {
            tracing::error!("fault processing response message through the engine: {}", err);

            let summary = err.to_string();
            let first_line = summary.lines().next().unwrap_or_default();
            msg.fault_info = Some(FaultInfo {
                code: RESPONSE_PROCESSING_FAILURE,
                message: format!(
                    "fault processing response message through the engine: {}",
                    first_line
                ),
                detail: format!("{:?}", err),
                cause: err,
            });

            if let Err(err) = self.engine.receive_fault(&mut msg) {
                tracing::error!("engine fault path failed as well, giving up: {}", err);
            }
        }

        State::Delivered
    }
}

/// Schedule one worker for a completed response on the shared runtime.
pub fn dispatch<E: MessageEngine + 'static>(
    worker: DispatchWorker<E>,
    response: ReceivedResponse,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { worker.run(response).await })
}
