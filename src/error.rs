use thiserror::Error;

/// Failures the adaptation path recovers from locally. None of these cross
/// the worker boundary; they are logged and the exchange is suppressed.
#[derive(Debug, Error)]
pub enum AdaptError {
    /// The in-message slot of the originating exchange could not be resolved.
    #[error("error resolving in-message slot: {0}")]
    ExchangeResolution(String),

    /// The placeholder envelope could not be initialized on the message.
    #[error("placeholder envelope already attached")]
    EnvelopeAttached,
}
