use anyhow::Result;

use crate::message::AdaptedMessage;

/// Entry points of the processing engine that consumes adapted messages.
///
/// The worker calls `receive` once per adapted message. If it fails, the
/// worker annotates the same message with fault details and calls
/// `receive_fault` once; a failure there is only logged, never retried.
pub trait MessageEngine: Send + Sync {
    fn receive(&self, msg: &mut AdaptedMessage) -> Result<()>;

    fn receive_fault(&self, msg: &mut AdaptedMessage) -> Result<()>;
}
