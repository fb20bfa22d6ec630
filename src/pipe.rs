use std::sync::Arc;

use anyhow::{anyhow, Result};
use hyper::body::Bytes;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// Create a body pipe: a single-producer/single-consumer byte channel filled
/// lazily by the connection layer. The reader side is a cloneable handle; the
/// bytes themselves stay with the pipe until a consumer reads them.
pub fn pipe() -> (PipeWriter, PipeReader) {
    let (tx, rx) = mpsc::channel(16);
    (
        PipeWriter { tx },
        PipeReader {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

#[derive(Debug, Clone)]
pub struct PipeWriter {
    tx: mpsc::Sender<Bytes>,
}

impl PipeWriter {
    pub async fn send(&self, chunk: Bytes) -> Result<()> {
        self.tx
            .send(chunk)
            .await
            .map_err(|_| anyhow!("body pipe reader dropped"))
    }
}

/// Consumer handle to a response body pipe. Messages hold one of these; the
/// engine drains it after delivery, decoupled from the worker's lifetime.
#[derive(Debug, Clone)]
pub struct PipeReader {
    rx: Arc<Mutex<mpsc::Receiver<Bytes>>>,
}

impl PipeReader {
    /// Next chunk, or `None` once the producer is done.
    pub async fn read_chunk(&self) -> Option<Bytes> {
        self.rx.lock().await.recv().await
    }

    /// Consume and drop everything still in flight. Returns the number of
    /// bytes discarded.
    pub async fn discard(&self) -> usize {
        let mut rx = self.rx.lock().await;
        let mut discarded = 0;
        while let Some(chunk) = rx.recv().await {
            discarded += chunk.len();
        }
        discarded
    }
}
