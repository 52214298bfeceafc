//! In-process transport backed by unbounded tokio channels.
//!
//! `pair()` returns two connected ends: frames sent on one end's sink arrive
//! on the other end's source, in order.

use async_trait::async_trait;
use tokio::sync::mpsc;

use wsrpc_core::error::{Result, WsRpcError};
use wsrpc_core::protocol::Frame;

use super::{FrameSink, FrameSource};

pub struct MemorySource {
    rx: mpsc::UnboundedReceiver<Frame>,
}

pub struct MemorySink {
    tx: Option<mpsc::UnboundedSender<Frame>>,
}

/// One side of an in-memory duplex link.
pub struct MemoryEnd {
    pub source: MemorySource,
    pub sink: MemorySink,
}

/// Create two connected ends.
pub fn pair() -> (MemoryEnd, MemoryEnd) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    let a = MemoryEnd {
        source: MemorySource { rx: b_rx },
        sink: MemorySink { tx: Some(a_tx) },
    };
    let b = MemoryEnd {
        source: MemorySource { rx: a_rx },
        sink: MemorySink { tx: Some(b_tx) },
    };
    (a, b)
}

#[async_trait]
impl FrameSource for MemorySource {
    async fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.rx.recv().await)
    }
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send_frame(&mut self, frame: Frame) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| WsRpcError::Transport("memory sink closed".into()))?;
        tx.send(frame)
            .map_err(|_| WsRpcError::Transport("memory peer dropped".into()))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            // peer may already be gone
            let _ = tx.send(Frame::Close);
        }
        Ok(())
    }
}
