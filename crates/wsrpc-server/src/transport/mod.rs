//! Transport layer.
//!
//! A transport is split into a [`FrameSource`] (read half) and a
//! [`FrameSink`] (write half). The connection owns one of each and is the
//! only caller of these traits.
//!
//! - `ws`: axum websocket adapter plus the HTTP upgrade handler.
//! - `memory`: channel-backed pair, used by tests and in-process embedders.

use async_trait::async_trait;

use wsrpc_core::error::Result;
use wsrpc_core::protocol::Frame;

pub mod memory;
pub mod ws;

/// Read half of a duplex frame stream.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or `None` once the stream has ended.
    ///
    /// Must be cancel-safe: dropping the future before it resolves must not
    /// lose a frame.
    async fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Write half of a duplex frame stream.
#[async_trait]
pub trait FrameSink: Send {
    /// Write and flush one frame.
    async fn send_frame(&mut self, frame: Frame) -> Result<()>;

    /// Signal graceful close to the peer and release the stream.
    async fn close(&mut self) -> Result<()>;
}
