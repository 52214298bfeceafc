//! Transport frame model.
//!
//! Transports translate their native messages into `Frame`. `Close` is the
//! designated graceful-close opcode; the connection maps it to
//! `WsRpcError::EndOfStream`.

use bytes::Bytes;

/// One frame on a duplex message stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
    Ping(Bytes),
    Pong(Bytes),
    Close,
}

impl Frame {
    /// Payload length in bytes (0 for `Close`).
    pub fn payload_len(&self) -> usize {
        match self {
            Frame::Text(s) => s.len(),
            Frame::Binary(b) | Frame::Ping(b) | Frame::Pong(b) => b.len(),
            Frame::Close => 0,
        }
    }
}
