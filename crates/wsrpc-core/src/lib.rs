//! wsrpc core: transport-agnostic wire types and the shared error surface.
//!
//! This crate defines the JSON envelopes exchanged over a connection (requests,
//! responses, pushed messages), the frame model a transport must speak, and the
//! error type shared by the server crate. It carries no runtime or transport
//! dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed input is
//! reported as `WsRpcError` instead of crashing the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, Result, WsRpcError};
