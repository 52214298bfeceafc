//! wsrpc server library entry.
//!
//! Typed command dispatch over one websocket: a palette maps command names
//! to typed command shapes, a decoder turns incoming envelopes into those
//! commands, and replies are correlated back through the owning connection.
//! The binary (`main.rs`) wires this into an axum server with the demo
//! services; integration tests drive it over the in-memory transport.

pub mod app_state;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod http;
pub mod router;
pub mod services;
pub mod session;
pub mod sessions;
pub mod transport;

pub use connection::{ConnLimits, Connection, Outbound};
pub use dispatch::{Command, Decoder, Handler, Palette, Pump, RawCommand, Upgrade};
