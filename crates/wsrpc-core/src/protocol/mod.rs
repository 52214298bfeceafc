//! Wire protocol modules.
//!
//! - `envelope`: inbound request envelope (payload kept as `RawValue`).
//! - `response`: correlated reply envelope.
//! - `push`: unsolicited server-to-client messages.
//! - `frame`: the frame model transports translate to and from.

pub mod envelope;
pub mod frame;
pub mod push;
pub mod response;

pub use envelope::{CommandMeta, Envelope};
pub use frame::Frame;
pub use push::{PushMessage, Pushed};
pub use response::Response;
