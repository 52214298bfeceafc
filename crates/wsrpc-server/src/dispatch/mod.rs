//! Command dispatch: palette, typed commands, decoder, pump.
//!
//! Re-exports the pieces so downstream consumers can depend on this module
//! directly.

use async_trait::async_trait;

use wsrpc_core::error::Result;

pub mod command;
pub mod decoder;
pub mod palette;
pub mod pump;

pub use command::{Command, RawCommand};
pub use decoder::{Decoder, UNKNOWN_COMMAND};
pub use palette::{Palette, Upgrade};
pub use pump::Pump;

/// Application side of dispatch: handles one decoded command of the palette's
/// command type `C`. Errors are reported by the session loop and never close
/// the connection.
#[async_trait]
pub trait Handler<C>: Send + Sync {
    async fn handle(&self, cmd: C) -> Result<()>;
}
