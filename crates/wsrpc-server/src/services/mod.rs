//! Built-in services.
//!
//! - `arith`: the demo `sum` / `negate` commands.
//! - `clock`: periodic `tick` push to all sessions.

pub mod arith;
pub mod clock;

pub use arith::{ArithCommand, ArithService};
