//! Top-level facade crate for wsrpc.
//!
//! Re-exports the wire types and the server library so users can depend on a
//! single crate.

pub mod core {
    pub use wsrpc_core::*;
}

pub mod server {
    pub use wsrpc_server::*;
}
