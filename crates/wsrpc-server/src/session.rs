//! Session loop: the supervising decode loop for one connection.
//!
//! Decodes commands one at a time and hands each to the handler on its own
//! task, so replies may go out in any order. Per-command errors (unknown
//! name, bad payload, oversized frame) are logged and the loop continues;
//! terminal errors end it. Cancelling `token` closes the connection, which is
//! how a direct decode loop is stopped.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use wsrpc_core::error::WsRpcError;

use crate::dispatch::{Decoder, Handler};

/// Serve until the connection ends. Returns the terminal error.
pub async fn serve<C: Send + 'static>(
    decoder: Decoder<C>,
    handler: Arc<dyn Handler<C>>,
    token: CancellationToken,
) -> WsRpcError {
    let closer = {
        let conn = Arc::clone(decoder.connection());
        let token = token.clone();
        tokio::spawn(async move {
            token.cancelled().await;
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "close failed");
            }
        })
    };

    let terminal = loop {
        match decoder.decode_one().await {
            Ok(cmd) => {
                let handler = Arc::clone(&handler);
                tokio::spawn(
                    async move {
                        if let Err(e) = handler.handle(cmd).await {
                            tracing::debug!(code = e.code().as_str(), error = %e, "handler failed");
                        }
                    }
                    .in_current_span(),
                );
            }
            Err(e) if e.is_terminal() => break e,
            Err(e) => {
                tracing::warn!(code = e.code().as_str(), error = %e, "command rejected");
            }
        }
    };

    token.cancel();
    let _ = closer.await;
    terminal
}
