//! Pump: drives a decoder on a background task and hands decoded commands to
//! a single consumer.
//!
//! Running -> emit each decoded command; the first error of any kind
//! (including cancellation) is recorded, the channel is closed, and the pump
//! is Stopped for good. A slot in the one-item channel is reserved before
//! each read, so a consumer that stops draining leaves the next frame on the
//! wire.

use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use wsrpc_core::error::WsRpcError;
use wsrpc_core::protocol::Envelope;

use super::decoder::Decoder;

pub struct Pump<C> {
    rx: mpsc::Receiver<C>,
    last_error: Arc<OnceLock<WsRpcError>>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl<C: Send + 'static> Pump<C> {
    pub fn spawn(decoder: Decoder<C>, token: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let last_error = Arc::new(OnceLock::new());
        let task = tokio::spawn(run(decoder, tx, token.clone(), Arc::clone(&last_error)));
        Self {
            rx,
            last_error,
            token,
            task,
        }
    }
}

impl<C> Pump<C> {
    /// Next decoded command; `None` once the pump has stopped.
    pub async fn recv(&mut self) -> Option<C> {
        self.rx.recv().await
    }

    /// Terminal error. Set before the channel closes, so it is always
    /// available once `recv` has returned `None`.
    pub fn last_error(&self) -> Option<&WsRpcError> {
        self.last_error.get()
    }

    /// Stop at the next check-point; reported as `Cancelled`.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.last_error.get().is_some()
    }

    /// Cancel, wait for the background task, and return the terminal error.
    pub async fn shutdown(mut self) -> Option<WsRpcError> {
        self.token.cancel();
        self.rx.close();
        let _ = (&mut self.task).await;
        self.last_error.get().cloned()
    }
}

impl<C> Drop for Pump<C> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<C>(
    decoder: Decoder<C>,
    tx: mpsc::Sender<C>,
    token: CancellationToken,
    last_error: Arc<OnceLock<WsRpcError>>,
) {
    let err = loop {
        if token.is_cancelled() {
            break WsRpcError::Cancelled;
        }

        // claim the hand-off slot before touching the wire, so at most one
        // decoded command waits for the consumer
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => break WsRpcError::Cancelled,
            p = tx.reserve() => match p {
                Ok(permit) => permit,
                // consumer dropped the pump
                Err(_) => break WsRpcError::Cancelled,
            },
        };

        // only the read races cancellation; resolving may write a reply
        let envelope = tokio::select! {
            biased;
            _ = token.cancelled() => break WsRpcError::Cancelled,
            r = decoder.connection().recv_raw::<Envelope>() => r,
        };

        let cmd = match envelope {
            Ok(envelope) => decoder.resolve(envelope).await,
            Err(e) => Err(e),
        };
        match cmd {
            Ok(cmd) => permit.send(cmd),
            Err(e) => break e,
        }
    };

    tracing::debug!(code = err.code().as_str(), error = %err, "pump stopped");
    let _ = last_error.set(err);
    drop(tx);
}
