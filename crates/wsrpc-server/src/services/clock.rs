//! Clock push: broadcasts a `tick` message to every session at a fixed
//! interval until cancelled.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use wsrpc_core::protocol::PushMessage;

use crate::sessions::Sessions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tick {
    pub seq: u64,
    pub unix_ms: u64,
}

impl PushMessage for Tick {
    fn message_type(&self) -> &str {
        "tick"
    }
}

pub async fn run(sessions: Arc<Sessions>, every: Duration, token: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately
    interval.tick().await;

    let mut seq = 0u64;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                seq += 1;
                let tick = Tick { seq, unix_ms: unix_ms() };
                let delivered = sessions.broadcast(&tick).await;
                tracing::trace!(seq, delivered, "tick pushed");
            }
        }
    }
    tracing::debug!(seq, "clock stopped");
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(saturating_millis)
        .unwrap_or_default()
}

fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
