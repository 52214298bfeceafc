//! Session registry: live connections' write handles, keyed by session id.
//!
//! Used to push server-initiated messages to every connected client.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;

use wsrpc_core::protocol::PushMessage;

use crate::connection::Outbound;

pub struct Sessions {
    sessions: DashMap<u64, Outbound>,
    seq: AtomicU64,
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new()
    }
}

impl Sessions {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Register a session and return its id.
    pub fn insert(&self, out: Outbound) -> u64 {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        self.sessions.insert(id, out);
        id
    }

    pub fn remove(&self, id: u64) -> Option<Outbound> {
        self.sessions.remove(&id).map(|(_, out)| out)
    }

    pub fn get(&self, id: u64) -> Option<Outbound> {
        self.sessions.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Push `message` to every session concurrently. Returns how many sends
    /// succeeded; failures are logged and otherwise ignored.
    pub async fn broadcast<M: PushMessage + Sync>(&self, message: &M) -> usize {
        // snapshot first: never hold shard guards across an await
        let targets: Vec<(u64, Outbound)> = self
            .sessions
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();

        let mut futs = FuturesUnordered::new();
        for (id, out) in targets {
            futs.push(async move { (id, out.send_message(message).await) });
        }

        let mut delivered = 0;
        while let Some((id, res)) = futs.next().await {
            match res {
                Ok(()) => delivered += 1,
                Err(e) => tracing::debug!(session = id, error = %e, "push failed"),
            }
        }
        delivered
    }
}
