//! Priority/fairness gate for `Ranch::acquire`. Modeled directly on
//! `frusta/src/priority_queue.rs`: a `parking_lot::Mutex`-guarded map
//! instead of a lock-free structure, because entries here are small, the
//! queue never blocks on I/O, and contention is expected to be low (one
//! queue per `(type, state)` pair, not a global one).
//!
//! All operations are synchronous and in-memory; nothing here touches the
//! store. A request earns its place in line the first time it calls
//! `update` and keeps it as long as it calls `update` again before its
//! entry ages out of `cleanup`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
struct Entry {
    request_id: String,
    last_seen: Instant,
}

/// Keyed by `(resource type, required state)`; each key has its own FIFO
/// waiter list.
#[derive(Default)]
pub struct RequestQueue {
    queues: Mutex<HashMap<(String, String), Vec<Entry>>>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `request_id` is waiting for `(rtype, state)`, refreshing
    /// its position if already present, and returns its zero-based rank in
    /// line (0 = at the head). A blank `request_id` is not tracked and
    /// always reports rank 0, i.e. it never has to wait its turn.
    pub fn update(&self, rtype: &str, state: &str, request_id: &str) -> usize {
        if request_id.is_empty() {
            return 0;
        }
        let mut queues = self.queues.lock();
        let list = queues
            .entry((rtype.to_string(), state.to_string()))
            .or_default();
        let now = Instant::now();
        if let Some(pos) = list.iter().position(|e| e.request_id == request_id) {
            list[pos].last_seen = now;
            pos
        } else {
            list.push(Entry {
                request_id: request_id.to_string(),
                last_seen: now,
            });
            list.len() - 1
        }
    }

    /// Removes `request_id` from its queue, e.g. once it has successfully
    /// acquired a resource.
    pub fn delete(&self, rtype: &str, state: &str, request_id: &str) {
        if request_id.is_empty() {
            return;
        }
        let mut queues = self.queues.lock();
        if let Some(list) = queues.get_mut(&(rtype.to_string(), state.to_string())) {
            list.retain(|e| e.request_id != request_id);
        }
    }

    /// Drops every entry across all queues whose last `update` is older
    /// than `ttl`, so abandoned waiters don't permanently block the line.
    pub fn cleanup(&self, ttl: Duration) {
        let cutoff = Instant::now().checked_sub(ttl).unwrap_or(Instant::now());
        let mut queues = self.queues.lock();
        for list in queues.values_mut() {
            list.retain(|e| e.last_seen >= cutoff);
        }
        queues.retain(|_, list| !list.is_empty());
    }

    /// Spawns a background task that calls `cleanup` every `interval` until
    /// `cancel` fires.
    pub fn spawn_gc(
        self: std::sync::Arc<Self>,
        ttl: Duration,
        interval: Duration,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => self.cleanup(ttl),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_requests_never_wait() {
        let q = RequestQueue::new();
        assert_eq!(q.update("pool", "free", ""), 0);
        assert_eq!(q.update("pool", "free", ""), 0);
    }

    #[test]
    fn fifo_rank_and_refresh() {
        let q = RequestQueue::new();
        assert_eq!(q.update("pool", "free", "a"), 0);
        assert_eq!(q.update("pool", "free", "b"), 1);
        assert_eq!(q.update("pool", "free", "c"), 2);
        // re-announcing doesn't move you to the back.
        assert_eq!(q.update("pool", "free", "a"), 0);
    }

    #[test]
    fn delete_removes_entry_and_shifts_rank() {
        let q = RequestQueue::new();
        q.update("pool", "free", "a");
        q.update("pool", "free", "b");
        q.delete("pool", "free", "a");
        assert_eq!(q.update("pool", "free", "b"), 0);
    }

    #[test]
    fn cleanup_evicts_stale_entries() {
        let q = RequestQueue::new();
        q.update("pool", "free", "a");
        q.cleanup(Duration::from_secs(0));
        // "a" aged out; a brand new request is at the head again.
        assert_eq!(q.update("pool", "free", "b"), 0);
    }
}
