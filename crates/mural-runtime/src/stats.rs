//! Runtime counters

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic event counter
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    #[inline]
    pub fn incr(&self) {
        self.add(1);
    }

    #[inline]
    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Live counters, shared by every task of a node
#[derive(Debug, Default)]
pub struct NodeStats {
    pub connections_accepted: Counter,
    pub requests_handled: Counter,
    /// Frames answered with the inactive error
    pub requests_rejected_inactive: Counter,
    pub posts_published: Counter,
    pub posts_synced: Counter,
    pub duplicate_syncs: Counter,
    pub propagations_sent: Counter,
    pub propagations_failed: Counter,
    pub reconciliations: Counter,
    pub posts_reconciled: Counter,
}

/// Point-in-time copy of [`NodeStats`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub connections_accepted: u64,
    pub requests_handled: u64,
    pub requests_rejected_inactive: u64,
    pub posts_published: u64,
    pub posts_synced: u64,
    pub duplicate_syncs: u64,
    pub propagations_sent: u64,
    pub propagations_failed: u64,
    pub reconciliations: u64,
    pub posts_reconciled: u64,
}

impl NodeStats {
    pub fn snapshot(&self) -> RuntimeStats {
        RuntimeStats {
            connections_accepted: self.connections_accepted.get(),
            requests_handled: self.requests_handled.get(),
            requests_rejected_inactive: self.requests_rejected_inactive.get(),
            posts_published: self.posts_published.get(),
            posts_synced: self.posts_synced.get(),
            duplicate_syncs: self.duplicate_syncs.get(),
            propagations_sent: self.propagations_sent.get(),
            propagations_failed: self.propagations_failed.get(),
            reconciliations: self.reconciliations.get(),
            posts_reconciled: self.posts_reconciled.get(),
        }
    }
}

impl fmt::Display for RuntimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  connections accepted: {}", self.connections_accepted)?;
        writeln!(
            f,
            "  requests handled:     {} ({} rejected while inactive)",
            self.requests_handled, self.requests_rejected_inactive
        )?;
        writeln!(f, "  posts published:      {}", self.posts_published)?;
        writeln!(
            f,
            "  posts synced:         {} ({} duplicates)",
            self.posts_synced, self.duplicate_syncs
        )?;
        writeln!(
            f,
            "  propagations:         {} sent, {} failed",
            self.propagations_sent, self.propagations_failed
        )?;
        write!(
            f,
            "  reconciliations:      {} ({} posts merged)",
            self.reconciliations, self.posts_reconciled
        )
    }
}
