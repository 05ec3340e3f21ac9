//! Always-on, cheap counters for observing a pool from the outside.
//!
//! Counting is unconditional bookkeeping (a handful of `fetch_add`s), not a gated
//! subsystem, so it runs whether or not [`Config::enable_metrics`](crate::Config)
//! is set; the flag only controls whether the pool bothers to materialize a
//! snapshot versus returning a default one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters, one `AtomicU64` per event of interest.
#[derive(Debug, Default)]
pub struct Metrics {
    publishes: AtomicU64,
    conflations: AtomicU64,
    borrows: AtomicU64,
    releases: AtomicU64,
    receivers_added: AtomicU64,
    receivers_dropped: AtomicU64,
    max_receivers_rejections: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_publish(&self, conflated: bool) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
        if conflated {
            self.conflations.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_borrow(&self) {
        self.borrows.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_receiver_added(&self) {
        self.receivers_added.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_receiver_dropped(&self) {
        self.receivers_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_max_receivers_rejection(&self) {
        self.max_receivers_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters with `Relaxed` loads. Counters only ever increase, so a
    /// torn snapshot (read mid-update) is at worst momentarily stale, never inconsistent
    /// in a way that matters for monitoring.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            publishes: self.publishes.load(Ordering::Relaxed),
            conflations: self.conflations.load(Ordering::Relaxed),
            borrows: self.borrows.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            receivers_added: self.receivers_added.load(Ordering::Relaxed),
            receivers_dropped: self.receivers_dropped.load(Ordering::Relaxed),
            max_receivers_rejections: self.max_receivers_rejections.load(Ordering::Relaxed),
        }
    }
}

/// A `Copy` point-in-time reading of a [`Metrics`] block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub publishes: u64,
    pub conflations: u64,
    pub borrows: u64,
    pub releases: u64,
    pub receivers_added: u64,
    pub receivers_dropped: u64,
    pub max_receivers_rejections: u64,
}
