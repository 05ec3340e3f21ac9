//! The single-producer side of the pool.

use std::sync::Arc;

use crate::error::PoolError;
use crate::metrics::MetricsSnapshot;
use crate::pool::PoolInner;

/// The sole write handle to a pool.
///
/// `Sender` intentionally does not implement [`Clone`]: the arbitration
/// protocol in [`crate::arbiter`] assumes exactly one thread calls
/// [`publish`](Sender::publish) at a time, and the type system is the
/// cheapest place to enforce that.
pub struct Sender {
    inner: Arc<PoolInner>,
}

// SAFETY: `Sender` holds only an `Arc<PoolInner>`; all mutable access it
// performs on pool state is funneled through `PoolInner::publish`, which
// takes the pool mutex for bookkeeping and otherwise only writes into a
// segment the arbiter has certified free. `Sender` is `Send` so it can be
// handed off to whichever thread is the sole producer; it is intentionally
// not `Clone`, so there is no way to create a second writer and violate that
// single-producer assumption.
unsafe impl Send for Sender {}

impl Sender {
    pub(crate) fn new(inner: Arc<PoolInner>) -> Self {
        Self { inner }
    }

    /// Publishes `bytes` (which must be exactly `bufsize` long) stamped with
    /// `ts`. Never blocks on a slow or absent reader: with zero receivers
    /// attached, the call is a no-op that returns
    /// [`NoReceivers`](PoolError::NoReceivers) without copying; with at least
    /// one receiver, the arbiter always finds a target (conflating onto
    /// `last_written` in the worst case), so `publish` always completes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` does not equal the pool's configured `bufsize`.
    pub fn publish(&self, bytes: &[u8], ts: u64) -> Result<(), PoolError> {
        self.inner.publish(bytes, ts)
    }

    /// A point-in-time snapshot of this pool's counters. Returns
    /// `MetricsSnapshot::default()` if the pool's [`Config`](crate::Config)
    /// did not enable metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics()
    }
}

impl Drop for Sender {
    fn drop(&mut self) {
        self.inner.drop_sender();
    }
}
