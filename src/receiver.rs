//! The multi-consumer side of the pool.

use std::sync::Arc;

use crate::error::PoolError;
use crate::metrics::MetricsSnapshot;
use crate::pool::PoolInner;
use crate::view::View;

/// A handle that can borrow the latest published frame, or grow the pool by
/// fanning out another `Receiver`.
///
/// A bare `Receiver` pins no segment — only the [`View`]s it hands out from
/// [`borrow`](Receiver::borrow) do. A receiver sitting between `borrow` and
/// the view's release is considered, for the purposes of the pool's
/// invariants, to own exactly one segment-borrow.
pub struct Receiver {
    inner: Arc<PoolInner>,
}

impl Receiver {
    pub(crate) fn new(inner: Arc<PoolInner>) -> Self {
        Self { inner }
    }

    /// Borrows the currently-visible segment: either the segment a writer is
    /// mid-conflation against, or the one immediately before it.
    /// Before any `publish` has ever committed, this returns the zero
    /// sentinel (`ts == 0`, all-zero bytes) rather than uninitialized memory.
    ///
    /// Returns [`SenderClosed`](PoolError::SenderClosed) once the pool's
    /// `Sender` has dropped; the receiver itself remains usable and can still
    /// be dropped normally.
    pub fn borrow(&self) -> Result<View, PoolError> {
        let (index, ts, ptr, len) = self.inner.borrow()?;
        Ok(View::new(Arc::clone(&self.inner), index, ts, ptr, len))
    }

    /// Fans out another `Receiver` sharing this pool, growing the segment
    /// table by one to keep `num_segments >= num_receivers + 2`.
    ///
    /// Named `try_clone` rather than implemented via [`Clone`] because the
    /// operation is fallible — it can exhaust the pool's `MAX_SEGMENTS`
    /// segments — and `Clone::clone` must be infallible; the same reasoning
    /// behind `std::net::TcpStream::try_clone`.
    pub fn try_clone(&self) -> Result<Receiver, PoolError> {
        self.inner.add_receiver()?;
        Ok(Receiver::new(Arc::clone(&self.inner)))
    }

    /// A point-in-time snapshot of this pool's counters. Returns
    /// `MetricsSnapshot::default()` if the pool's [`Config`](crate::Config)
    /// did not enable metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics()
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.inner.drop_receiver();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pool::{MAX_RECEIVERS, MAX_SEGMENTS};

    #[test]
    fn borrow_before_any_publish_sees_zero_sentinel() {
        let inner = Arc::new(PoolInner::new(Config::new(4, false)));
        let receiver = Receiver::new(inner);
        let view = receiver.borrow().unwrap();
        assert_eq!(view.data(), &[0, 0, 0, 0]);
        assert_eq!(view.timestamp(), 0);
    }

    #[test]
    fn fanout_up_to_max_then_rejects() {
        let inner = Arc::new(PoolInner::new(Config::new(4, false)));
        let root = Receiver::new(inner);

        let mut clones = Vec::new();
        for _ in 0..(MAX_RECEIVERS - 1) {
            clones.push(root.try_clone().unwrap());
        }

        assert!(matches!(
            root.try_clone(),
            Err(PoolError::MaxReceivers { max: MAX_SEGMENTS })
        ));
    }

    #[test]
    fn sender_closed_is_reported_but_receiver_still_drops_cleanly() {
        use crate::new_pool;

        let (sender, receiver) = new_pool(Config::new(4, false));
        drop(sender);

        assert!(matches!(receiver.borrow(), Err(PoolError::SenderClosed)));
        drop(receiver);
    }
}
