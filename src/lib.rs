//! framering — a single-producer, multi-consumer ring exchange for fixed-size
//! frames (e.g. video) with zero-copy, conflating borrow semantics.
//!
//! A [`Sender`] publishes fixed-size payloads stamped with a monotonic
//! timestamp; any number of [`Receiver`]s acquire read-only [`View`]s of the
//! most recently published payload without blocking the sender and without
//! copying. A slow receiver never stalls the writer: once every spare
//! segment is pinned, the writer conflates by overwriting the most recently
//! published one instead.
//!
//! # Design
//!
//! - A single mutex guards only the bookkeeping (which segment is targeted,
//!   which are borrowed) — never the payload copy itself, which is the
//!   load-bearing performance property of the whole design.
//! - The writer never overwrites a segment a reader is borrowing, outside one
//!   documented tear window (conflation under total pin pressure), which is
//!   acceptable because this exchange is explicitly lossy: a torn frame is no
//!   worse than a dropped one.
//! - [`View`] is RAII: dropping it releases the segment automatically, making
//!   the "double release" contract violation a non-issue in safe code.
//!
//! # Example
//!
//! ```
//! use framering::{new_pool, Config};
//!
//! let (sender, receiver) = new_pool(Config::new(4, false));
//!
//! sender.publish(&[1, 2, 3, 4], 10).unwrap();
//!
//! let view = receiver.borrow().unwrap();
//! assert_eq!(view.data(), &[1, 2, 3, 4]);
//! assert_eq!(view.timestamp(), 10);
//! drop(view); // releases the segment; equivalent to `view.release()`
//! ```
//!
//! Fanning out to a second receiver:
//!
//! ```
//! use framering::{new_pool, Config};
//!
//! let (sender, receiver) = new_pool(Config::new(4, false));
//! let receiver2 = receiver.try_clone().unwrap();
//!
//! sender.publish(&[9, 9, 9, 9], 1).unwrap();
//! assert_eq!(receiver2.borrow().unwrap().data(), &[9, 9, 9, 9]);
//! ```

mod arbiter;
mod config;
mod error;
mod invariants;
mod metrics;
mod pool;
mod receiver;
mod segment;
mod sender;
mod view;

use std::sync::Arc;

pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::PoolError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use pool::{MAX_RECEIVERS, MAX_SEGMENTS};
pub use receiver::Receiver;
pub use sender::Sender;
pub use view::View;

use pool::PoolInner;

/// Constructs a new pool: 3 segments, 1 receiver, sender attached.
///
/// The returned [`Sender`] is the only write handle for this pool's lifetime
/// (it has no [`Clone`] impl); call [`Receiver::try_clone`] on the returned
/// [`Receiver`] to fan out to additional consumers, up to [`MAX_RECEIVERS`].
pub fn new_pool(config: Config) -> (Sender, Receiver) {
    let inner = Arc::new(PoolInner::new(config));
    (Sender::new(Arc::clone(&inner)), Receiver::new(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_example_scenario() {
        let (sender, receiver) = new_pool(Config::new(4, false));
        sender.publish(&[1, 2, 3, 4], 10).unwrap();
        let view = receiver.borrow().unwrap();
        assert_eq!(view.data(), &[1, 2, 3, 4]);
        assert_eq!(view.timestamp(), 10);
    }
}
