//! The shared internals behind [`Sender`](crate::sender::Sender) and
//! [`Receiver`](crate::receiver::Receiver): the segment table, the
//! mutex-guarded bookkeeping, and the coordinated-teardown logic.

use std::sync::Mutex;

use crossbeam_utils::CachePadded;

use crate::arbiter;
use crate::config::Config;
use crate::error::PoolError;
use crate::invariants::{debug_assert_borrow_sum, debug_assert_segment_floor, debug_assert_teardown_once};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::segment::Segment;

/// Hard ceiling on live segments (and therefore on `num_receivers + 2`).
pub const MAX_SEGMENTS: usize = 16;

/// Segment count at construction, before any `try_clone`.
const INITIAL_SEGMENTS: usize = 3;

/// Maximum number of receiver handles the pool will ever carry
/// simultaneously (`MAX_SEGMENTS - 2`, since the pool always keeps two spare
/// segments beyond `num_receivers`).
pub const MAX_RECEIVERS: usize = MAX_SEGMENTS - 2;

/// Bookkeeping guarded by the pool's single mutex. No field here is ever read
/// or written without the lock held.
pub(crate) struct PoolState {
    pub(crate) num_segments: usize,
    pub(crate) last_written: usize,
    pub(crate) prev_written: usize,
    pub(crate) num_receivers: usize,
    pub(crate) conflation: bool,
    pub(crate) no_sender: bool,
    freed: bool,
    pub(crate) borrows: [u8; MAX_SEGMENTS],
    /// Running total of `borrows[..]`; kept alongside the array purely so
    /// `debug_assert_borrow_sum!` can cross-check it cheaply.
    pub(crate) live_borrows: u64,
}

impl PoolState {
    fn new() -> Self {
        Self {
            num_segments: INITIAL_SEGMENTS,
            last_written: 0,
            prev_written: 1,
            num_receivers: 1,
            conflation: false,
            no_sender: false,
            freed: false,
            borrows: [0; MAX_SEGMENTS],
            live_borrows: 0,
        }
    }
}

/// The pool's shared state: a fixed-size segment table plus mutex-guarded
/// bookkeeping. Never exposed directly — [`Sender`](crate::sender::Sender),
/// [`Receiver`](crate::receiver::Receiver), and
/// [`View`](crate::view::View) each hold an `Arc<PoolInner>`.
pub(crate) struct PoolInner {
    /// Fixed at `MAX_SEGMENTS` entries from construction so that no
    /// `Vec` reallocation can ever invalidate a pointer a `View` holds into
    /// a segment's buffer; only `PoolState::num_segments` says how many of
    /// these slots are "live". Each entry is cache-line padded so that two
    /// adjacent segments — one a writer is copying into, one a pinned reader
    /// is reading from — never share a cache line.
    segments: Vec<CachePadded<Segment>>,
    state: Mutex<PoolState>,
    pub(crate) config: Config,
    metrics: Metrics,
}

impl PoolInner {
    pub(crate) fn new(config: Config) -> Self {
        let mut segments = Vec::with_capacity(MAX_SEGMENTS);
        for i in 0..MAX_SEGMENTS {
            if i < INITIAL_SEGMENTS {
                segments.push(CachePadded::new(Segment::zeroed(config.bufsize)));
            } else {
                segments.push(CachePadded::new(Segment::empty()));
            }
        }

        Self {
            segments,
            state: Mutex::new(PoolState::new()),
            config,
            metrics: Metrics::new(),
        }
    }

    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    // -------------------------------------------------------------------
    // Writer path
    // -------------------------------------------------------------------

    /// Picks a target segment under the lock, copies the payload
    /// unsynchronized, then commits the new `last_written` under the lock.
    pub(crate) fn publish(&self, bytes: &[u8], ts: u64) -> Result<(), PoolError> {
        let target = {
            let mut state = self.state.lock().unwrap();
            if state.num_receivers == 0 {
                return Err(PoolError::NoReceivers);
            }
            let target = arbiter::pick_writer(&state);
            arbiter::begin_write(&mut state, target);
            debug_assert_segment_floor!(state);
            target
        };

        // The copy itself runs with no lock held — this is the load-bearing
        // performance property the whole design exists for.
        self.segments[target].write(bytes, ts);

        let was_conflation = {
            let mut state = self.state.lock().unwrap();
            let was_conflation = state.conflation;
            arbiter::commit_write(&mut state, target);
            was_conflation
        };

        self.metrics.record_publish(was_conflation);

        Ok(())
    }

    // -------------------------------------------------------------------
    // Reader path
    // -------------------------------------------------------------------

    /// Picks a visible index under the lock, pins it, and hands back the raw
    /// parts a [`View`](crate::view::View) needs.
    pub(crate) fn borrow(&self) -> Result<(usize, u64, *const u8, usize), PoolError> {
        let index = {
            let mut state = self.state.lock().unwrap();
            if state.no_sender {
                return Err(PoolError::SenderClosed);
            }
            let index = arbiter::pick_reader(&state);
            state.borrows[index] += 1;
            state.live_borrows += 1;
            debug_assert_borrow_sum!(state);
            index
        };

        self.metrics.record_borrow();

        let (ptr, len, ts) = self.segments[index].snapshot();
        Ok((index, ts, ptr, len))
    }

    /// Decrements the segment's borrow count, then checks whether this was
    /// the transition into teardown.
    pub(crate) fn release(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.borrows[index] > 0, "release on segment with zero borrows");
        state.borrows[index] -= 1;
        state.live_borrows -= 1;
        debug_assert_borrow_sum!(state);
        self.maybe_teardown(&mut state);
        drop(state);

        self.metrics.record_release();
    }

    // -------------------------------------------------------------------
    // Receiver fanout
    // -------------------------------------------------------------------

    /// Grows the segment table by one and increments `num_receivers`, under
    /// a single lock acquisition.
    pub(crate) fn add_receiver(&self) -> Result<(), PoolError> {
        let mut state = self.state.lock().unwrap();
        if state.num_segments == MAX_SEGMENTS {
            self.metrics.record_max_receivers_rejection();
            return Err(PoolError::MaxReceivers { max: MAX_SEGMENTS });
        }

        let new_index = state.num_segments;
        self.segments[new_index].ensure_allocated(self.config.bufsize);
        state.num_segments += 1;
        state.num_receivers += 1;
        debug_assert_segment_floor!(state);

        self.metrics.record_receiver_added();

        Ok(())
    }

    pub(crate) fn drop_sender(&self) {
        let mut state = self.state.lock().unwrap();
        state.no_sender = true;
        self.maybe_teardown(&mut state);
    }

    pub(crate) fn drop_receiver(&self) {
        let mut state = self.state.lock().unwrap();
        state.num_receivers -= 1;
        self.maybe_teardown(&mut state);

        self.metrics.record_receiver_dropped();
    }

    /// Teardown only fires once both sides are gone *and* no outstanding view
    /// still points into a segment, deferring to whichever `release` call
    /// drains the last borrow if sender/receiver drops raced ahead of it.
    fn maybe_teardown(&self, state: &mut PoolState) {
        if state.freed || !state.no_sender || state.num_receivers != 0 || state.live_borrows != 0 {
            return;
        }
        debug_assert_teardown_once!(state.freed);
        for segment in &self.segments[..state.num_segments] {
            segment.release_storage();
        }
        state.freed = true;
    }
}
