//! Debug assertion macros for pool invariants.
//!
//! These macros provide runtime checks for the invariants documented in the crate's
//! top-level docs. They are only active in debug builds (`#[cfg(debug_assertions)]`),
//! so there is zero overhead in release builds.
//!
//! Used by [`crate::pool::PoolInner`].

// =============================================================================
// INV-POOL-01: Borrow Sum
// =============================================================================

/// Assert that the sum of per-segment borrow counts equals the number of live
/// views the pool has handed out.
///
/// **Invariant**: `sum_i borrows[i] == live_borrow_count`
///
/// Used in: `PoolInner::borrow` and `PoolInner::release`, after each mutates
/// `borrows`/`live_borrows`.
macro_rules! debug_assert_borrow_sum {
    ($state:expr) => {
        debug_assert_eq!(
            $state.borrows[..$state.num_segments].iter().map(|&b| b as u64).sum::<u64>(),
            $state.live_borrows,
            "INV-POOL-01 violated: borrow sum diverged from live_borrows"
        )
    };
}

// =============================================================================
// INV-POOL-02: Distinct Last/Prev
// =============================================================================

/// Assert that `last_written != prev_written` once at least two segments exist
/// and at least two publishes have committed.
///
/// **Invariant**: `prev_written != last_written` (once `num_segments >= 2` and
/// `publishes >= 2`)
///
/// Used in: `arbiter::commit_write`, after updating `last_written`.
macro_rules! debug_assert_distinct_written {
    ($state:expr) => {
        debug_assert!(
            $state.num_segments < 2 || $state.last_written != $state.prev_written,
            "INV-POOL-02 violated: last_written == prev_written == {}",
            $state.last_written
        )
    };
}

// =============================================================================
// INV-POOL-03: Segment Floor
// =============================================================================

/// Assert that the pool always carries at least two more segments than it has
/// receivers, once it has any receivers at all.
///
/// **Invariant**: `num_segments >= num_receivers + 2` (when `num_receivers >= 1`)
///
/// Used in: `PoolInner::publish` and `PoolInner::add_receiver`.
macro_rules! debug_assert_segment_floor {
    ($state:expr) => {
        debug_assert!(
            $state.num_receivers == 0 || $state.num_segments >= $state.num_receivers + 2,
            "INV-POOL-03 violated: {} segments for {} receivers",
            $state.num_segments,
            $state.num_receivers
        )
    };
}

// =============================================================================
// INV-POOL-04: Writer Target Unborrowed
// =============================================================================

/// Assert that the segment handed to the writer has no outstanding borrows,
/// unless this is the documented conflation path (target == last_written).
///
/// **Invariant**: `borrows[target] == 0 || target == last_written`
///
/// Used in: `arbiter::pick_writer`, right before returning.
macro_rules! debug_assert_writer_target_safe {
    ($state:expr, $target:expr) => {
        debug_assert!(
            $state.borrows[$target] == 0 || $target == $state.last_written,
            "INV-POOL-04 violated: writer target {} has {} outstanding borrows",
            $target,
            $state.borrows[$target]
        )
    };
}

// =============================================================================
// INV-POOL-05: Teardown Runs Once
// =============================================================================

/// Assert that teardown observes `no_sender && num_receivers == 0 &&
/// live_borrows == 0` for the first and only time.
///
/// **Invariant**: the torn-down transition fires exactly once per pool.
///
/// Used in: `PoolInner::maybe_teardown`.
macro_rules! debug_assert_teardown_once {
    ($already_freed:expr) => {
        debug_assert!(!$already_freed, "INV-POOL-05 violated: teardown ran more than once")
    };
}

pub(crate) use debug_assert_borrow_sum;
pub(crate) use debug_assert_distinct_written;
pub(crate) use debug_assert_segment_floor;
pub(crate) use debug_assert_teardown_once;
pub(crate) use debug_assert_writer_target_safe;
