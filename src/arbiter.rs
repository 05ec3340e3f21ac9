//! The segment arbitration rules: pure functions over [`PoolState`] called
//! only while the pool mutex is held. No I/O, no blocking, no allocation —
//! every critical section here is `O(MAX_SEGMENTS)` and bounded.

use crate::invariants::{debug_assert_distinct_written, debug_assert_writer_target_safe};
use crate::pool::PoolState;

/// "get_free_writer": find a segment the writer may overwrite without
/// tearing a live borrow.
///
/// 1. Scan `0..num_segments`, skipping `last_written`; the first segment with
///    zero borrows wins.
/// 2. If every other segment is pinned, fall back to `last_written` itself —
///    the conflation path.
pub(crate) fn pick_writer(state: &PoolState) -> usize {
    for i in 0..state.num_segments {
        if i == state.last_written {
            continue;
        }
        if state.borrows[i] == 0 {
            debug_assert_writer_target_safe!(state, i);
            return i;
        }
    }
    state.last_written
}

/// "get_recv_index": the segment a freshly-borrowing reader should see.
///
/// While a write is in flight against `last_written` (conflation), readers
/// are routed there too — the one documented tear window. Otherwise readers
/// get `prev_written`, which is always fully committed and leaves
/// `last_written` free for the writer's next `pick_writer` call.
pub(crate) fn pick_reader(state: &PoolState) -> usize {
    if state.conflation {
        state.last_written
    } else {
        state.prev_written
    }
}

/// Records the writer's chosen `target` under the lock, before the
/// unsynchronized copy runs. Sets `CONFLATION` if `target` is `last_written`,
/// otherwise slides the publication window forward.
pub(crate) fn begin_write(state: &mut PoolState, target: usize) {
    if target == state.last_written {
        state.conflation = true;
    } else {
        state.prev_written = state.last_written;
    }
}

/// Commits a completed write: `target` becomes `last_written` and the
/// conflation flag (if set) is cleared.
pub(crate) fn commit_write(state: &mut PoolState, target: usize) {
    state.last_written = target;
    state.conflation = false;
    debug_assert_distinct_written!(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::MAX_SEGMENTS;

    fn state_with(num_segments: usize, last_written: usize, prev_written: usize) -> PoolState {
        // PoolState's fields are pub(crate), constructed by hand here to drive
        // the arbiter in isolation without a whole PoolInner.
        crate::pool::test_support::state(num_segments, last_written, prev_written)
    }

    #[test]
    fn writer_prefers_unpinned_non_last_segment() {
        let mut state = state_with(3, 0, 1);
        state.borrows[1] = 1; // pin prev_written
        let target = pick_writer(&state);
        assert_eq!(target, 2);
    }

    #[test]
    fn writer_conflates_when_all_others_pinned() {
        let mut state = state_with(3, 0, 1);
        state.borrows[1] = 1;
        state.borrows[2] = 1;
        let target = pick_writer(&state);
        assert_eq!(target, 0, "should fall back to last_written when pinned elsewhere");
    }

    #[test]
    fn reader_prefers_prev_written_absent_conflation() {
        let state = state_with(3, 0, 1);
        assert_eq!(pick_reader(&state), 1);
    }

    #[test]
    fn reader_follows_conflation_to_last_written() {
        let mut state = state_with(3, 0, 1);
        state.conflation = true;
        assert_eq!(pick_reader(&state), 0);
    }

    #[test]
    fn begin_and_commit_slide_the_publication_window() {
        let mut state = state_with(MAX_SEGMENTS, 0, 1);
        begin_write(&mut state, 2);
        assert_eq!(state.prev_written, 0);
        assert!(!state.conflation);
        commit_write(&mut state, 2);
        assert_eq!(state.last_written, 2);
    }
}
