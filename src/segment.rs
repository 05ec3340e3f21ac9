//! The fixed-size buffers the pool arbitrates over.
//!
//! A [`Segment`]'s `buffer`/`timestamp` are written by the writer and read by
//! borrowing receivers *without* the pool mutex held — the mutex only ever
//! guards the bookkeeping in [`crate::pool::PoolState`] (which segment is
//! targeted, which are borrowed). Concurrent, lock-free access to the bytes
//! themselves is sound only because [`crate::arbiter`] guarantees a segment
//! is never handed to the writer while `borrows > 0` (save for the documented
//! conflation window).

use std::cell::UnsafeCell;

/// One fixed-size, lazily-allocated buffer slot.
///
/// Buffers for the first three segments exist from construction; a grown
/// segment's buffer starts empty and is allocated the first time
/// [`Segment::ensure_allocated`] runs (called while the pool mutex is held,
/// during [`PoolInner::add_receiver`](crate::pool::PoolInner::add_receiver)).
pub(crate) struct Segment {
    buffer: UnsafeCell<Vec<u8>>,
    timestamp: UnsafeCell<u64>,
}

// SAFETY: `buffer` and `timestamp` are mutated without the lock only by the
// sole writer thread, and read without the lock only while a receiver holds a
// borrow that the arbiter guarantees does not alias an in-progress write
// (outside the documented conflation window). All other accesses happen under
// the pool mutex. This makes cross-thread sharing of `Segment` sound.
unsafe impl Send for Segment {}
unsafe impl Sync for Segment {}

impl Segment {
    /// An empty, not-yet-allocated slot (used to reserve table space for
    /// segments beyond the initial three without paying for their buffers).
    pub(crate) fn empty() -> Self {
        Self {
            buffer: UnsafeCell::new(Vec::new()),
            timestamp: UnsafeCell::new(0),
        }
    }

    /// A slot initialized to `bufsize` zero bytes and `ts = 0`.
    ///
    /// Readers that `borrow()` before the first `publish()` observe this zero
    /// sentinel rather than uninitialized memory.
    pub(crate) fn zeroed(bufsize: usize) -> Self {
        Self {
            buffer: UnsafeCell::new(vec![0u8; bufsize]),
            timestamp: UnsafeCell::new(0),
        }
    }

    /// Allocates this slot's buffer if it has not been already. Called only
    /// while the pool mutex is held (from `add_receiver`).
    pub(crate) fn ensure_allocated(&self, bufsize: usize) {
        // SAFETY: called only from `add_receiver`, which holds the pool
        // mutex, and no concurrent unsynchronized writer/reader can reach an
        // index the mutex hasn't yet published via `num_segments`.
        let buf = unsafe { &mut *self.buffer.get() };
        if buf.is_empty() {
            buf.resize(bufsize, 0);
        }
    }

    /// Writes `bytes` into the buffer and records `ts`. Unsynchronized: the
    /// caller (the sole writer) must already hold exclusive access to this
    /// index per the arbiter's contract.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` does not match the segment's configured `bufsize`.
    pub(crate) fn write(&self, bytes: &[u8], ts: u64) {
        // SAFETY: the arbiter never hands this index to the writer while any
        // reader holds a borrow on it (outside the documented conflation
        // window, which is an accepted tear, not a data race on the Vec
        // itself: no reader reads `buffer`'s length or capacity, only its
        // contents through a fixed-length pointer).
        let buf = unsafe { &mut *self.buffer.get() };
        assert_eq!(bytes.len(), buf.len(), "publish payload length must equal bufsize");
        buf.copy_from_slice(bytes);
        // SAFETY: same protocol as `buffer` above.
        unsafe {
            *self.timestamp.get() = ts;
        }
    }

    /// Returns a raw pointer to the segment's bytes and their length, plus the
    /// timestamp last written to this segment. Unsynchronized: valid to call
    /// only while the caller holds a borrow (refcounted under the pool mutex)
    /// pinning this index against the writer.
    pub(crate) fn snapshot(&self) -> (*const u8, usize, u64) {
        // SAFETY: the caller has already incremented this segment's borrow
        // count under the pool mutex before calling, so the writer will not
        // select this index (outside the documented conflation window).
        let buf = unsafe { &*self.buffer.get() };
        let ts = unsafe { *self.timestamp.get() };
        (buf.as_ptr(), buf.len(), ts)
    }

    /// Frees this slot's backing storage. Called only during coordinated
    /// teardown, while the pool mutex is held and no outstanding borrows
    /// remain.
    pub(crate) fn release_storage(&self) {
        // SAFETY: teardown runs only after `NO_SENDER && num_receivers == 0`,
        // by which point no new borrows can be created; any pre-existing view
        // still holds its own `Arc<PoolInner>` and its own snapshot pointer,
        // so this Vec can be safely dropped.
        let buf = unsafe { &mut *self.buffer.get() };
        *buf = Vec::new();
    }
}
