//! The caller-visible handle returned by [`Receiver::borrow`](crate::receiver::Receiver::borrow).

use std::slice;
use std::sync::Arc;

use crate::pool::PoolInner;

/// A read-only borrow of the most recently published segment.
///
/// `View` is opaque and RAII: its [`Drop`] impl releases the underlying
/// segment automatically, so a dropped (or explicitly
/// [`released`](View::release)) view can never be released twice — the one
/// contract violation that would otherwise be undetectable UB is structurally
/// impossible in safe code.
pub struct View {
    inner: Arc<PoolInner>,
    index: usize,
    ts: u64,
    ptr: *const u8,
    len: usize,
}

// SAFETY: the bytes behind `ptr` are only ever mutated by the writer, and the
// arbiter guarantees `index` will not be selected as a writer target while
// this view's borrow is outstanding (save for the documented conflation
// window, which the reader — not the pool — chooses to tolerate). Sharing a
// `View` across threads is therefore as safe as sharing any other read-only
// reference into pool-owned memory.
unsafe impl Send for View {}
unsafe impl Sync for View {}

impl View {
    pub(crate) fn new(inner: Arc<PoolInner>, index: usize, ts: u64, ptr: *const u8, len: usize) -> Self {
        Self { inner, index, ts, ptr, len }
    }

    /// The borrowed frame's bytes. Valid for as long as this `View` lives.
    #[inline]
    pub fn data(&self) -> &[u8] {
        // SAFETY: `ptr`/`len` were snapshotted while this segment's borrow
        // count was already incremented, which the arbiter treats as
        // pinning the segment against the writer for the view's lifetime.
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// The timestamp stamped on this frame by the publishing `Sender`.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.ts
    }

    /// The pool-internal segment index this view pins. Exposed for tests and
    /// diagnostics; callers should not need it for ordinary use.
    #[inline]
    pub fn segment_index(&self) -> usize {
        self.index
    }

    /// Releases the view early and explicitly. Equivalent to `drop(view)`;
    /// provided because some callers prefer an explicit release call at the
    /// point of last use over relying on scope exit.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for View {
    fn drop(&mut self) {
        self.inner.release(self.index);
    }
}
