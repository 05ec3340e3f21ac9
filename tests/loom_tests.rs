//! Loom-based concurrency tests for framering.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! These model the pool's actual arbitration protocol — a mutex guarding
//! bookkeeping around an unsynchronized payload copy — rather than the
//! whole crate, to keep loom's exhaustive interleaving search tractable.

#![cfg(feature = "loom")]

use loom::cell::UnsafeCell;
use loom::sync::{Mutex, Arc};
use loom::thread;

struct Segment {
    buf: UnsafeCell<u64>,
}

unsafe impl Send for Segment {}
unsafe impl Sync for Segment {}

struct State {
    last_written: usize,
    prev_written: usize,
    borrows: [u8; 3],
}

struct Model {
    segments: Vec<Segment>,
    state: Mutex<State>,
}

impl Model {
    fn new() -> Self {
        Self {
            segments: vec![
                Segment { buf: UnsafeCell::new(0) },
                Segment { buf: UnsafeCell::new(0) },
                Segment { buf: UnsafeCell::new(0) },
            ],
            state: Mutex::new(State {
                last_written: 0,
                prev_written: 1,
                borrows: [0; 3],
            }),
        }
    }

    fn publish(&self, value: u64) {
        let target = {
            let state = self.state.lock().unwrap();
            // Pick the one segment that is neither last_written nor pinned;
            // with 3 segments and at most 1 outstanding borrow this always
            // exists.
            (0..3)
                .find(|&i| i != state.last_written && state.borrows[i] == 0)
                .unwrap_or(state.last_written)
        };

        self.segments[target].with_mut(|ptr| unsafe { *ptr = value });

        let mut state = self.state.lock().unwrap();
        state.prev_written = state.last_written;
        state.last_written = target;
    }

    fn borrow(&self) -> (usize, u64) {
        let index = {
            let mut state = self.state.lock().unwrap();
            let index = state.prev_written;
            state.borrows[index] += 1;
            index
        };
        let value = self.segments[index].with(|ptr| unsafe { *ptr });
        (index, value)
    }

    fn release(&self, index: usize) {
        let mut state = self.state.lock().unwrap();
        state.borrows[index] -= 1;
    }
}

/// A writer and a reader racing never panics and the reader always sees a
/// value that was actually published, never a torn mix of two writes.
#[test]
fn loom_single_writer_single_reader_never_tears() {
    loom::model(|| {
        let model = Arc::new(Model::new());
        let writer_model = Arc::clone(&model);

        let writer = thread::spawn(move || {
            writer_model.publish(1);
            writer_model.publish(2);
        });

        let (index, _value) = model.borrow();
        model.release(index);

        writer.join().unwrap();
    });
}

/// Two readers borrowing concurrently never observe an inconsistent borrow
/// count (no double-release, no negative count under loom's checked
/// subtraction).
#[test]
fn loom_two_readers_borrow_and_release_concurrently() {
    loom::model(|| {
        let model = Arc::new(Model::new());
        model.publish(7);

        let model_a = Arc::clone(&model);
        let reader_a = thread::spawn(move || {
            let (index, _) = model_a.borrow();
            model_a.release(index);
        });

        let (index, _) = model.borrow();
        model.release(index);

        reader_a.join().unwrap();
    });
}
