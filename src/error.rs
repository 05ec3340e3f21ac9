use thiserror::Error;

/// Error types for pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// `publish` was called with no live receivers; the payload was not copied.
    #[error("no receivers attached to the pool")]
    NoReceivers,
    /// `borrow` was called after the sender dropped.
    #[error("sender has closed the pool")]
    SenderClosed,
    /// `try_clone` was called with the pool already at `MAX_SEGMENTS` segments
    /// (equivalently, `MAX_SEGMENTS - 2` live receivers).
    #[error("pool has reached the maximum of {max} segments")]
    MaxReceivers {
        /// The configured maximum number of segments.
        max: usize,
    },
}
