/// Configuration for a pool, set once at [`new_pool`](crate::new_pool) time.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Size in bytes of every segment's buffer. Fixed for the lifetime of the pool.
    pub bufsize: usize,
    /// Enable metrics collection (an `AtomicU64` fetch_add per op; negligible overhead).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if `bufsize` is 0. A zero-sized frame cannot carry a payload and almost
    /// certainly indicates a construction-time programming error, not a runtime condition
    /// a caller should recover from.
    pub const fn new(bufsize: usize, enable_metrics: bool) -> Self {
        assert!(bufsize > 0, "bufsize must be greater than 0");

        Self {
            bufsize,
            enable_metrics,
        }
    }
}

impl Default for Config {
    /// 4 KiB frames, metrics off.
    fn default() -> Self {
        Self {
            bufsize: 4096,
            enable_metrics: false,
        }
    }
}

/// Preset tuned for small control-plane frames where metrics overhead isn't worth paying.
pub const LOW_LATENCY_CONFIG: Config = Config::new(256, false);

/// Preset tuned for full video frames, with metrics enabled for observability.
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 21, true);
