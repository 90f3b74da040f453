//! Progress tracking utilities
//!
//! A thread-safe progress tracker that workers share to report completed units of work
//! (partitions) at regular intervals.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// Maintains an internal count and logs progress messages when the count crosses
/// interval boundaries. When a total is known it is included in each message.
///
/// # Example
/// ```
/// use fgbamdiff_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Compared partitions").with_interval(10).with_total(25);
///
/// for _ in 0..25 {
///     tracker.log_if_needed(1); // Logs at 10/25, 20/25
/// }
/// tracker.log_final(); // Logs "Compared partitions 25/25 (complete)"
/// ```
pub struct ProgressTracker {
    /// Progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Expected number of items, if known.
    total: Option<u64>,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message and a default interval of 10,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 10_000, message: message.into(), total: None, count: AtomicU64::new(0) }
    }

    /// Set the logging interval. Zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Set the expected total, shown as `count/total` in log messages.
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    fn describe(&self, count: u64) -> String {
        match self.total {
            Some(total) => format!("{count}/{total}"),
            None => count.to_string(),
        }
    }

    /// Add to the count and log once for each interval boundary crossed.
    ///
    /// Returns `true` if the new count is exactly a multiple of the interval.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if additional == 0 {
            let count = self.count.load(Ordering::Relaxed);
            return count > 0 && count.is_multiple_of(self.interval);
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for i in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, self.describe(i * self.interval));
        }

        new_count.is_multiple_of(self.interval)
    }

    /// Log final progress unless the last call to [`Self::log_if_needed`] already logged it.
    pub fn log_final(&self) {
        if !self.log_if_needed(0) {
            let count = self.count.load(Ordering::Relaxed);
            if count > 0 {
                info!("{} {} (complete)", self.message, self.describe(count));
            }
        }
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
