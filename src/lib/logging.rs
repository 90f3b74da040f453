//! Formatting helpers for log lines: read counts, fractions, elapsed time and throughput.

use std::time::{Duration, Instant};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use fgbamdiff_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage with specified decimal places.
///
/// # Examples
///
/// ```
/// use fgbamdiff_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form (e.g., "2m 15s", "1h 30m", "45s").
///
/// # Examples
///
/// ```
/// use fgbamdiff_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a throughput of `count` units over `duration`, falling back to a per-minute rate
/// when fewer than one unit completes per second.
///
/// # Examples
///
/// ```
/// use fgbamdiff_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1), "reads"), "1,000 reads/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60), "partitions"), "30.0 partitions/min");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration, unit: &str) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} {unit}/s", format_count(count));
    }

    let per_sec = count as f64 / secs;
    if per_sec >= 1.0 {
        format!("{} {unit}/s", format_count(per_sec as u64))
    } else {
        format!("{:.1} {unit}/min", per_sec * 60.0)
    }
}

/// Brackets a long-running operation with a start line and a completion line reporting how
/// many units were processed, the elapsed time and the throughput.
///
/// ```no_run
/// use fgbamdiff_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Comparing BAMs", "reads");
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    unit: &'static str,
    start_time: Instant,
}

impl OperationTimer {
    /// Starts timing `operation`, whose progress is counted in `unit`s.
    #[must_use]
    pub fn new(operation: &str, unit: &'static str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), unit, start_time: Instant::now() }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_completion(&self, count: u64) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} {} in {} ({})",
            self.operation,
            format_count(count),
            self.unit,
            format_duration(duration),
            format_rate(count, duration, self.unit)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1,000")]
    #[case(12_345, "12,345")]
    #[case(1_000_000, "1,000,000")]
    fn test_format_count(#[case] n: u64, #[case] expected: &str) {
        assert_eq!(format_count(n), expected);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.9543, 2), "95.43%");
        assert_eq!(format_percent(0.5, 1), "50.0%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
    }

    #[rstest]
    #[case(1000, Duration::from_secs(1), "1,000 reads/s")]
    #[case(60, Duration::from_secs(60), "1 reads/s")]
    #[case(30, Duration::from_secs(60), "30.0 reads/min")]
    #[case(1000, Duration::from_nanos(1), "1,000 reads/s")]
    fn test_format_rate(#[case] count: u64, #[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_rate(count, duration, "reads"), expected);
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("Test", "partitions");
        assert!(timer.elapsed() < Duration::from_secs(60));
        timer.log_completion(1000);
    }
}
