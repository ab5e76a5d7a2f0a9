//! High-precision timing utilities
//!
//! Wall-clock measurement of integration runs and formatting helpers for
//! reports.

use std::time::{Duration, Instant};

/// High-precision timestamp
///
/// Thin wrapper around `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
}

impl Timestamp {
    /// Create a new timestamp representing the current time
    #[inline]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Get the elapsed time since this timestamp
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Get the elapsed time in nanoseconds
    #[inline]
    pub fn elapsed_nanos(&self) -> u64 {
        self.elapsed().as_nanos() as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use trapulse::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Speedup of `parallel` relative to `baseline`
///
/// Returns 0.0 when the parallel run took no measurable time.
pub fn calculate_speedup(baseline: Duration, parallel: Duration) -> f64 {
    let seconds = parallel.as_secs_f64();
    if seconds > 0.0 {
        baseline.as_secs_f64() / seconds
    } else {
        0.0
    }
}

/// Parallel efficiency: speedup divided by thread count
pub fn calculate_efficiency(speedup: f64, threads: usize) -> f64 {
    if threads > 0 {
        speedup / threads as f64
    } else {
        0.0
    }
}
