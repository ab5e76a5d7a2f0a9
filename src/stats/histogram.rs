//! Run-time histogram using HdrHistogram
//!
//! Records the wall-clock time of repeated integration runs so reports can
//! show percentiles instead of a single noisy sample. Tracks 1ns to 1 hour
//! with 3 significant digits.

use crate::Result;
use anyhow::Context;
use hdrhistogram::Histogram;
use std::time::Duration;

const MAX_TRACKED_NANOS: u64 = 3_600_000_000_000;

/// Elapsed-time histogram
#[derive(Debug, Clone)]
pub struct TimingHistogram {
    histogram: Histogram<u64>,
}

impl TimingHistogram {
    pub fn new() -> Result<Self> {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKED_NANOS, 3)
            .context("Failed to create timing histogram")?;

        Ok(Self { histogram })
    }

    /// Record one run, clamped to the tracked range
    #[inline]
    pub fn record(&mut self, elapsed: Duration) {
        let value = (elapsed.as_nanos() as u64).clamp(1, MAX_TRACKED_NANOS);
        let _ = self.histogram.record(value);
    }

    /// Value at `percentile` (0.0 - 100.0), or None if empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.value_at_percentile(percentile)))
    }

    pub fn min(&self) -> Option<Duration> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    pub fn max(&self) -> Option<Duration> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }
}
