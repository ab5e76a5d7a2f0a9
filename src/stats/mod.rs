//! Run results and aggregate statistics
//!
//! [`IntegrationReport`] is what the driver gets back from one timed run:
//! the estimate plus elapsed time. Repeated runs are folded into a
//! [`RepeatSummary`], thread-count sweeps into [`SweepPoint`]s.

pub mod histogram;

use crate::config::{IntegrationParameters, RemainderPolicy};
use crate::util::time::{calculate_efficiency, calculate_speedup};
use crate::Result;
use histogram::TimingHistogram;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Which integrator produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Single-threaded fast path
    Serial,
    /// Partitioned workers with a locked merge
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Serial => write!(f, "serial"),
            Strategy::Parallel => write!(f, "parallel"),
        }
    }
}

/// Result of one timed integration
#[derive(Debug, Clone)]
pub struct IntegrationReport {
    params: IntegrationParameters,
    remainder: RemainderPolicy,
    strategy: Strategy,
    estimate: f64,
    elapsed: Duration,
    exact: Option<f64>,
}

impl IntegrationReport {
    pub fn new(
        params: IntegrationParameters,
        remainder: RemainderPolicy,
        strategy: Strategy,
        estimate: f64,
        elapsed: Duration,
        exact: Option<f64>,
    ) -> Self {
        Self {
            params,
            remainder,
            strategy,
            estimate,
            elapsed,
            exact,
        }
    }

    pub fn params(&self) -> &IntegrationParameters {
        &self.params
    }

    pub fn remainder(&self) -> RemainderPolicy {
        self.remainder
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The integral estimate
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Closed-form integral, if the integrand provides one
    pub fn exact(&self) -> Option<f64> {
        self.exact
    }

    /// |estimate - exact|, if the exact value is known
    pub fn abs_error(&self) -> Option<f64> {
        self.exact.map(|exact| (self.estimate - exact).abs())
    }
}

/// Aggregate of several runs with identical parameters
#[derive(Debug)]
pub struct RepeatSummary {
    reports: Vec<IntegrationReport>,
    timing: TimingHistogram,
}

impl RepeatSummary {
    pub fn new() -> Result<Self> {
        Ok(Self {
            reports: Vec::new(),
            timing: TimingHistogram::new()?,
        })
    }

    pub fn record(&mut self, report: IntegrationReport) {
        self.timing.record(report.elapsed());
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[IntegrationReport] {
        &self.reports
    }

    pub fn timing(&self) -> &TimingHistogram {
        &self.timing
    }

    /// Largest minus smallest estimate across runs
    ///
    /// Only summation order differs between runs, so anything above a few ulps
    /// of the estimate points at a broken merge.
    pub fn estimate_spread(&self) -> f64 {
        let mut estimates = self.reports.iter().map(IntegrationReport::estimate);
        let Some(first) = estimates.next() else {
            return 0.0;
        };
        let (min, max) = estimates.fold((first, first), |(lo, hi), e| (lo.min(e), hi.max(e)));
        max - min
    }
}

/// One row of a thread-count sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub threads: usize,
    pub strategy: Strategy,
    pub estimate: f64,
    #[serde(skip)]
    pub elapsed: Duration,
    pub speedup: f64,
    pub efficiency: f64,
}

/// Turn sweep reports into rows, using the first report as the baseline
pub fn summarize_sweep(reports: &[IntegrationReport]) -> Vec<SweepPoint> {
    let Some(baseline) = reports.first().map(IntegrationReport::elapsed) else {
        return Vec::new();
    };

    reports
        .iter()
        .map(|report| {
            let threads = report.params().thread_count();
            let speedup = calculate_speedup(baseline, report.elapsed());
            SweepPoint {
                threads,
                strategy: report.strategy(),
                estimate: report.estimate(),
                elapsed: report.elapsed(),
                speedup,
                efficiency: calculate_efficiency(speedup, threads),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(threads: usize, estimate: f64, millis: u64) -> IntegrationReport {
        let params = IntegrationParameters::new(0.0, 1.0, 100_000, threads).unwrap();
        let strategy = if threads == 1 { Strategy::Serial } else { Strategy::Parallel };
        IntegrationReport::new(
            params,
            RemainderPolicy::LastWorker,
            strategy,
            estimate,
            Duration::from_millis(millis),
            Some(1.0 / 3.0),
        )
    }

    #[test]
    fn test_report_accessors() {
        let r = report(2, 0.3334, 250);
        assert_eq!(r.elapsed_seconds(), 0.25);
        assert_eq!(r.strategy(), Strategy::Parallel);
        assert!((r.abs_error().unwrap() - (0.3334 - 1.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn test_repeat_summary_spread() {
        let mut summary = RepeatSummary::new().unwrap();
        assert_eq!(summary.estimate_spread(), 0.0);

        summary.record(report(4, 0.5, 10));
        summary.record(report(4, 0.25, 20));
        summary.record(report(4, 0.75, 30));
        assert_eq!(summary.reports().len(), 3);
        assert_eq!(summary.timing().len(), 3);
        assert_eq!(summary.estimate_spread(), 0.5);
    }

    #[test]
    fn test_summarize_sweep() {
        let reports = vec![report(1, 0.3, 400), report(2, 0.3, 200), report(4, 0.3, 125)];
        let points = summarize_sweep(&reports);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].speedup, 1.0);
        assert_eq!(points[0].efficiency, 1.0);
        assert_eq!(points[1].speedup, 2.0);
        assert_eq!(points[2].speedup, 3.2);
        assert_eq!(points[2].efficiency, 0.8);
    }

    #[test]
    fn test_summarize_sweep_empty() {
        assert!(summarize_sweep(&[]).is_empty());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(Strategy::Serial.to_string(), "serial");
        assert_eq!(Strategy::Parallel.to_string(), "parallel");
    }
}
