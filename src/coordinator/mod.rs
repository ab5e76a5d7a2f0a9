//! Coordinator module
//!
//! Splits the trapezoids into worker ranges, launches one scoped OS thread
//! per range and merges the partial sums into a mutex-protected total.
//!
//! # Synchronization
//!
//! The shared total is the only mutable state touched by more than one
//! thread. Each worker computes its partial sum with no lock held, then locks
//! once, adds, and unlocks. The total is read only after the scope has joined
//! every worker, and both the lock and the handles are dropped when
//! [`ParallelCoordinator::compute_parallel`] returns, on every path.

use crate::config::{check_thread_count, IntegrationParameters, RemainderPolicy};
use crate::error::IntegrationError;
use crate::integrand::Integrand;
use crate::serial::compute_serial;
use crate::stats::{summarize_sweep, IntegrationReport, RepeatSummary, Strategy, SweepPoint};
use crate::util::time::Timestamp;
use crate::worker::{PartitionedWorker, WorkerRange};
use log::debug;
use std::sync::Mutex;

/// Runs the trapezoidal rule across a fixed pool of worker threads
#[derive(Debug)]
pub struct ParallelCoordinator<'f, F: ?Sized> {
    integrand: &'f F,
    remainder: RemainderPolicy,
}

impl<'f, F: Integrand + ?Sized> ParallelCoordinator<'f, F> {
    pub fn new(integrand: &'f F) -> Self {
        Self {
            integrand,
            remainder: RemainderPolicy::default(),
        }
    }

    pub fn with_remainder_policy(mut self, remainder: RemainderPolicy) -> Self {
        self.remainder = remainder;
        self
    }

    pub fn remainder_policy(&self) -> RemainderPolicy {
        self.remainder
    }

    /// Strategy `compute_parallel` will use for `params`
    pub fn strategy_for(params: &IntegrationParameters) -> Strategy {
        if params.thread_count() == 1 {
            Strategy::Serial
        } else {
            Strategy::Parallel
        }
    }

    /// Estimate the integral described by `params`
    ///
    /// One thread goes straight to [`compute_serial`]. Otherwise every worker
    /// range runs on its own thread and the merged total is scaled by h.
    /// Any launch failure or worker panic discards the computation.
    pub fn compute_parallel(&self, params: &IntegrationParameters) -> Result<f64, IntegrationError> {
        check_thread_count(params.thread_count())?;

        let h = params.height();
        if params.thread_count() == 1 {
            debug!("single worker requested, using serial integrator");
            return Ok(compute_serial(self.integrand, params.a(), params.b(), params.n(), h));
        }

        let ranges = WorkerRange::partition(params.n(), params.thread_count(), self.remainder);
        let worker = PartitionedWorker::new(self.integrand, params.a(), h);
        let total = Mutex::new(0.0f64);

        self.run_workers(&worker, &ranges, &total)?;

        let total = total.into_inner().map_err(|_| IntegrationError::LockPoisoned)?;
        Ok(total * h)
    }

    fn run_workers(
        &self,
        worker: &PartitionedWorker<'f, F>,
        ranges: &[WorkerRange],
        total: &Mutex<f64>,
    ) -> Result<(), IntegrationError> {
        let outcome = crossbeam::thread::scope(|s| -> Result<(), IntegrationError> {
            let mut handles = Vec::with_capacity(ranges.len());

            for range in ranges {
                debug!(
                    "worker {}: trapezoids [{}, {}) ({} total)",
                    range.index(),
                    range.first(),
                    range.last(),
                    range.len()
                );

                // Spawned workers are joined by the scope even if a later
                // spawn fails and we return early.
                let handle = s
                    .builder()
                    .name(format!("trap-worker-{}", range.index()))
                    .spawn(move |_| merge_partial(worker, range, total))
                    .map_err(|source| IntegrationError::ThreadLaunch {
                        worker: range.index(),
                        source,
                    })?;
                handles.push((range.index(), handle));
            }

            for (index, handle) in handles {
                handle
                    .join()
                    .map_err(|_| IntegrationError::WorkerPanicked { worker: Some(index) })??;
            }

            debug!("all {} workers joined", ranges.len());
            Ok(())
        });

        // Err here means a worker the loop above never joined panicked; that
        // only happens after a launch failure, so the culprit is unknown.
        outcome.unwrap_or_else(|_| Err(IntegrationError::WorkerPanicked { worker: None }))
    }

    /// Time one computation and package it for the driver
    pub fn integrate(&self, params: &IntegrationParameters) -> Result<IntegrationReport, IntegrationError> {
        let start = Timestamp::now();
        let estimate = self.compute_parallel(params)?;
        let elapsed = start.elapsed();

        debug!(
            "{} on {} thread(s): {:.15} in {:?}",
            self.integrand.name(),
            params.thread_count(),
            estimate,
            elapsed
        );

        Ok(IntegrationReport::new(
            *params,
            self.remainder,
            Self::strategy_for(params),
            estimate,
            elapsed,
            self.integrand.exact(params.a(), params.b()),
        ))
    }

    /// Run the same computation `repeat` times
    pub fn integrate_repeated(
        &self,
        params: &IntegrationParameters,
        repeat: usize,
    ) -> crate::Result<RepeatSummary> {
        let mut summary = RepeatSummary::new()?;
        for _ in 0..repeat.max(1) {
            summary.record(self.integrate(params)?);
        }
        Ok(summary)
    }

    /// Run thread counts 1..=`params.thread_count()` and compare against one thread
    pub fn sweep(&self, params: &IntegrationParameters) -> Result<Vec<SweepPoint>, IntegrationError> {
        let reports = (1..=params.thread_count())
            .map(|threads| self.integrate(&params.with_thread_count(threads)?))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summarize_sweep(&reports))
    }
}

/// Compute one range and add it to the shared total under the lock
fn merge_partial<F: Integrand + ?Sized>(
    worker: &PartitionedWorker<'_, F>,
    range: &WorkerRange,
    total: &Mutex<f64>,
) -> Result<(), IntegrationError> {
    let partial = worker.compute_partial(range).value();

    let mut guard = total.lock().map_err(|_| IntegrationError::LockPoisoned)?;
    *guard += partial;
    drop(guard);

    debug!("worker {} merged partial sum {:.6e}", range.index(), partial);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_THREADS;
    use crate::integrand::Square;

    fn params(a: f64, b: f64, n: u64, threads: usize) -> IntegrationParameters {
        IntegrationParameters::new(a, b, n, threads).unwrap()
    }

    fn brute_force<F: Integrand>(f: &F, a: f64, h: f64, n: u64) -> f64 {
        let mut sum = 0.0;
        for k in 0..n {
            let left = a + k as f64 * h;
            let right = a + (k + 1) as f64 * h;
            sum += (f.evaluate(left) + f.evaluate(right)) / 2.0 * h;
        }
        sum
    }

    #[test]
    fn test_single_thread_matches_serial_exactly() {
        let p = params(0.0, 1.0, 100_000, 1);
        let coordinator = ParallelCoordinator::new(&Square);
        let parallel = coordinator.compute_parallel(&p).unwrap();
        let serial = compute_serial(&Square, 0.0, 1.0, 100_000, p.height());
        assert_eq!(parallel.to_bits(), serial.to_bits());
    }

    #[test]
    fn test_four_threads_match_serial() {
        let p = params(0.0, 1.0, 100_000, 4);
        let coordinator = ParallelCoordinator::new(&Square);
        let parallel = coordinator.compute_parallel(&p).unwrap();
        let serial = compute_serial(&Square, 0.0, 1.0, 100_000, p.height());
        assert!((parallel - serial).abs() < 1e-9, "{} vs {}", parallel, serial);
        assert!((parallel - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let coordinator = ParallelCoordinator::new(&Square);
        for threads in 2..=MAX_THREADS {
            let p = params(-1.0, 2.0, 50_001, threads);
            let first = coordinator.compute_parallel(&p).unwrap();
            for _ in 0..20 {
                let again = coordinator.compute_parallel(&p).unwrap();
                assert!((again - first).abs() < 1e-12, "threads {}: {} vs {}", threads, again, first);
            }
        }
    }

    #[test]
    fn test_non_divisible_covers_every_trapezoid() {
        let p = params(0.0, 1.0, 101, 3);
        let coordinator = ParallelCoordinator::new(&Square);
        let result = coordinator.compute_parallel(&p).unwrap();
        let reference = brute_force(&Square, 0.0, p.height(), 101);
        assert!((result - reference).abs() < 1e-14, "{} vs {}", result, reference);
    }

    #[test]
    fn test_truncate_drops_remainder() {
        let p = params(0.0, 1.0, 101, 3);
        let coordinator = ParallelCoordinator::new(&Square).with_remainder_policy(RemainderPolicy::Truncate);
        let result = coordinator.compute_parallel(&p).unwrap();
        // 3 workers × 33 trapezoids; the last two are dropped
        let reference = brute_force(&Square, 0.0, p.height(), 99);
        assert!((result - reference).abs() < 1e-14, "{} vs {}", result, reference);

        let full = brute_force(&Square, 0.0, p.height(), 101);
        assert!(full - result > 0.01);
    }

    #[test]
    fn test_fewer_trapezoids_than_threads() {
        let p = params(0.0, 3.0, 3, 4);
        let full = ParallelCoordinator::new(&Square).compute_parallel(&p).unwrap();
        assert!((full - brute_force(&Square, 0.0, 1.0, 3)).abs() < 1e-12);

        let truncated = ParallelCoordinator::new(&Square)
            .with_remainder_policy(RemainderPolicy::Truncate)
            .compute_parallel(&p)
            .unwrap();
        assert_eq!(truncated, 0.0);
    }

    #[test]
    fn test_each_worker_merges_once() {
        use std::collections::HashSet;
        use std::sync::Mutex as StdMutex;

        let seen = StdMutex::new(HashSet::new());
        let tracking = |x: f64| {
            let name = std::thread::current().name().map(str::to_owned);
            seen.lock().unwrap().insert(name);
            x
        };
        let p = params(0.0, 1.0, 4_000, 4);
        let result = ParallelCoordinator::new(&tracking).compute_parallel(&p).unwrap();
        assert!((result - 0.5).abs() < 1e-12);

        let names = seen.into_inner().unwrap();
        assert_eq!(names.len(), 4);
        for i in 0..4 {
            assert!(names.contains(&Some(format!("trap-worker-{}", i))));
        }
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let exploding = |x: f64| {
            if x > 0.75 {
                panic!("integrand failure");
            }
            x
        };
        let p = params(0.0, 1.0, 1_000, 2);
        let err = ParallelCoordinator::new(&exploding).compute_parallel(&p).unwrap_err();
        assert!(matches!(err, IntegrationError::WorkerPanicked { worker: Some(1) }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_integrate_report() {
        let p = params(0.0, 1.0, 100_000, 2);
        let report = ParallelCoordinator::new(&Square).integrate(&p).unwrap();
        assert_eq!(report.strategy(), Strategy::Parallel);
        assert_eq!(report.params().thread_count(), 2);
        assert!(report.elapsed_seconds() >= 0.0);
        assert!(report.abs_error().unwrap() < 1e-6);
    }

    #[test]
    fn test_integrate_repeated() {
        let p = params(0.0, 1.0, 20_000, 3);
        let summary = ParallelCoordinator::new(&Square).integrate_repeated(&p, 5).unwrap();
        assert_eq!(summary.reports().len(), 5);
        assert!(summary.estimate_spread() < 1e-12);
    }

    #[test]
    fn test_sweep() {
        let p = params(0.0, 1.0, 40_000, 4);
        let points = ParallelCoordinator::new(&Square).sweep(&p).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].threads, 1);
        assert_eq!(points[0].strategy, Strategy::Serial);
        assert_eq!(points[3].strategy, Strategy::Parallel);
        for point in &points {
            assert!((point.estimate - points[0].estimate).abs() < 1e-9);
        }
    }
}
