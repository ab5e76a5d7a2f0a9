//! Partitioned trapezoid workers
//!
//! This module implements the per-thread unit of work. The n trapezoids are
//! split into contiguous index ranges, one per worker, and each worker sums
//! its range independently into an extended-precision accumulator.
//!
//! # Range accounting
//!
//! Sample point k is always computed as `a + k·h` from its global index, so
//! adjacent ranges share their boundary point bit-for-bit. Each range weights
//! its own end points by one half, which gives every interior boundary its
//! full trapezoidal weight once the partial sums are combined.
//!
//! # Example
//!
//! ```
//! use trapulse::worker::{PartitionedWorker, WorkerRange};
//! use trapulse::{RemainderPolicy, Square};
//!
//! let n = 1_000;
//! let h = 1.0 / n as f64;
//! let worker = PartitionedWorker::new(&Square, 0.0, h);
//!
//! let total: f64 = WorkerRange::partition(n, 3, RemainderPolicy::LastWorker)
//!     .iter()
//!     .map(|range| worker.compute_partial(range).value())
//!     .sum();
//!
//! assert!((total * h - 1.0 / 3.0).abs() < 1e-6);
//! ```

pub mod accumulator;

use crate::config::RemainderPolicy;
use crate::integrand::Integrand;
pub use accumulator::ExtendedSum;

/// Interior points evaluated per batch
pub const BATCH_SIZE: usize = 16;

/// Contiguous trapezoid indices `[first, last)` owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerRange {
    index: usize,
    first: u64,
    last: u64,
}

impl WorkerRange {
    /// Range for worker `index` of `thread_count`
    ///
    /// Every worker gets `n / thread_count` trapezoids. Under
    /// [`RemainderPolicy::LastWorker`] the final worker also takes the
    /// `n % thread_count` leftovers so the ranges cover `[0, n)` exactly.
    pub fn for_worker(index: usize, n: u64, thread_count: usize, policy: RemainderPolicy) -> Self {
        debug_assert!(thread_count > 0 && index < thread_count);

        let per_worker = n / thread_count as u64;
        let first = per_worker * index as u64;
        let last = if index + 1 == thread_count && policy == RemainderPolicy::LastWorker {
            n
        } else {
            first + per_worker
        };

        Self { index, first, last }
    }

    /// Ranges for all workers, in index order
    pub fn partition(n: u64, thread_count: usize, policy: RemainderPolicy) -> Vec<Self> {
        (0..thread_count)
            .map(|index| Self::for_worker(index, n, thread_count, policy))
            .collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of trapezoids in the range
    pub fn len(&self) -> u64 {
        self.last - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    /// Left end of the range, `a + first·h`
    pub fn start(&self, a: f64, h: f64) -> f64 {
        a + self.first as f64 * h
    }

    /// Right end of the range, `a + last·h`
    pub fn end(&self, a: f64, h: f64) -> f64 {
        a + self.last as f64 * h
    }
}

/// Computes trapezoid partial sums over worker ranges
///
/// Holds only shared references and copies, so one instance can be used from
/// every worker thread at once.
#[derive(Debug)]
pub struct PartitionedWorker<'f, F: ?Sized> {
    integrand: &'f F,
    a: f64,
    h: f64,
}

impl<'f, F: Integrand + ?Sized> PartitionedWorker<'f, F> {
    pub fn new(integrand: &'f F, a: f64, h: f64) -> Self {
        Self { integrand, a, h }
    }

    /// Unscaled trapezoid sum over `range`
    ///
    /// Returns `(f(start) + f(end)) / 2 + Σ f(a + k·h)` for the interior indices
    /// `first < k < last`. An empty range evaluates nothing and returns zero.
    /// The caller multiplies the combined sum by h.
    pub fn compute_partial(&self, range: &WorkerRange) -> ExtendedSum {
        if range.is_empty() {
            return ExtendedSum::new();
        }

        let f = self.integrand;
        let mut local = ExtendedSum::with_value(
            (f.evaluate(range.start(self.a, self.h)) + f.evaluate(range.end(self.a, self.h))) / 2.0,
        );

        let mut k = range.first + 1;
        let interior_end = range.last;

        // Evaluate a full batch before touching the accumulator so the
        // evaluations stay independent of the compensation chain.
        let mut lanes = [0.0f64; BATCH_SIZE];
        while k + BATCH_SIZE as u64 <= interior_end {
            for (offset, lane) in lanes.iter_mut().enumerate() {
                *lane = f.evaluate(self.point(k + offset as u64));
            }
            for &value in &lanes {
                local += value;
            }
            k += BATCH_SIZE as u64;
        }

        while k < interior_end {
            local += f.evaluate(self.point(k));
            k += 1;
        }

        local
    }

    #[inline]
    fn point(&self, k: u64) -> f64 {
        self.a + k as f64 * self.h
    }
}
