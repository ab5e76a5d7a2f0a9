//! trapulse - Parallel trapezoidal-rule integrator
//!
//! trapulse estimates a definite integral with the composite trapezoidal rule,
//! splitting the trapezoids across a small fixed pool of OS threads and merging
//! the per-worker partial sums into one mutex-protected total.
//!
//! # Architecture
//!
//! - **Integrand**: pure function evaluated concurrently by every worker
//! - **Serial integrator**: single-threaded baseline and one-thread fast path
//! - **Workers**: contiguous trapezoid ranges, batched extended-precision sums
//! - **Coordinator**: scoped worker launch, locked merge, join barrier
//! - **Reports**: timing, repeat histograms, thread sweeps, text/JSON output

pub mod config;
pub mod coordinator;
pub mod error;
pub mod integrand;
pub mod output;
pub mod serial;
pub mod stats;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::{Config, IntegrationParameters, RemainderPolicy, MAX_THREADS};
pub use coordinator::ParallelCoordinator;
pub use error::IntegrationError;
pub use integrand::{Integrand, Square};
pub use stats::IntegrationReport;

/// Result type used throughout trapulse
pub type Result<T> = anyhow::Result<T>;
