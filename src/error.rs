//! Error types for the integration core
//!
//! Parameter problems are recoverable by the caller (fix the input and retry).
//! Everything else means the computation was abandoned and no estimate exists.

use std::io;
use thiserror::Error;

/// Errors raised by the serial and parallel integrators
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Rejected input: thread count, bounds or trapezoid count
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The OS refused to start a worker thread
    #[error("failed to launch worker thread {worker}")]
    ThreadLaunch {
        worker: usize,
        #[source]
        source: io::Error,
    },

    /// A worker panicked before merging its partial sum
    #[error("worker thread{} panicked", describe_worker(.worker))]
    WorkerPanicked { worker: Option<usize> },

    /// The shared total's lock was poisoned by a panicking worker
    #[error("shared total lock poisoned")]
    LockPoisoned,
}

fn describe_worker(worker: &Option<usize>) -> String {
    match worker {
        Some(index) => format!(" {}", index),
        None => String::new(),
    }
}

impl IntegrationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        IntegrationError::InvalidParameter(msg.into())
    }

    /// True when the caller can correct the input and try again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IntegrationError::InvalidParameter(_))
    }
}
