//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! Raw configuration is serde-friendly; the integrators only ever see the
//! validated, immutable [`IntegrationParameters`].

pub mod cli;
pub mod toml;
pub mod validator;

use crate::error::IntegrationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Upper bound on worker threads
pub const MAX_THREADS: usize = 4;

/// Driver-level floor on the trapezoid count
pub const DEFAULT_MIN_TRAPEZOIDS: u64 = 10_000;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Unvalidated integration inputs as read from CLI or TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Lower bound
    pub a: f64,
    /// Upper bound
    pub b: f64,
    /// Number of trapezoids
    pub n: u64,
    /// Worker threads (1..=MAX_THREADS)
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_threads() -> usize {
    1
}

/// How trapezoids left over by `n / threads` are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// The last worker absorbs the `n % threads` extra trapezoids
    #[default]
    LastWorker,
    /// Every worker gets exactly `n / threads`; the tail is dropped
    Truncate,
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RemainderPolicy::LastWorker => write!(f, "last-worker"),
            RemainderPolicy::Truncate => write!(f, "truncate"),
        }
    }
}

/// Runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub remainder: RemainderPolicy,
    /// Minimum accepted trapezoid count
    #[serde(default = "default_min_trapezoids")]
    pub min_trapezoids: u64,
    /// Number of timed repetitions
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    /// Run every thread count from 1 up to `threads`
    #[serde(default)]
    pub sweep: bool,
    /// Validate and print configuration without integrating
    #[serde(default)]
    pub dry_run: bool,
}

fn default_min_trapezoids() -> u64 {
    DEFAULT_MIN_TRAPEZOIDS
}

fn default_repeat() -> usize {
    1
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            remainder: RemainderPolicy::default(),
            min_trapezoids: default_min_trapezoids(),
            repeat: default_repeat(),
            sweep: false,
            dry_run: false,
        }
    }
}

/// Report output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write a JSON report to this path
    pub json_output: Option<PathBuf>,
    /// Pretty-print the JSON report
    #[serde(default)]
    pub json_pretty: bool,
}

/// Validated integration inputs
///
/// Only constructible through [`IntegrationParameters::new`], so every instance
/// satisfies `a < b`, finite bounds, `n >= 1` and `1 <= thread_count <= MAX_THREADS`.
/// Shared read-only by all workers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegrationParameters {
    a: f64,
    b: f64,
    n: u64,
    thread_count: usize,
}

impl IntegrationParameters {
    pub fn new(a: f64, b: f64, n: u64, thread_count: usize) -> Result<Self, IntegrationError> {
        check_thread_count(thread_count)?;
        if !a.is_finite() || !b.is_finite() {
            return Err(IntegrationError::invalid(format!(
                "bounds must be finite, got a={}, b={}",
                a, b
            )));
        }
        if a >= b {
            return Err(IntegrationError::invalid(format!(
                "a must be less than b, got a={}, b={}",
                a, b
            )));
        }
        if n == 0 {
            return Err(IntegrationError::invalid("n must be at least 1"));
        }

        Ok(Self { a, b, n, thread_count })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Trapezoid width, (b - a) / n
    pub fn height(&self) -> f64 {
        (self.b - self.a) / self.n as f64
    }

    /// Same bounds and count with a different worker count
    pub fn with_thread_count(&self, thread_count: usize) -> Result<Self, IntegrationError> {
        Self::new(self.a, self.b, self.n, thread_count)
    }
}

/// Reject thread counts outside 1..=MAX_THREADS
pub(crate) fn check_thread_count(thread_count: usize) -> Result<(), IntegrationError> {
    if thread_count == 0 || thread_count > MAX_THREADS {
        return Err(IntegrationError::invalid(format!(
            "thread count must be between 1 and {}, got {}",
            MAX_THREADS, thread_count
        )));
    }
    Ok(())
}

impl fmt::Display for IntegrationParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}, {}] with n={} trapezoids on {} thread(s)",
            self.a, self.b, self.n, self.thread_count
        )
    }
}
