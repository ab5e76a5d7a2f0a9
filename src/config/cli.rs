//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Remainder handling when n is not a multiple of the thread count
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemainderArg {
    /// Last worker absorbs the leftover trapezoids
    LastWorker,
    /// Drop the leftover trapezoids
    Truncate,
}

impl From<RemainderArg> for super::RemainderPolicy {
    fn from(arg: RemainderArg) -> Self {
        match arg {
            RemainderArg::LastWorker => super::RemainderPolicy::LastWorker,
            RemainderArg::Truncate => super::RemainderPolicy::Truncate,
        }
    }
}

/// trapulse - Parallel trapezoidal-rule integrator
#[derive(Parser, Debug)]
#[command(name = "trapulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (command-line flags take precedence)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // === Integration ===
    /// Number of worker threads (1-4)
    #[arg(short = 't', long, env = "TRAPULSE_THREADS")]
    pub threads: Option<usize>,

    /// Lower bound of the interval
    #[arg(short = 'a', long = "lower", env = "TRAPULSE_A", allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// Upper bound of the interval
    #[arg(short = 'b', long = "upper", env = "TRAPULSE_B", allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Number of trapezoids
    #[arg(short = 'n', long = "trapezoids", env = "TRAPULSE_N")]
    pub n: Option<u64>,

    // === Runtime ===
    /// How leftover trapezoids are assigned when n is not divisible by threads
    #[arg(long, value_enum)]
    pub remainder: Option<RemainderArg>,

    /// Minimum accepted trapezoid count
    #[arg(long)]
    pub min_trapezoids: Option<u64>,

    /// Repeat the computation N times and report timing percentiles
    #[arg(long)]
    pub repeat: Option<usize>,

    /// Run every thread count from 1 to --threads and report speedup
    #[arg(long)]
    pub sweep: bool,

    /// Validate configuration and exit without integrating
    #[arg(long)]
    pub dry_run: bool,

    // === Output ===
    /// Write a JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(0) = self.repeat {
            anyhow::bail!("--repeat must be at least 1");
        }
        if self.pretty && self.json_output.is_none() && self.config.is_none() {
            anyhow::bail!("--pretty requires --json-output");
        }
        Ok(())
    }
}
