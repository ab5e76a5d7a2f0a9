//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_A: f64 = 0.0;
const DEFAULT_B: f64 = 1.0;
const DEFAULT_N: u64 = 1_000_000;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the run configuration from CLI arguments, loading `--config` first if given
pub fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config {
            integration: IntegrationConfig {
                a: DEFAULT_A,
                b: DEFAULT_B,
                n: DEFAULT_N,
                threads: 1,
            },
            runtime: RuntimeConfig::default(),
            output: OutputConfig::default(),
        },
    };

    Ok(merge_cli_with_config(cli, base))
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(a) = cli.a {
        config.integration.a = a;
    }
    if let Some(b) = cli.b {
        config.integration.b = b;
    }
    if let Some(n) = cli.n {
        config.integration.n = n;
    }
    if let Some(threads) = cli.threads {
        config.integration.threads = threads;
    }

    if let Some(remainder) = cli.remainder {
        config.runtime.remainder = remainder.into();
    }
    if let Some(min) = cli.min_trapezoids {
        config.runtime.min_trapezoids = min;
    }
    if let Some(repeat) = cli.repeat {
        config.runtime.repeat = repeat;
    }
    if cli.sweep {
        config.runtime.sweep = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }

    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.pretty {
        config.output.json_pretty = true;
    }

    config
}
