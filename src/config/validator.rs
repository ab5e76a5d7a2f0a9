//! Configuration validation

use super::*;
use anyhow::{Context, Result};

/// Validate complete configuration and produce integration parameters
pub fn validate_config(config: &Config) -> Result<IntegrationParameters> {
    let params = validate_integration(&config.integration, &config.runtime)?;
    validate_runtime(&config.runtime)?;
    validate_output(&config.output)?;

    Ok(params)
}

/// Validate integration inputs against the driver-level minimum
pub fn validate_integration(
    integration: &IntegrationConfig,
    runtime: &RuntimeConfig,
) -> Result<IntegrationParameters> {
    if integration.n < runtime.min_trapezoids {
        return Err(IntegrationError::invalid(format!(
            "n must be at least {}, got {}",
            runtime.min_trapezoids, integration.n
        ))
        .into());
    }

    let params = IntegrationParameters::new(
        integration.a,
        integration.b,
        integration.n,
        integration.threads,
    )?;

    if runtime.remainder == RemainderPolicy::Truncate {
        let dropped = params.n() % params.thread_count() as u64;
        if dropped > 0 {
            log::warn!(
                "truncate policy drops {} of {} trapezoids; the estimate will not cover [{}, {}]",
                dropped,
                params.n(),
                params.a(),
                params.b()
            );
        }
    }

    let cpus = num_cpus::get();
    if params.thread_count() > cpus {
        log::warn!(
            "{} worker threads requested but only {} CPUs available",
            params.thread_count(),
            cpus
        );
    }

    Ok(params)
}

/// Validate runtime configuration
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.repeat == 0 {
        anyhow::bail!("repeat must be at least 1");
    }
    if runtime.min_trapezoids == 0 {
        anyhow::bail!("min_trapezoids must be at least 1");
    }
    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.json_output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(anyhow::anyhow!("directory does not exist: {}", parent.display()))
                    .context("Invalid JSON output path");
            }
        }
    }
    Ok(())
}
