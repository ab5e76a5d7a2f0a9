//! trapulse CLI entry point

use anyhow::{Context, Result};
use trapulse::config::{cli::Cli, toml::build_config, validator::validate_config, Config};
use trapulse::output::json::{write_json_output, JsonReport};
use trapulse::output::text;
use trapulse::{Integrand, IntegrationParameters, ParallelCoordinator, Square};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);
    cli.validate()?;

    println!("trapulse v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = build_config(&cli)?;
    let params = validate_config(&config).context("Configuration validation failed")?;

    text::print_configuration(&params, &config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    run(&params, &config)
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(params: &IntegrationParameters, config: &Config) -> Result<()> {
    let coordinator = ParallelCoordinator::new(&Square).with_remainder_policy(config.runtime.remainder);
    let mut json = JsonReport::new(params, config.runtime.remainder);

    log::info!("integrating {} over {}", Square.name(), params);

    let summary = coordinator
        .integrate_repeated(params, config.runtime.repeat)
        .context("Integration failed")?;

    if let Some(last) = summary.reports().last() {
        text::print_report(last);
    }
    if summary.reports().len() > 1 {
        text::print_repeat_summary(&summary);
        json.add_repeat_summary(&summary);
    } else if let Some(report) = summary.reports().first() {
        json.add_run(report);
    }

    if config.runtime.sweep {
        let points = coordinator.sweep(params).context("Thread sweep failed")?;
        text::print_sweep(&points);
        json.set_sweep(&points);
    }

    if let Some(ref path) = config.output.json_output {
        write_json_output(path, &json, config.output.json_pretty)?;
        println!();
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}
