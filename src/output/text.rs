//! Human-readable text output

use crate::config::{Config, IntegrationParameters};
use crate::stats::{IntegrationReport, RepeatSummary, SweepPoint};
use crate::util::time::format_duration;

/// Print the validated configuration
pub fn print_configuration(params: &IntegrationParameters, config: &Config) {
    println!("Configuration:");
    println!("  Interval:   [{}, {}]", params.a(), params.b());
    println!("  Trapezoids: {}", format_number(params.n()));
    println!("  Height:     {:e}", params.height());
    println!("  Threads:    {}", params.thread_count());
    println!("  Remainder:  {}", config.runtime.remainder);
    if config.runtime.repeat > 1 {
        println!("  Repeat:     {}", config.runtime.repeat);
    }
    if config.runtime.sweep {
        println!("  Sweep:      1..={} threads", params.thread_count());
    }
    if let Some(ref path) = config.output.json_output {
        println!("  JSON:       {}", path.display());
    }
}

/// Print one integration result
pub fn print_report(report: &IntegrationReport) {
    let params = report.params();
    println!("With n = {} trapezoids, our estimate", params.n());
    println!(
        "of the integral from {:.6} to {:.6} = {:.15}",
        params.a(),
        params.b(),
        report.estimate()
    );
    println!("The elapsed time is {:e} seconds", report.elapsed_seconds());
    println!("  Strategy:  {} ({} thread(s))", report.strategy(), params.thread_count());
    if let Some(err) = report.abs_error() {
        println!("  Abs error: {:e}", err);
    }
}

/// Print timing percentiles for repeated runs
pub fn print_repeat_summary(summary: &RepeatSummary) {
    let timing = summary.timing();
    println!();
    println!("Timing over {} runs:", summary.reports().len());

    let rows = [
        ("Min", timing.min()),
        ("Mean", timing.mean()),
        ("p50", timing.percentile(50.0)),
        ("p99", timing.percentile(99.0)),
        ("Max", timing.max()),
    ];
    for (label, value) in rows {
        if let Some(d) = value {
            println!("  {:<5} {}", format!("{}:", label), format_duration(d));
        }
    }
    println!("  Estimate spread: {:e}", summary.estimate_spread());
}

/// Print a thread-count sweep table
pub fn print_sweep(points: &[SweepPoint]) {
    println!();
    println!("Thread sweep:");
    println!("  {:>7}  {:>10}  {:>12}  {:>8}  {:>10}", "threads", "strategy", "elapsed", "speedup", "efficiency");
    for point in points {
        println!(
            "  {:>7}  {:>10}  {:>12}  {:>7.2}x  {:>9.1}%",
            point.threads,
            point.strategy.to_string(),
            format_duration(point.elapsed),
            point.speedup,
            point.efficiency * 100.0
        );
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
