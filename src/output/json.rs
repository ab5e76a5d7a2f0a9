//! JSON output formatting
//!
//! Serializes run results, repeat timing percentiles and sweep rows into a
//! single report document.

use crate::config::{IntegrationParameters, RemainderPolicy};
use crate::stats::{IntegrationReport, RepeatSummary, Strategy, SweepPoint};
use crate::util::time::format_duration;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Integration inputs
#[derive(Debug, Clone, Serialize)]
pub struct JsonParameters {
    pub a: f64,
    pub b: f64,
    pub n: u64,
    pub threads: usize,
    pub height: f64,
    pub remainder: RemainderPolicy,
}

/// One timed run
#[derive(Debug, Clone, Serialize)]
pub struct JsonRun {
    pub threads: usize,
    pub strategy: Strategy,
    pub estimate: f64,
    pub elapsed: JsonDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_error: Option<f64>,
}

/// Timing percentiles over repeated runs
#[derive(Debug, Clone, Serialize)]
pub struct JsonTiming {
    pub min: JsonDuration,
    pub mean: JsonDuration,
    pub p50: JsonDuration,
    pub p99: JsonDuration,
    pub max: JsonDuration,
}

/// One sweep row
#[derive(Debug, Clone, Serialize)]
pub struct JsonSweepPoint {
    #[serde(flatten)]
    pub point: SweepPoint,
    pub elapsed: JsonDuration,
}

/// Complete report document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub timestamp: String,
    pub version: String,
    pub parameters: JsonParameters,
    pub runs: Vec<JsonRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<JsonTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<Vec<JsonSweepPoint>>,
}

impl JsonReport {
    pub fn new(params: &IntegrationParameters, remainder: RemainderPolicy) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            parameters: JsonParameters {
                a: params.a(),
                b: params.b(),
                n: params.n(),
                threads: params.thread_count(),
                height: params.height(),
                remainder,
            },
            runs: Vec::new(),
            timing: None,
            estimate_spread: None,
            sweep: None,
        }
    }

    pub fn add_run(&mut self, report: &IntegrationReport) {
        self.runs.push(JsonRun {
            threads: report.params().thread_count(),
            strategy: report.strategy(),
            estimate: report.estimate(),
            elapsed: JsonDuration::from_duration(report.elapsed()),
            abs_error: report.abs_error(),
        });
    }

    /// Add every run of `summary` plus its timing percentiles
    pub fn add_repeat_summary(&mut self, summary: &RepeatSummary) {
        for report in summary.reports() {
            self.add_run(report);
        }

        let timing = summary.timing();
        if let (Some(min), Some(mean), Some(p50), Some(p99), Some(max)) = (
            timing.min(),
            timing.mean(),
            timing.percentile(50.0),
            timing.percentile(99.0),
            timing.max(),
        ) {
            self.timing = Some(JsonTiming {
                min: JsonDuration::from_duration(min),
                mean: JsonDuration::from_duration(mean),
                p50: JsonDuration::from_duration(p50),
                p99: JsonDuration::from_duration(p99),
                max: JsonDuration::from_duration(max),
            });
        }
        self.estimate_spread = Some(summary.estimate_spread());
    }

    pub fn set_sweep(&mut self, points: &[SweepPoint]) {
        self.sweep = Some(
            points
                .iter()
                .map(|point| JsonSweepPoint {
                    elapsed: JsonDuration::from_duration(point.elapsed),
                    point: point.clone(),
                })
                .collect(),
        );
    }
}

/// Write JSON report to file
pub fn write_json_output(output_path: &Path, report: &JsonReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;

    if pretty {
        serde_json::to_writer_pretty(file, report)?;
    } else {
        serde_json::to_writer(file, report)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(threads: usize, millis: u64) -> IntegrationReport {
        let params = IntegrationParameters::new(0.0, 1.0, 100_000, threads).unwrap();
        IntegrationReport::new(
            params,
            RemainderPolicy::LastWorker,
            if threads == 1 { Strategy::Serial } else { Strategy::Parallel },
            0.333_333_333_35,
            Duration::from_millis(millis),
            Some(1.0 / 3.0),
        )
    }

    #[test]
    fn test_json_duration() {
        let d = JsonDuration::from_duration(Duration::from_micros(2500));
        assert_eq!(d.micros, 2500);
        assert_eq!(d.human, "2.50ms");
    }

    #[test]
    fn test_report_serialization() {
        let run = sample_report(4, 12);
        let mut report = JsonReport::new(run.params(), RemainderPolicy::LastWorker);
        report.add_run(&run);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["parameters"]["n"], 100_000);
        assert_eq!(value["parameters"]["remainder"], "last_worker");
        assert_eq!(value["runs"][0]["strategy"], "parallel");
        assert_eq!(value["runs"][0]["elapsed"]["micros"], 12_000);
        assert!(value["runs"][0]["abs_error"].is_number());
        assert!(value.get("timing").is_none());
        assert!(value.get("sweep").is_none());
    }

    #[test]
    fn test_repeat_and_sweep_sections() {
        let mut summary = RepeatSummary::new().unwrap();
        summary.record(sample_report(2, 10));
        summary.record(sample_report(2, 20));

        let mut report = JsonReport::new(summary.reports()[0].params(), RemainderPolicy::Truncate);
        report.add_repeat_summary(&summary);
        let points = crate::stats::summarize_sweep(&[sample_report(1, 20), sample_report(2, 10)]);
        report.set_sweep(&points);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["runs"].as_array().unwrap().len(), 2);
        assert!(value["timing"]["p99"]["micros"].is_u64());
        assert_eq!(value["estimate_spread"], 0.0);
        assert_eq!(value["sweep"][1]["threads"], 2);
        assert_eq!(value["sweep"][1]["speedup"], 2.0);
        assert_eq!(value["parameters"]["remainder"], "truncate");
    }

    #[test]
    fn test_write_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let run = sample_report(1, 5);
        let mut report = JsonReport::new(run.params(), RemainderPolicy::LastWorker);
        report.add_run(&run);

        write_json_output(&path, &report, true).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["runs"][0]["strategy"], "serial");
        assert!(contents.contains('\n'));
    }
}
