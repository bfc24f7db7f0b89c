//! Command handler functions for the covgate CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::detect::Format;
use crate::evaluate::{gate, Verdict};
use crate::metrics::collect;
use crate::model::Dimension;
use crate::report::{EnvFormatter, GateReport, JsonFormatter, ReportFormatter, TextFormatter};
use crate::thresholds::Thresholds;

/// Output style for results on stdout.
#[derive(Clone, ValueEnum)]
pub enum Style {
    Text,
    Json,
    Env,
}

impl Style {
    fn formatter(&self) -> &'static dyn ReportFormatter {
        match self {
            Style::Text => &TextFormatter,
            Style::Json => &JsonFormatter,
            Style::Env => &EnvFormatter,
        }
    }
}

/// Threshold flags. Each one falls back to the plugin environment variable
/// of the same meaning, then to the `--thresholds` file, then to zero.
#[derive(Args, Debug, Default, Clone)]
pub struct ThresholdArgs {
    /// JSON file with threshold values.
    #[arg(long, env = "PLUGIN_THRESHOLDS_FILE")]
    pub thresholds: Option<PathBuf>,

    /// Minimum branch coverage percentage.
    #[arg(long, env = "PLUGIN_THRESHOLD_BRANCH")]
    pub threshold_branch: Option<f64>,

    /// Minimum class coverage percentage.
    #[arg(long, env = "PLUGIN_THRESHOLD_CLASS")]
    pub threshold_class: Option<f64>,

    /// Minimum line coverage percentage.
    #[arg(long, env = "PLUGIN_THRESHOLD_LINE")]
    pub threshold_line: Option<f64>,

    /// Minimum method coverage percentage.
    #[arg(long, env = "PLUGIN_THRESHOLD_METHOD")]
    pub threshold_method: Option<f64>,

    /// Minimum package coverage percentage (Cobertura only).
    #[arg(long, env = "PLUGIN_THRESHOLD_PACKAGE")]
    pub threshold_package: Option<f64>,

    /// Minimum file coverage value (Cobertura only).
    #[arg(long, env = "PLUGIN_THRESHOLD_FILE")]
    pub threshold_file: Option<f64>,

    /// Minimum instruction coverage percentage (JaCoCo only).
    #[arg(long, env = "PLUGIN_THRESHOLD_INSTRUCTION")]
    pub threshold_instruction: Option<f64>,

    /// Minimum number of instrumented lines.
    #[arg(long, env = "PLUGIN_THRESHOLD_LOC")]
    pub threshold_loc: Option<u64>,

    /// Maximum total complexity.
    #[arg(long, env = "PLUGIN_THRESHOLD_COMPLEXITY")]
    pub threshold_complexity: Option<u64>,

    /// Maximum complexity per line of code.
    #[arg(long, env = "PLUGIN_THRESHOLD_COMPLEXITY_DENSITY")]
    pub threshold_complexity_density: Option<f64>,
}

impl ThresholdArgs {
    /// Merge the file (if any) with flag overrides and validate the result.
    pub fn resolve(&self) -> crate::error::Result<Thresholds> {
        let mut thresholds = match &self.thresholds {
            Some(path) => Thresholds::load(path)?,
            None => Thresholds::default(),
        };

        let minimums = [
            (Dimension::Branch, self.threshold_branch),
            (Dimension::Class, self.threshold_class),
            (Dimension::Line, self.threshold_line),
            (Dimension::Method, self.threshold_method),
            (Dimension::Package, self.threshold_package),
            (Dimension::File, self.threshold_file),
            (Dimension::Instruction, self.threshold_instruction),
        ];
        for (dimension, value) in minimums {
            if let Some(value) = value {
                thresholds.set_minimum(dimension, value);
            }
        }
        if let Some(loc) = self.threshold_loc {
            thresholds.min_lines_of_code = loc;
        }
        if let Some(max) = self.threshold_complexity {
            thresholds.max_complexity = Some(max);
        }
        if let Some(max) = self.threshold_complexity_density {
            thresholds.max_complexity_density = Some(max);
        }

        thresholds.validate()?;
        Ok(thresholds)
    }
}

/// Result of `cmd_check`: the rendered output and the verdict behind it.
pub struct CheckOutput {
    pub output: String,
    /// The console summary, for callers that print machine output on stdout.
    pub summary: String,
    pub verdict: Verdict,
}

fn parse_format(format: Option<&str>) -> Result<Option<Format>> {
    format
        .filter(|f| !f.trim().is_empty())
        .map(str::parse::<Format>)
        .transpose()
        .map_err(Into::into)
}

pub fn cmd_check(
    report: &Path,
    format: Option<&str>,
    thresholds: &Thresholds,
    enforce: bool,
    style: &Style,
) -> Result<CheckOutput> {
    let format = parse_format(format)?;
    let stats = collect(report, format)
        .with_context(|| format!("Failed to evaluate {}", report.display()))?;
    let verdict = gate(&stats, thresholds, enforce);

    let gate_report = GateReport::new(&stats, &verdict);
    Ok(CheckOutput {
        output: gate_report.format(style.formatter()),
        summary: gate_report.format(&TextFormatter),
        verdict,
    })
}

pub fn cmd_summary(report: &Path, format: Option<&str>, style: &Style) -> Result<String> {
    let format = parse_format(format)?;
    let stats = collect(report, format)
        .with_context(|| format!("Failed to read coverage from {}", report.display()))?;

    let output = match style {
        Style::Text => crate::report::format_stats(&stats),
        _ => GateReport::new(&stats, &Verdict::skipped()).format(style.formatter()),
    };
    Ok(output)
}
