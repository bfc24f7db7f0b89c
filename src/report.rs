//! Output formatting for gate results.

use std::fmt::Write;

use serde::Serialize;

use crate::detect::Format;
use crate::evaluate::Verdict;
use crate::model::{CoverageStats, Dimension};

/// Aggregated stats plus the verdict reached on them, ready to be formatted.
#[derive(Debug, Serialize)]
pub struct GateReport<'a> {
    pub format: Format,
    pub stats: &'a CoverageStats,
    pub verdict: &'a Verdict,
}

impl<'a> GateReport<'a> {
    pub fn new(stats: &'a CoverageStats, verdict: &'a Verdict) -> Self {
        Self {
            format: stats.format,
            stats,
            verdict,
        }
    }

    /// Format using a specific formatter.
    #[must_use]
    pub fn format(&self, formatter: &dyn ReportFormatter) -> String {
        formatter.format(self)
    }
}

/// Trait for formatting gate reports.
pub trait ReportFormatter {
    /// Format the report to a string.
    fn format(&self, report: &GateReport) -> String;
}

/// Human-readable console summary.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &GateReport) -> String {
        let mut out = format_stats(report.stats);

        let verdict = report.verdict;
        if !verdict.enforced {
            out.push_str("Thresholds: not enforced\n");
        } else if verdict.passed {
            out.push_str("Thresholds: passed\n");
        } else {
            out.push_str("Thresholds: FAILED\n");
            for failed in &verdict.failed {
                writeln!(out, "  {failed}").unwrap();
            }
        }
        out
    }
}

/// `KEY=VALUE` lines, one per output variable.
pub struct EnvFormatter;

impl ReportFormatter for EnvFormatter {
    fn format(&self, report: &GateReport) -> String {
        let mut out = String::new();
        for (key, value) in output_variables(report.stats) {
            writeln!(out, "{key}={value}").unwrap();
        }
        out
    }
}

/// Pretty-printed JSON document.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &GateReport) -> String {
        // Every field is a plain number, string or enum; this cannot fail.
        let mut out = serde_json::to_string_pretty(report).unwrap_or_default();
        out.push('\n');
        out
    }
}

/// The console summary for a set of stats, one metric per line.
///
/// Counter reports print their literal renderings (`30.00%(3/10)`) rather
/// than the parsed-back numbers.
pub fn format_stats(stats: &CoverageStats) -> String {
    let mut out = String::new();
    match stats.format {
        Format::Cobertura => {
            let rows = [
                ("Package", stats.package_coverage),
                ("File", stats.file_coverage),
                ("Class", stats.class_coverage),
                ("Method", stats.method_coverage),
                ("Branch", stats.branch_coverage),
                ("Line", stats.line_coverage),
            ];
            for (label, value) in rows {
                writeln!(out, "{label} Coverage: {value:.2}%").unwrap();
            }
        }
        Format::Jacoco => {
            for (dimension, rendered) in &stats.counter_summaries {
                writeln!(out, "{dimension} Coverage: {rendered}").unwrap();
            }
        }
    }
    writeln!(out, "Complexity: {}", stats.complexity).unwrap();
    writeln!(out, "Complexity Density: {}", stats.complexity_density).unwrap();
    writeln!(out, "LOC: {}", stats.lines_of_code).unwrap();
    out
}

/// Named output variables in publishing order.
pub fn output_variables(stats: &CoverageStats) -> Vec<(&'static str, String)> {
    let pct = |dimension: Dimension| {
        (
            dimension.output_key(),
            format!("{:.2}", stats.coverage(dimension)),
        )
    };

    let mut vars = match stats.format {
        Format::Cobertura => vec![
            pct(Dimension::Branch),
            pct(Dimension::Line),
            pct(Dimension::Method),
            pct(Dimension::Class),
            pct(Dimension::File),
            pct(Dimension::Package),
            ("COMPLEXITY_COVERAGE", stats.complexity.to_string()),
        ],
        Format::Jacoco => vec![
            pct(Dimension::Instruction),
            pct(Dimension::Branch),
            pct(Dimension::Line),
            ("COMPLEXITY_COVERAGE", stats.complexity.to_string()),
            pct(Dimension::Method),
            pct(Dimension::Class),
        ],
    };
    vars.push(("COMPLEXITY_DENSITY", stats.complexity_density.clone()));
    vars.push(("LOC", stats.lines_of_code.to_string()));
    vars
}
