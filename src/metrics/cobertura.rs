//! Aggregation for hierarchical (Cobertura) reports.
//!
//! A class, method or package counts as covered as soon as one of its
//! lines was executed. Branch totals come only from `condition-coverage`
//! text; lines without it contribute nothing.

use std::sync::LazyLock;

use regex::Regex;

use crate::detect::Format;
use crate::model::{percent, CoverageStats};
use crate::parsers::cobertura::{CoberturaReport, Line, Method};

/// Condition coverage text such as "50% (2/4)".
static CONDITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)% \((\d+)/(\d+)\)").unwrap());

#[derive(Debug, Default)]
struct Totals {
    lines: u64,
    covered_lines: u64,
    branches: u64,
    covered_branches: u64,
    packages: u64,
    covered_packages: u64,
    classes: u64,
    covered_classes: u64,
    methods: u64,
    covered_methods: u64,
    complexity: f64,
}

pub fn aggregate(report: &CoberturaReport) -> CoverageStats {
    let mut t = Totals::default();

    for package in &report.packages {
        let mut package_covered_classes = 0u64;

        for class in &package.classes {
            let (class_lines, class_lines_covered) = line_stats(&class.lines);
            t.classes += 1;
            if class_lines_covered > 0 {
                t.covered_classes += 1;
                package_covered_classes += 1;
            }
            t.lines += class_lines;
            t.covered_lines += class_lines_covered;
            t.complexity += class.complexity;

            for line in &class.lines {
                if let Some(text) = line.condition_coverage.as_deref() {
                    let (covered, total) = parse_condition_coverage(text);
                    t.covered_branches = t.covered_branches.saturating_add(covered);
                    t.branches = t.branches.saturating_add(total);
                }
            }

            let (methods, methods_covered) = method_stats(&class.methods);
            t.methods += methods;
            t.covered_methods += methods_covered;
        }

        t.packages += 1;
        if package_covered_classes > 0 {
            t.covered_packages += 1;
        }
    }

    // Fractional complexities are summed first, then truncated once.
    let complexity = if t.complexity.is_finite() && t.complexity > 0.0 {
        t.complexity as u64
    } else {
        0
    };

    let mut stats = CoverageStats::new(Format::Cobertura);
    stats.package_coverage = percent(t.covered_packages, t.packages);
    // Covered lines over package count. Not a per-file ratio, but it is
    // the value this gate has always published as FILE_COVERAGE.
    stats.file_coverage = percent(t.covered_lines, t.packages);
    stats.class_coverage = percent(t.covered_classes, t.classes);
    stats.branch_coverage = percent(t.covered_branches, t.branches);
    stats.line_coverage = percent(t.covered_lines, t.lines);
    stats.method_coverage = percent(t.covered_methods, t.methods);
    stats.complexity = complexity;
    stats.lines_of_code = t.lines;
    stats.complexity_density = format!("{}/{}", complexity, t.lines);
    stats
}

/// `(total, covered)` where a line is covered when it has any hits.
fn line_stats(lines: &[Line]) -> (u64, u64) {
    let covered = lines.iter().filter(|l| l.hits > 0).count() as u64;
    (lines.len() as u64, covered)
}

fn method_stats(methods: &[Method]) -> (u64, u64) {
    let covered = methods
        .iter()
        .filter(|m| line_stats(&m.lines).1 > 0)
        .count() as u64;
    (methods.len() as u64, covered)
}

/// Extract `(covered, total)` from condition coverage text. Text that does
/// not match contributes nothing.
pub fn parse_condition_coverage(text: &str) -> (u64, u64) {
    let Some(caps) = CONDITION_RE.captures(text) else {
        eprintln!("Warning: ignoring unrecognised condition-coverage '{text}'");
        return (0, 0);
    };
    let covered = caps[2].parse().unwrap_or(0);
    let total = caps[3].parse().unwrap_or(0);
    (covered, total)
}
