//! Aggregation for flat counter (JaCoCo) reports.
//!
//! Percentages are rendered to text first, in the `"30.00%(3/10)"` form
//! JaCoCo users know from the console, and only then parsed back into
//! numbers for the threshold gate. The rendered text is kept on the stats
//! so the reporting layer prints exactly what was computed.

use crate::detect::Format;
use crate::model::{CoverageStats, Dimension};
use crate::parsers::jacoco::{Counter, CounterType, JacocoReport};

/// Percentages rendered from the report-level counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterMetrics {
    pub instruction: String,
    pub branch: String,
    pub line: String,
    pub method: String,
    pub class: String,
    /// COMPLEXITY covered + missed.
    pub complexity: u64,
    /// LINE covered + missed.
    pub lines_of_code: u64,
}

impl CounterMetrics {
    pub fn to_stats(&self) -> CoverageStats {
        let mut stats = CoverageStats::new(Format::Jacoco);
        stats.instruction_coverage = parse_percentage(&self.instruction);
        stats.branch_coverage = parse_percentage(&self.branch);
        stats.line_coverage = parse_percentage(&self.line);
        stats.method_coverage = parse_percentage(&self.method);
        stats.class_coverage = parse_percentage(&self.class);
        stats.complexity = self.complexity;
        stats.lines_of_code = self.lines_of_code;
        stats.complexity_density = format!("{}/{}", self.complexity, self.lines_of_code);
        stats.counter_summaries = vec![
            (Dimension::Instruction, self.instruction.clone()),
            (Dimension::Branch, self.branch.clone()),
            (Dimension::Line, self.line.clone()),
            (Dimension::Method, self.method.clone()),
            (Dimension::Class, self.class.clone()),
        ];
        stats
    }
}

pub fn aggregate(report: &JacocoReport) -> CoverageStats {
    calculate(report).to_stats()
}

pub fn calculate(report: &JacocoReport) -> CounterMetrics {
    let counters = &report.counters;
    let percentage = |kind: CounterType| {
        let (covered, missed) = counter_values(counters, &kind);
        render_percentage(covered, missed)
    };

    let (complexity_covered, complexity_missed) =
        counter_values(counters, &CounterType::Complexity);
    let (line_covered, line_missed) = counter_values(counters, &CounterType::Line);

    CounterMetrics {
        instruction: percentage(CounterType::Instruction),
        branch: percentage(CounterType::Branch),
        line: render_percentage(line_covered, line_missed),
        method: percentage(CounterType::Method),
        class: percentage(CounterType::Class),
        // The two complexity sub-counts are summed into one scalar.
        complexity: complexity_covered.saturating_add(complexity_missed),
        lines_of_code: line_covered.saturating_add(line_missed),
    }
}

/// `(covered, missed)` of the first counter of the given type, or `(0, 0)`.
pub fn counter_values(counters: &[Counter], kind: &CounterType) -> (u64, u64) {
    let mut matching = counters.iter().filter(|c| &c.kind == kind);
    let Some(first) = matching.next() else {
        return (0, 0);
    };
    if matching.next().is_some() {
        eprintln!(
            "Warning: duplicate {} counters in report, using the first",
            kind.as_str()
        );
    }
    (first.covered, first.missed)
}

/// Render as `"P.PP%(covered/total)"`, or `"0%(0/0)"` for an empty counter.
pub fn render_percentage(covered: u64, missed: u64) -> String {
    let total = covered.saturating_add(missed);
    if total == 0 {
        return "0%(0/0)".to_string();
    }
    let percentage = covered as f64 / total as f64 * 100.0;
    format!("{percentage:.2}%({covered}/{total})")
}

/// Read back the leading number of a rendered percentage.
pub fn parse_percentage(rendered: &str) -> f64 {
    let rendered = rendered.trim_start();
    let end = rendered
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rendered.len());
    match rendered[..end].parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Warning: could not read percentage from '{rendered}'");
            0.0
        }
    }
}
