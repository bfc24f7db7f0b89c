//! Format-independent coverage statistics. Both report dialects are rolled
//! up into a single `CoverageStats`, which is what the threshold evaluator
//! and the reporting layer consume.

use serde::Serialize;

use crate::detect::Format;

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// Same as [`rate`], scaled to 0–100.
#[must_use]
pub fn percent(covered: u64, total: u64) -> f64 {
    rate(covered, total) * 100.0
}

/// A percentage dimension that thresholds can be set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Branch,
    Class,
    Line,
    Method,
    Package,
    File,
    Instruction,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Branch => "Branch",
            Dimension::Class => "Class",
            Dimension::Line => "Line",
            Dimension::Method => "Method",
            Dimension::Package => "Package",
            Dimension::File => "File",
            Dimension::Instruction => "Instruction",
        }
    }

    /// Name of the output variable this dimension is published under.
    pub fn output_key(&self) -> &'static str {
        match self {
            Dimension::Branch => "BRANCH_COVERAGE",
            Dimension::Class => "CLASS_COVERAGE",
            Dimension::Line => "LINE_COVERAGE",
            Dimension::Method => "METHOD_COVERAGE",
            Dimension::Package => "PACKAGE_COVERAGE",
            Dimension::File => "FILE_COVERAGE",
            Dimension::Instruction => "INSTRUCTION_COVERAGE",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified result of aggregating one report.
///
/// Percentages are on a 0–100 scale. Dimensions a dialect does not report
/// stay at 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStats {
    pub format: Format,
    pub package_coverage: f64,
    pub file_coverage: f64,
    pub class_coverage: f64,
    pub branch_coverage: f64,
    pub line_coverage: f64,
    pub method_coverage: f64,
    pub instruction_coverage: f64,
    pub complexity: u64,
    pub lines_of_code: u64,
    /// `"<complexity>/<lines_of_code>"`.
    pub complexity_density: String,
    /// Percentages exactly as rendered from pre-summed counters, e.g.
    /// `"30.00%(3/10)"`. Empty for hierarchical reports.
    pub counter_summaries: Vec<(Dimension, String)>,
}

impl CoverageStats {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            package_coverage: 0.0,
            file_coverage: 0.0,
            class_coverage: 0.0,
            branch_coverage: 0.0,
            line_coverage: 0.0,
            method_coverage: 0.0,
            instruction_coverage: 0.0,
            complexity: 0,
            lines_of_code: 0,
            complexity_density: "0/0".to_string(),
            counter_summaries: Vec::new(),
        }
    }

    /// Observed percentage for a dimension.
    #[must_use]
    pub fn coverage(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Branch => self.branch_coverage,
            Dimension::Class => self.class_coverage,
            Dimension::Line => self.line_coverage,
            Dimension::Method => self.method_coverage,
            Dimension::Package => self.package_coverage,
            Dimension::File => self.file_coverage,
            Dimension::Instruction => self.instruction_coverage,
        }
    }

    /// Complexity per line of code, 0.0 when there are no lines.
    #[must_use]
    pub fn complexity_density_ratio(&self) -> f64 {
        rate(self.complexity, self.lines_of_code)
    }

    /// Literal counter rendering for a dimension, if the report had one.
    pub fn counter_summary(&self, dimension: Dimension) -> Option<&str> {
        self.counter_summaries
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, s)| s.as_str())
    }
}
