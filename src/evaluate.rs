//! Threshold evaluation.
//!
//! Percentage dimensions are checked in a fixed order and evaluation stops
//! at the first one that misses its minimum, so a failing verdict names
//! exactly one dimension. Only once every dimension passes are the three
//! absolute checks (lines of code, complexity, complexity density) run, and
//! those are all evaluated so every one that fails is reported.

use serde::Serialize;

use crate::detect::Format;
use crate::model::{CoverageStats, Dimension};
use crate::thresholds::Thresholds;

/// How an observed percentage is compared against its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Fails when `observed < expected`; meeting the minimum passes.
    Below,
    /// Fails when `observed <= expected`; meeting the minimum fails.
    AtOrBelow,
}

impl Comparator {
    #[must_use]
    pub fn fails(self, observed: f64, expected: f64) -> bool {
        match self {
            Comparator::Below => observed < expected,
            Comparator::AtOrBelow => observed <= expected,
        }
    }
}

// The two dialects have always disagreed on whether meeting the minimum
// exactly is enough. Both behaviors are kept until that is settled.
pub fn comparator_for(format: Format) -> Comparator {
    match format {
        Format::Cobertura => Comparator::Below,
        Format::Jacoco => Comparator::AtOrBelow,
    }
}

/// Dimensions checked for a dialect, in evaluation order.
pub fn dimensions_for(format: Format) -> &'static [Dimension] {
    match format {
        Format::Cobertura => &[
            Dimension::Branch,
            Dimension::Class,
            Dimension::Line,
            Dimension::Method,
            Dimension::Package,
            Dimension::File,
        ],
        Format::Jacoco => &[
            Dimension::Branch,
            Dimension::Class,
            Dimension::Line,
            Dimension::Method,
            Dimension::Instruction,
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Coverage(Dimension),
    LinesOfCode,
    Complexity,
    ComplexityDensity,
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::Coverage(dimension) => write!(f, "{dimension} coverage"),
            Check::LinesOfCode => f.write_str("Lines of code"),
            Check::Complexity => f.write_str("Complexity"),
            Check::ComplexityDensity => f.write_str("Complexity density"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedCheck {
    pub check: Check,
    pub observed: f64,
    pub expected: f64,
}

impl std::fmt::Display for FailedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} threshold not met: expected = {:.2} observed = {:.2}",
            self.check, self.expected, self.observed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// False when enforcement was switched off and nothing was inspected.
    pub enforced: bool,
    pub failed: Vec<FailedCheck>,
}

impl Verdict {
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            passed: true,
            enforced: false,
            failed: Vec::new(),
        }
    }

    fn from_failures(failed: Vec<FailedCheck>) -> Self {
        Self {
            passed: failed.is_empty(),
            enforced: true,
            failed,
        }
    }
}

/// Evaluate only when `enforce` is set; otherwise pass unconditionally.
pub fn gate(stats: &CoverageStats, thresholds: &Thresholds, enforce: bool) -> Verdict {
    if !enforce {
        return Verdict::skipped();
    }
    evaluate(stats, thresholds)
}

/// Evaluate `stats` against `thresholds` using the comparator and
/// dimension order of the report's dialect.
pub fn evaluate(stats: &CoverageStats, thresholds: &Thresholds) -> Verdict {
    let comparator = comparator_for(stats.format);

    for &dimension in dimensions_for(stats.format) {
        let observed = stats.coverage(dimension);
        let expected = thresholds.minimum(dimension);
        if comparator.fails(observed, expected) {
            return Verdict::from_failures(vec![FailedCheck {
                check: Check::Coverage(dimension),
                observed,
                expected,
            }]);
        }
    }

    let mut failed = Vec::new();

    if stats.lines_of_code < thresholds.min_lines_of_code {
        failed.push(FailedCheck {
            check: Check::LinesOfCode,
            observed: stats.lines_of_code as f64,
            expected: thresholds.min_lines_of_code as f64,
        });
    }
    if let Some(max) = thresholds.max_complexity {
        if stats.complexity > max {
            failed.push(FailedCheck {
                check: Check::Complexity,
                observed: stats.complexity as f64,
                expected: max as f64,
            });
        }
    }
    if let Some(max) = thresholds.max_complexity_density {
        let density = stats.complexity_density_ratio();
        if density > max {
            failed.push(FailedCheck {
                check: Check::ComplexityDensity,
                observed: density,
                expected: max,
            });
        }
    }

    Verdict::from_failures(failed)
}
