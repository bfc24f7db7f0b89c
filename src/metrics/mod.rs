//! Roll a parsed report up into `CoverageStats`.
//!
//! Each dialect exposes different granularity, so each has its own
//! aggregation. Callers pick one by `Format` and never see the
//! dialect-specific trees.

pub mod cobertura;
pub mod jacoco;

use std::path::Path;

use crate::detect::{detect_format, Format};
use crate::error::{CovgateError, Result};
use crate::model::CoverageStats;
use crate::parsers::read_report;

/// Every report dialect implements this trait.
pub trait CoverageSource {
    fn format(&self) -> Format;

    /// Aggregate an in-memory report document.
    fn aggregate(&self, input: &[u8]) -> Result<CoverageStats>;

    /// Read the report at `path` and aggregate it.
    fn produce(&self, path: &Path) -> Result<CoverageStats> {
        let content = read_report(path)?;
        self.aggregate(&content)
    }
}

pub struct CoberturaSource;

impl CoverageSource for CoberturaSource {
    fn format(&self) -> Format {
        Format::Cobertura
    }

    fn aggregate(&self, input: &[u8]) -> Result<CoverageStats> {
        let report = crate::parsers::cobertura::parse(input)?;
        Ok(cobertura::aggregate(&report))
    }
}

pub struct JacocoSource;

impl CoverageSource for JacocoSource {
    fn format(&self) -> Format {
        Format::Jacoco
    }

    fn aggregate(&self, input: &[u8]) -> Result<CoverageStats> {
        let report = crate::parsers::jacoco::parse(input)?;
        Ok(jacoco::aggregate(&report))
    }
}

/// The source for a given dialect.
pub fn source_for(format: Format) -> &'static dyn CoverageSource {
    match format {
        Format::Cobertura => &CoberturaSource,
        Format::Jacoco => &JacocoSource,
    }
}

/// Read a report, pick its dialect (or use the override) and aggregate it.
pub fn collect(path: &Path, format_override: Option<Format>) -> Result<CoverageStats> {
    let content = read_report(path)?;
    let format = match format_override {
        Some(format) => format,
        None => detect_format(&content)
            .ok_or_else(|| CovgateError::UnknownFormat(path.display().to_string()))?,
    };
    source_for(format).aggregate(&content)
}
