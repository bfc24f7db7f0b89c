use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovgateError {
    #[error("Failed to read report {}: {source}", .path.display())]
    ReportRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("Malformed report: {0}")]
    ReportFormat(String),

    #[error("Invalid threshold configuration: {0}")]
    ThresholdConfig(String),

    #[error("Unknown report format: '{0}'. Supported: cobertura, jacoco")]
    UnknownFormat(String),
}

impl CovgateError {
    /// True for errors caused by the report content rather than its
    /// availability on disk.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, CovgateError::Xml { .. } | CovgateError::ReportFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, CovgateError>;
