/// Report dialect selection.
///
/// Strategy:
///   1. Use the explicit tool tag when the caller gives one
///   2. Otherwise peek at the first bytes of the report for the root element
use serde::Serialize;

use crate::error::CovgateError;

/// Supported report dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Hierarchical package/class/method/line report.
    Cobertura,
    /// Flat named-counter report.
    Jacoco,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Cobertura => "cobertura",
            Format::Jacoco => "jacoco",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = CovgateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cobertura" => Ok(Format::Cobertura),
            "jacoco" | "jacoco-xml" => Ok(Format::Jacoco),
            _ => Err(CovgateError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the report dialect from the document content.
pub fn detect_format(content: &[u8]) -> Option<Format> {
    // The root element sits well inside the first few KB
    let head_len = content.len().min(4096);
    let head = String::from_utf8_lossy(&content[..head_len]);

    if !(head.contains("<?xml") || head.trim_start().starts_with('<')) {
        return None;
    }

    // Whichever root appears first wins; a JaCoCo DOCTYPE mentions "report"
    // before any element, so look for the opening tag itself.
    let coverage = head.find("<coverage");
    let report = head.find("<report");
    match (coverage, report) {
        (Some(c), Some(r)) if r < c => Some(Format::Jacoco),
        (Some(_), _) => Some(Format::Cobertura),
        (None, Some(_)) => Some(Format::Jacoco),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_tags() {
        assert_eq!("cobertura".parse::<Format>().unwrap(), Format::Cobertura);
        assert_eq!("JaCoCo".parse::<Format>().unwrap(), Format::Jacoco);
        assert_eq!("jacoco-xml".parse::<Format>().unwrap(), Format::Jacoco);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "lcov".parse::<Format>().unwrap_err();
        assert!(matches!(err, CovgateError::UnknownFormat(ref s) if s == "lcov"));
    }

    #[test]
    fn test_detect_cobertura_by_content() {
        let content = b"<?xml version=\"1.0\"?>\n<coverage line-rate=\"0.5\">";
        assert_eq!(detect_format(content), Some(Format::Cobertura));
    }

    #[test]
    fn test_detect_jacoco_by_content() {
        let content = br#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd"><report name="demo">"#;
        assert_eq!(detect_format(content), Some(Format::Jacoco));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format(b"hello world"), None);
        assert_eq!(detect_format(b"<project></project>"), None);
    }
}
