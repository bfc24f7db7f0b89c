//! Gate configuration.
//!
//! Minimums default to zero. The two maximums are optional: `None` leaves
//! the check off, `Some(0)` demands zero.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CovgateError, Result};
use crate::model::Dimension;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub min_branch: f64,
    pub min_class: f64,
    pub min_line: f64,
    pub min_method: f64,
    pub min_package: f64,
    pub min_file: f64,
    pub min_instruction: f64,
    pub min_lines_of_code: u64,
    pub max_complexity: Option<u64>,
    pub max_complexity_density: Option<f64>,
}

impl Thresholds {
    /// Load thresholds from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CovgateError::ThresholdConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let thresholds: Thresholds = serde_json::from_str(&content).map_err(|e| {
            CovgateError::ThresholdConfig(format!("invalid JSON in {}: {e}", path.display()))
        })?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Minimum percentage for a dimension.
    #[must_use]
    pub fn minimum(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Branch => self.min_branch,
            Dimension::Class => self.min_class,
            Dimension::Line => self.min_line,
            Dimension::Method => self.min_method,
            Dimension::Package => self.min_package,
            Dimension::File => self.min_file,
            Dimension::Instruction => self.min_instruction,
        }
    }

    pub fn set_minimum(&mut self, dimension: Dimension, value: f64) {
        let slot = match dimension {
            Dimension::Branch => &mut self.min_branch,
            Dimension::Class => &mut self.min_class,
            Dimension::Line => &mut self.min_line,
            Dimension::Method => &mut self.min_method,
            Dimension::Package => &mut self.min_package,
            Dimension::File => &mut self.min_file,
            Dimension::Instruction => &mut self.min_instruction,
        };
        *slot = value;
    }

    /// Reject values no report could ever be compared against.
    pub fn validate(&self) -> Result<()> {
        const ALL: [Dimension; 7] = [
            Dimension::Branch,
            Dimension::Class,
            Dimension::Line,
            Dimension::Method,
            Dimension::Package,
            Dimension::File,
            Dimension::Instruction,
        ];
        for dimension in ALL {
            let value = self.minimum(dimension);
            if !value.is_finite() || value < 0.0 {
                return Err(CovgateError::ThresholdConfig(format!(
                    "{dimension} minimum must be a non-negative number, got {value}"
                )));
            }
            // FILE_COVERAGE is a count ratio and can exceed 100.
            if dimension != Dimension::File && value > 100.0 {
                return Err(CovgateError::ThresholdConfig(format!(
                    "{dimension} minimum is a percentage, got {value}"
                )));
            }
        }
        if let Some(density) = self.max_complexity_density {
            if !density.is_finite() || density < 0.0 {
                return Err(CovgateError::ThresholdConfig(format!(
                    "maximum complexity density must be a non-negative number, got {density}"
                )));
            }
        }
        Ok(())
    }
}
