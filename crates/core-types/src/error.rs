use thiserror::Error;

use crate::enums::{OverallReportType, ReportItemType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid overall report type: `{0}`")]
    InvalidOverallReportType(String),

    #[error("Invalid report item type: `{0}`")]
    InvalidReportItemType(String),

    #[error("Invalid address prefix `{address}/{prefix_length}`: {reason}")]
    InvalidPrefix {
        address: String,
        prefix_length: String,
        reason: String,
    },
}

impl CoreError {
    /// The full vocabulary the rejected value was checked against, if the
    /// input was meant to be one of a closed set of literals.
    pub fn accepted_values(&self) -> Option<Vec<&'static str>> {
        match self {
            CoreError::InvalidOverallReportType(_) => {
                Some(OverallReportType::ALL.iter().map(|t| t.as_str()).collect())
            }
            CoreError::InvalidReportItemType(_) => {
                Some(ReportItemType::ALL.iter().map(|t| t.as_str()).collect())
            }
            CoreError::InvalidPrefix { .. } => None,
        }
    }
}
