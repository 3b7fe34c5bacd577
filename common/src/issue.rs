//! Diagnostic kinds attached to degraded results

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a derived value, column or ticker ended up undefined.
///
/// None of these abort a batch. Stages record them next to the result
/// they produced so callers can tell "column present, values undefined"
/// apart from a genuine computation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AnalysisIssue {
    #[error("column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("no price series for ticker '{ticker}'")]
    MissingSeries { ticker: String },

    #[error("{required} valid samples required but only {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("{count} value(s) in '{field}' could not be parsed")]
    UnparseableValue { field: String, count: usize },

    #[error("input is empty")]
    EmptyInput,

    #[error("degenerate statistic: {reason}")]
    DegenerateStatistic { reason: String },
}

impl AnalysisIssue {
    pub fn missing_column(column: impl Into<String>) -> Self {
        AnalysisIssue::MissingColumn {
            column: column.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        AnalysisIssue::DegenerateStatistic {
            reason: reason.into(),
        }
    }
}
