use thiserror::Error;

use crate::models::TableKey;
use crate::normalize::NormalizeError;

/// Errors returned by [`CalculationEngine::calculate`](super::CalculationEngine::calculate).
///
/// A calculation either produces a complete result or one of these; there
/// are no partial results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: NormalizeError,
    },

    /// The catalog has no table for the requested jurisdiction, year,
    /// filing status and schedule.
    #[error("no bracket table loaded for {0}")]
    NoBracketTable(TableKey),
}

impl CalculationError {
    /// Name of the offending input field, when the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) | Self::InvalidField { field, .. } => Some(*field),
            Self::UnknownTool(_) | Self::NoBracketTable(_) => None,
        }
    }

    pub fn normalize_error(&self) -> Option<&NormalizeError> {
        match self {
            Self::InvalidField { source, .. } => Some(source),
            _ => None,
        }
    }
}
