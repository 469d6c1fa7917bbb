//! Error types for input validation, projection, loading and export

use thiserror::Error;

/// Errors raised by a projection request.
///
/// A failed `calculate` call never produces a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An input is non-numeric or outside its domain. Raised before any month is computed.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Arithmetic failed after validation passed (overflow, non-finite values).
    #[error("computation failed in month {month}: {reason}")]
    Computation { month: u32, reason: String },

    /// A caller asked for a preset that does not exist.
    #[error("scenario not found: {0}")]
    UnknownScenario(String),
}

impl ModelError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn computation(month: u32, reason: impl Into<String>) -> Self {
        ModelError::Computation {
            month,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code surfaced to API callers
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Validation { .. } => "validation_error",
            ModelError::Computation { .. } => "computation_error",
            ModelError::UnknownScenario(_) => "unknown_scenario",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation { .. })
    }
}

/// Errors from reading an inputs file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read inputs file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON inputs: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV inputs: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: cannot parse value {value:?} for {parameter}")]
    BadValue {
        row: usize,
        parameter: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("unsupported inputs file extension: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Errors from encoding a projection result.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoded output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
