//! Error types for missing-value resolution and exploratory analysis.
//!
//! Errors are serializable so a presentation layer can show them to the user
//! as a `{ code, message }` pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The input is not a well-formed table (nested columns, bad names, unparseable CSV).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A statistic is undefined for the given column, e.g. the mean of an all-missing column.
    #[error("Cannot compute {statistic} for column '{column}': {reason}")]
    Computation {
        column: String,
        statistic: String,
        reason: String,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The remediation policy does not fit the dataset.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// An analysis was requested on a column of the wrong kind.
    #[error("Column '{column}' is not {expected}")]
    WrongColumnKind { column: String, expected: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDataset(_) => "INVALID_DATASET",
            Self::Computation { .. } => "COMPUTATION_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidPolicy(_) => "INVALID_POLICY",
            Self::WrongColumnKind { .. } => "WRONG_COLUMN_KIND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error means the input itself is unusable.
    ///
    /// Fatal errors abort the current operation; retrying with the same
    /// dataset gives the same result.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidDataset(_) => true,
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }

    /// Check if this error is an undefined statistic the caller may work around.
    pub fn is_computation(&self) -> bool {
        match self {
            Self::Computation { .. } => true,
            Self::WithContext { source, .. } => source.is_computation(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}
