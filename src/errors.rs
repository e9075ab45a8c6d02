//! Structured error types for the network construction pipeline
//!
//! Dataset and schema problems are fatal and stop the run before any
//! computation. An empty graph after filtering is NOT an error: every
//! analysis stage degrades to empty output instead. Fallback strategy
//! selection (community detection, layout) is a logged diagnostic and
//! never surfaces here.

use std::fmt;

/// Pipeline error types with proper categorization
#[derive(Debug)]
pub enum PipelineError {
    /// Required input file is absent
    MissingInput { path: String },

    /// A required field exists in the schema but has the wrong shape,
    /// or a required column is missing entirely
    Schema { field: String, reason: String },

    /// The dataset decoded to zero usable post records
    EmptyDataset,

    /// CSV decode/encode failure from the tabular layer
    Csv(csv::Error),

    /// Filesystem failure while reading or writing tables
    Io(std::io::Error),

    /// Generic wrapper for external errors
    Internal(anyhow::Error),
}

impl PipelineError {
    /// Get error code for log filtering and assertions
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::Csv(_) => "CSV_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get detailed error message
    pub fn message(&self) -> String {
        match self {
            Self::MissingInput { path } => format!("Input file not found: {path}"),
            Self::Schema { field, reason } => {
                format!("Invalid dataset schema for field '{field}': {reason}")
            }
            Self::EmptyDataset => "Dataset contains no usable post records".to_string(),
            Self::Csv(err) => format!("CSV error: {err}"),
            Self::Io(err) => format!("I/O error: {err}"),
            Self::Internal(err) => format!("Internal error: {err}"),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Type alias for Results using PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;
