//! Error types for sqlgate

use std::fmt;
use thiserror::Error;

/// Boxed driver error, as returned by [`Connection`](crate::Connection) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for sqlgate operations
pub type DbResult<T> = Result<T, DbError>;

/// The execution stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Sending a row-returning statement
    Query,
    /// Sending a statement that returns an affected-row count
    Exec,
    /// Reading result-set column names
    Columns,
    /// Reading a row
    Scan,
    /// Post-iteration cursor error
    Iteration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Query => "query execution failed",
            Stage::Exec => "statement execution failed",
            Stage::Columns => "failed to get columns",
            Stage::Scan => "failed to scan row",
            Stage::Iteration => "row iteration error",
        })
    }
}

/// Error types for statement construction and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// A condition was given an empty field name
    #[error("condition field name must not be empty")]
    EmptyField,

    /// A list operator received a single value
    #[error("{operator} on '{field}' expects a list of values")]
    ExpectedList {
        field: String,
        operator: &'static str,
    },

    /// A single-value operator received a list
    #[error("operator '{operator}' on '{field}' expects a single value, got a list")]
    UnexpectedList { field: String, operator: String },

    /// IN / NOT IN with no values
    #[error("{operator} on '{field}' requires at least one value")]
    EmptyList {
        field: String,
        operator: &'static str,
    },

    /// BETWEEN without exactly two values
    #[error("BETWEEN on '{field}' requires exactly 2 values, got {got}")]
    BetweenArity { field: String, got: usize },

    /// INSERT / UPDATE with nothing to write
    #[error("no data provided for {0}")]
    EmptyValues(String),

    /// UPDATE / DELETE without a WHERE clause
    #[error("{0} requires at least one WHERE condition")]
    MissingWhere(String),

    /// UPDATE / DELETE filter with a NULL value, which would otherwise be dropped
    #[error("WHERE condition on '{field}' has a NULL value")]
    NullFilter { field: String },

    /// Driver failure, tagged with the stage that produced it
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: BoxError,
    },

    /// Record value decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Wrap a driver error with the stage it came from.
    pub fn stage(stage: Stage, source: impl Into<BoxError>) -> Self {
        Self::Stage {
            stage,
            source: source.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// The execution stage, if this error came from the connection.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Whether this error was raised while assembling a statement, before any I/O.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::EmptyField
                | Self::ExpectedList { .. }
                | Self::UnexpectedList { .. }
                | Self::EmptyList { .. }
                | Self::BetweenArity { .. }
                | Self::EmptyValues(_)
                | Self::MissingWhere(_)
                | Self::NullFilter { .. }
        )
    }
}
