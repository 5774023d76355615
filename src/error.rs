use thiserror::Error;

/// Convenience result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Error type returned by dataset operations.
///
/// A single error enum shared by the store, ingestion and processing layers. The HTTP layer
/// maps [`DataError::NotFound`] to `404` and every other variant to `400`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// No dataset is registered under `name`.
    #[error("Dataset not found")]
    NotFound { name: String },

    /// The dataset has no column called `column`.
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The operation tag is not one the endpoint understands.
    #[error("Invalid operation: '{operation}'")]
    InvalidOperation { operation: String },

    /// Bad payload, incompatible comparison, or a table that cannot be built.
    #[error("{message}")]
    Validation { message: String },
}

impl DataError {
    /// Shorthand for [`DataError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }

    pub(crate) fn invalid_operation(operation: &str) -> Self {
        Self::InvalidOperation {
            operation: operation.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for DataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::validation(err.to_string())
    }
}
