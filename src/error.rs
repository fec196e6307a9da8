use thiserror::Error;

/// Errors raised by the profiling pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// The bytes could not be parsed for the declared extension, or the
    /// extension is not supported at all.
    #[error("Format error: {0}")]
    Format(String),

    #[error("The file contains no data rows")]
    EmptyInput,

    #[error("Column '{0}' is not numeric")]
    ColumnNotNumeric(String),

    /// Internal precondition violation (e.g. column length mismatch).
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl From<csv::Error> for ProfileError {
    fn from(err: csv::Error) -> Self {
        ProfileError::Format(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
