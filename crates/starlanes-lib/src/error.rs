use thiserror::Error;

/// Convenient result alias for the starlanes library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Absence of an answer is not an error: an unreachable destination is
/// reported as `Ok(None)` or an empty path list by the query that found it.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a caller-supplied argument is malformed (negative radius,
    /// non-positive maximum distance, zero route count, invalid range band).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Raised when two input stars share an identifier during construction.
    #[error("duplicate star identifier: {id}")]
    DuplicateStarId { id: String },

    /// Raised when a requested star identifier is not present in the graph
    /// or index being queried.
    #[error("unknown star identifier: {id}")]
    UnknownStar { id: String },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }
}
