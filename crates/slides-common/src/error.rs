//! Common error types used throughout slides.
//!
//! This module provides a unified error type that covers the failure cases of
//! media serving: missing records or files, denied access, unsatisfiable
//! byte ranges, database errors, and I/O failures.

/// Common error type for slides.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested file or record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller presented credentials that could not be validated.
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller does not have permission to access the resource.
    #[error("Forbidden")]
    Forbidden,

    /// The requested byte range cannot be served from a resource of `size` bytes.
    #[error("Range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable {
        /// Total size of the resource in bytes.
        size: u64,
    },

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::Unauthorized => 401,
            Error::Forbidden => 403,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Database(_) => 500,
            Error::Io(_) => 500,
            Error::InvalidInput(_) => 400,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Unauthorized => "unauthorized",
            Error::Forbidden => "forbidden",
            Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            Error::Database(_) => "database_error",
            Error::Io(_) => "io_error",
            Error::InvalidInput(_) => "invalid_input",
            Error::Internal(_) => "internal_error",
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
