use thiserror::Error;

/// Every failure surfaced by relq.
///
/// Variants carry the diagnostic text of whatever failed underneath
/// (a parser, a driver, the server).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Text could not be parsed into a value of the attribute's kind
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A value is well-formed but outside the attribute's domain
    #[error("Domain error: {0}")]
    Domain(String),

    /// The API was driven in an order it does not allow
    #[error("Usage error: {0}")]
    Usage(String),

    /// Opening, using or closing a connection failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend rejected a statement or its results could not be read
    #[error("Query error: {0}")]
    Query(String),

    /// DDL failed
    #[error("Schema error: {0}")]
    Schema(String),
}

impl Error {
    /// The diagnostic text without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Conversion(msg)
            | Error::Domain(msg)
            | Error::Usage(msg)
            | Error::Connection(msg)
            | Error::Query(msg)
            | Error::Schema(msg) => msg,
        }
    }

    /// Re-tags a statement failure as a DDL failure, keeping connection and
    /// usage errors as they are.
    pub(crate) fn into_schema(self) -> Error {
        match self {
            Error::Query(msg) => Error::Schema(msg),
            other => other,
        }
    }
}

/// Result type for relq operations
pub type Result<T> = std::result::Result<T, Error>;
