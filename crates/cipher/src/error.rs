//! Cipher Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A cipher error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cipher operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A droid key was not exactly 32 hexadecimal digits.
    #[display("invalid droid key: {_0}")]
    InvalidKey(#[error(not(source))] String),
    /// Content was sealed with a droid key but none was supplied.
    #[display("droid key required")]
    MissingKey,
    /// Input does not start with any known encrypted-stream magic.
    #[display("unrecognized encrypted stream")]
    UnrecognizedFormat,
    /// Header or payload is shorter than the header claims.
    #[display("truncated encrypted stream")]
    Truncated,
    /// Writing the encrypted stream failed.
    #[display("I/O error")]
    Io,
}
