//! Asset Index Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An asset index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for asset index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The age descriptor does not exist.
    #[display("age descriptor not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Reading the age descriptor failed.
    #[display("I/O error reading {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The descriptor is encrypted and could not be decrypted.
    #[display("could not decrypt age descriptor")]
    Cipher,
    /// A descriptor line could not be understood.
    #[display("malformed age descriptor at line {line}: {reason}")]
    MalformedDescriptor { line: usize, reason: String },
}
