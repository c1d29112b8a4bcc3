//! Manifest Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every error here is fatal to the run: staging either
//! completes or aborts, and nothing retries.
//!
//! A missing *source* file is not an error. The processor logs it and yields
//! no record, and assembly carries on without that line.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A manifest error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a staging failure.
///
/// ### Operational Errors
/// - [`ErrorKind::Io`]
/// - [`ErrorKind::InvalidPath`]
/// - [`ErrorKind::MissingBlacklistTarget`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Cipher`]
/// - [`ErrorKind::Compression`]
/// - [`ErrorKind::AssetIndex`]
///
/// ### Context
/// - [`ErrorKind::Assembly`] - wraps whatever failed inside one assembler.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading, writing, creating or deleting something on disk failed.
    #[display("I/O error at {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// A relative path is empty or escapes its root.
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A blacklist entry names an artifact this run never produced.
    #[display("blacklisted artifact was never produced: {}", _0.display())]
    MissingBlacklistTarget(#[error(not(source))] PathBuf),
    /// Encrypting content into the scratch area failed.
    Cipher,
    /// Gzip staging of an artifact failed.
    Compression,
    /// The asset index could not enumerate an age.
    #[display("asset index failed for age {_0}")]
    AssetIndex(#[error(not(source))] String),
    /// An assembler failed; the child error says why.
    #[display("{_0} assembly failed")]
    Assembly(#[error(not(source))] &'static str),
}
