//! Deterministic gzip framing for staged file-server artifacts.
//!
//! Every artifact the manifest pipeline stages is a gzip member written with
//! a fixed header: no embedded file name, a zero modification time and the
//! "unknown" operating-system byte. Identical input bytes therefore always
//! produce identical artifact bytes (and identical digests), no matter which
//! machine or which day the staging tree was generated on.
//!
//! - **In-memory** compression/decompression ([`Gzip::compress`],
//!   [`Gzip::decompress`])
//! - **Streaming** compression into any writer ([`Gzip::wrap_writer`],
//!   [`Gzip::compress_stream`])
//!
//! Compression uses the highest available level, prioritizing artifact size
//! over staging speed; artifacts are generated once and downloaded many times.

pub mod error;
mod ops;
mod util;

pub use crate::util::with_extension;

/// File extension appended to every staged artifact.
pub const EXTENSION: &str = ".gz";

/// Deterministic gzip codec.
///
/// Zero-sized; every instance produces byte-identical output for identical
/// input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Gzip;

