use crate::ManifestFlags;
use crate::cache::ProcessedFile;
use crate::path::{join_relative, to_client_path};
use gum_compress::EXTENSION;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One manifest line.
///
/// Rendered as seven comma-separated fields:
/// `source,compressed,plainHash,compressedHash,plainSize,compressedSize,flags`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Installation-relative path with `\` separators.
    pub source_path: String,
    /// Staging-relative path of the `.gz` artifact, `/`-separated.
    pub compressed_path: String,
    pub plain_hash: String,
    pub compressed_hash: String,
    pub plain_size: u64,
    pub compressed_size: u64,
    pub flags: ManifestFlags,
}

impl ManifestRecord {
    pub(crate) fn new(path: &str, subfolder: Option<&str>, flags: ManifestFlags, file: &ProcessedFile) -> Self {
        Self {
            source_path: to_client_path(path),
            compressed_path: format!("{}{}", join_relative(subfolder, path), EXTENSION),
            plain_hash: file.plain_hash.clone(),
            compressed_hash: file.compressed_hash.clone(),
            plain_size: file.plain_size,
            compressed_size: file.compressed_size,
            flags,
        }
    }
}

impl Display for ManifestRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.source_path,
            self.compressed_path,
            self.plain_hash,
            self.compressed_hash,
            self.plain_size,
            self.compressed_size,
            self.flags
        )
    }
}
