//! Run-scoped scratch area for encrypted intermediates.
//!
//! Encrypted content is written here before being hashed and compressed.
//! The directory is owned by a [`ScratchDir`] value: dropping it (on success,
//! on `?`, on panic unwind) removes the whole tree, so a failed run never
//! leaves plaintext-derived intermediates behind.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

const SCRATCH_PREFIX: &str = "gum-";

pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Acquire a fresh scratch directory under the system temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .or_raise(|| ErrorKind::Io(std::env::temp_dir()))?;
        tracing::trace!(path = %dir.path().display(), "Scratch directory acquired");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Anonymous file inside the scratch directory, deleted when dropped.
    pub(crate) fn temp_file(&self) -> Result<NamedTempFile> {
        NamedTempFile::new_in(self.path()).or_raise(|| ErrorKind::Io(self.path().to_path_buf()))
    }

    /// Write `bytes` to `relative` inside the scratch directory.
    ///
    /// The returned [`StagedFile`] deletes the file when dropped, so at most
    /// one staged file per live handle is resident at a time.
    pub fn stage(&self, relative: &str, bytes: &[u8]) -> Result<StagedFile> {
        let path = self.path().join(validate_path(relative)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        }
        fs::write(&path, bytes).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::trace!(path = %path.display(), size = bytes.len(), "Staged scratch file");
        Ok(StagedFile { path: Some(path) })
    }

    /// Remove the scratch tree, reporting any failure instead of ignoring it
    /// the way dropping does.
    pub fn close(self) -> Result<()> {
        let path = self.path().to_path_buf();
        self.dir.close().or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::trace!(path = %path.display(), "Scratch directory released");
        Ok(())
    }
}

/// A file written into the scratch directory; removed when dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: Option<PathBuf>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        // Only `remove` takes the path, and it consumes `self`.
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Delete the file now, reporting failure.
    pub fn remove(mut self) -> Result<()> {
        match self.path.take() {
            Some(path) => fs::remove_file(&path).or_raise(|| ErrorKind::Io(path)),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            // Best effort: the whole scratch tree goes with its ScratchDir anyway.
            let _ = fs::remove_file(path);
        }
    }
}
