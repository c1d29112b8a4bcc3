//! The per-file staging transform.
//!
//! For each requested file, in order:
//!
//! 1. **Cache lookup**: a path staged earlier in the run is never touched
//!    again; only its manifest line is rebuilt for the new request.
//! 2. **Resolve**: a missing source file is logged and yields no record.
//! 3. **Encrypt** (optional): the source is sealed with the default-key
//!    cipher into the scratch directory, and the sealed bytes become the
//!    content for every later step.
//! 4. **Hash** the content, **compress** it into
//!    `output/[subfolder/]path.gz`, then **hash** the artifact as written.
//! 5. **Clean up** the scratch copy (on failure too) and cache the result.

use crate::ManifestFlags;
use crate::cache::{ContentCache, ProcessedFile};
use crate::digest::{hex_digest, hex_digest_file};
use crate::error::{ErrorKind, Result};
use crate::path::{join_relative, validate as validate_path};
use crate::record::ManifestRecord;
use crate::scratch::ScratchDir;
use exn::ResultExt;
use gum_cipher::Cipher;
use gum_compress::{Gzip, with_extension};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A request to stage one file and describe it in a manifest.
#[derive(Clone, Debug)]
pub struct Request<'a> {
    /// `/`-separated path relative to `source`; also the cache key.
    pub path: &'a str,
    pub source: &'a Path,
    /// Extra staging directory between the output root and `path`.
    pub subfolder: Option<&'a str>,
    pub flags: ManifestFlags,
    pub encrypt: bool,
}

impl<'a> Request<'a> {
    pub fn new(path: &'a str, source: &'a Path) -> Self {
        Self {
            path,
            source,
            subfolder: None,
            flags: ManifestFlags::NONE,
            encrypt: false,
        }
    }

    pub fn subfolder(mut self, subfolder: &'a str) -> Self {
        self.subfolder = Some(subfolder);
        self
    }

    pub fn flags(mut self, flags: ManifestFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.encrypt = true;
        self
    }

    pub fn encrypted_if(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }
}

/// Stages files under an output root, consulting a [`ContentCache`].
///
/// The processor itself holds no mutable state; the cache is passed in by
/// each caller so one cache can span every assembler in a run.
pub struct FileProcessor<'a> {
    output: PathBuf,
    scratch: &'a ScratchDir,
    cipher: Cipher,
}

impl<'a> FileProcessor<'a> {
    pub fn new(output: impl Into<PathBuf>, scratch: &'a ScratchDir) -> Self {
        Self {
            output: output.into(),
            scratch,
            cipher: Cipher::Default,
        }
    }

    /// Staging root.
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn scratch(&self) -> &ScratchDir {
        self.scratch
    }

    /// Stage `request` (unless already cached) and build its manifest record.
    ///
    /// Returns `Ok(None)` when the source file doesn't exist; callers leave
    /// it out of their manifests.
    #[instrument(skip(self, cache, request), fields(path = request.path, subfolder = request.subfolder))]
    pub fn process(&self, cache: &mut ContentCache, request: &Request<'_>) -> Result<Option<ManifestRecord>> {
        let relative = validate_path(request.path)?;
        let processed = match cache.get(request.path) {
            Some(processed) => {
                tracing::debug!(path = request.path, "Already staged; reusing cached digests");
                processed.clone()
            },
            None => {
                let real = request.source.join(&relative);
                if !real.is_file() {
                    tracing::warn!(path = %real.display(), "Can't find source file; leaving it out");
                    return Ok(None);
                }
                let processed = self.stage(request, &real)?;
                cache.insert(request.path, processed).clone()
            },
        };
        let record = ManifestRecord::new(request.path, request.subfolder, request.flags, &processed);
        tracing::info!("{record}");
        Ok(Some(record))
    }

    /// Where `request` is staged: `output/[subfolder/]path.gz`.
    pub fn artifact_path(&self, request: &Request<'_>) -> Result<PathBuf> {
        let relative = validate_path(join_relative(request.subfolder, request.path))?;
        Ok(self.output.join(with_extension(relative)))
    }

    fn stage(&self, request: &Request<'_>, real: &Path) -> Result<ProcessedFile> {
        // Held until staging finishes; dropping it deletes the sealed copy,
        // whether or not the steps below succeed.
        let sealed = match request.encrypt {
            true => Some(self.seal(real)?),
            false => None,
        };
        let content_path = sealed.as_ref().map_or(real, |file| file.path());
        let content = fs::read(content_path).or_raise(|| ErrorKind::Io(content_path.to_path_buf()))?;
        let plain_hash = hex_digest(&content);

        let artifact = self.artifact_path(request)?;
        self.compress(&content, &artifact)?;
        let (compressed_hash, compressed_size) = hex_digest_file(&artifact)?;

        if let Some(sealed) = sealed {
            let path = sealed.path().to_path_buf();
            sealed.close().or_raise(|| ErrorKind::Io(path))?;
        }
        Ok(ProcessedFile {
            plain_hash,
            compressed_hash,
            plain_size: content.len() as u64,
            compressed_size,
        })
    }

    fn seal(&self, real: &Path) -> Result<tempfile::NamedTempFile> {
        let plain = fs::read(real).or_raise(|| ErrorKind::Io(real.to_path_buf()))?;
        let mut sealed = self.scratch.temp_file()?;
        self.cipher.encrypt_to(&plain, sealed.as_file_mut()).or_raise(|| ErrorKind::Cipher)?;
        tracing::trace!(source = %real.display(), scratch = %sealed.path().display(), "Sealed into scratch");
        Ok(sealed)
    }

    fn compress(&self, content: &[u8], artifact: &Path) -> Result<()> {
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        }
        let file = File::create(artifact).or_raise(|| ErrorKind::Io(artifact.to_path_buf()))?;
        let mut writer = BufWriter::new(file);
        Gzip.compress_stream(content, &mut writer).or_raise(|| ErrorKind::Compression)?;
        writer.flush().or_raise(|| ErrorKind::Io(artifact.to_path_buf()))?;
        Ok(())
    }
}
