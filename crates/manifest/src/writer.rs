//! Manifest files: `<output>/<Name>.mfs`, one record per line.

use crate::error::{ErrorKind, Result};
use crate::record::ManifestRecord;
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const MANIFEST_EXTENSION: &str = ".mfs";

/// Where the manifest named `name` lives under `output`.
pub fn manifest_path(output: &Path, name: &str) -> PathBuf {
    output.join(format!("{name}{MANIFEST_EXTENSION}"))
}

/// Appends records to one manifest file.
///
/// Creating a writer truncates any manifest of the same name from an earlier
/// run; records are written in the order they are appended.
pub struct ManifestWriter {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl ManifestWriter {
    pub fn create(output: &Path, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        fs::create_dir_all(output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
        let path = manifest_path(output, &name);
        let file = File::create(&path).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::debug!(manifest = %name, path = %path.display(), "Writing manifest");
        Ok(Self {
            name,
            path,
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn append(&mut self, record: &ManifestRecord) -> Result<()> {
        writeln!(self.writer, "{record}").or_raise(|| ErrorKind::Io(self.path.clone()))?;
        self.records += 1;
        Ok(())
    }

    /// Append `record` if there is one; missing sources produce none.
    pub fn append_opt(&mut self, record: Option<ManifestRecord>) -> Result<()> {
        match record {
            Some(record) => self.append(&record),
            None => Ok(()),
        }
    }

    /// Flush and close, returning a handle to the finished manifest.
    pub fn close(mut self) -> Result<ManifestFile> {
        self.writer.flush().or_raise(|| ErrorKind::Io(self.path.clone()))?;
        tracing::info!(manifest = %self.name, records = self.records, "Manifest written");
        Ok(ManifestFile {
            name: self.name,
            path: self.path,
            records: self.records,
        })
    }
}

/// A finished manifest on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestFile {
    pub name: String,
    pub path: PathBuf,
    pub records: usize,
}

impl ManifestFile {
    /// Byte-for-byte copy of this manifest under another name, alongside it.
    pub fn copy_as(&self, name: &str) -> Result<ManifestFile> {
        let path = self.path.with_file_name(format!("{name}{MANIFEST_EXTENSION}"));
        fs::copy(&self.path, &path).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::info!(manifest = name, from = %self.name, "Manifest copied");
        Ok(ManifestFile {
            name: name.to_string(),
            path,
            records: self.records,
        })
    }

    pub fn delete(self) -> Result<()> {
        fs::remove_file(&self.path).or_raise(|| ErrorKind::Io(self.path.clone()))?;
        tracing::info!(manifest = %self.name, "Manifest deleted");
        Ok(())
    }
}
