//! Post-run removal of artifacts that must never be served.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use exn::ResultExt;
use gum_compress::with_extension;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Deletes the staged artifact for every entry in a blacklist file.
///
/// Entries are relative paths without the `.gz` extension, one per line.
/// Every entry must name an artifact produced by this run; anything else
/// aborts the run.
pub struct BlacklistPruner<'a> {
    blacklist: &'a Path,
    output: &'a Path,
}

impl<'a> BlacklistPruner<'a> {
    pub fn new(blacklist: &'a Path, output: &'a Path) -> Self {
        Self { blacklist, output }
    }

    /// Delete every blacklisted artifact, returning the paths removed.
    #[instrument(skip(self), fields(blacklist = %self.blacklist.display()))]
    pub fn prune(&self) -> Result<Vec<PathBuf>> {
        let text = fs::read_to_string(self.blacklist).or_raise(|| ErrorKind::Io(self.blacklist.to_path_buf()))?;
        let mut pruned = Vec::new();
        for entry in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let target = self.output.join(with_extension(validate_path(entry)?));
            if !target.is_file() {
                exn::bail!(ErrorKind::MissingBlacklistTarget(target));
            }
            fs::remove_file(&target).or_raise(|| ErrorKind::Io(target.clone()))?;
            tracing::info!(path = %target.display(), "Pruned blacklisted artifact");
            pruned.push(target);
        }
        Ok(pruned)
    }
}
