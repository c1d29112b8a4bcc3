use super::{Assembler, Assembly};
use crate::cache::ContentCache;
use crate::error::{ErrorKind, Result};
use crate::processor::{FileProcessor, Request};
use crate::routing::{PRELOADER_SOURCES, has_extension, list_files};
use crate::writer::ManifestWriter;
use exn::ResultExt;
use gum_cipher::{Cipher, DroidKey};
use std::fs;
use std::path::Path;
use tracing::instrument;

pub const PRELOADER_MANIFEST: &str = "SecurePreloader";

/// Writes the `SecurePreloader` manifest: scripts and state descriptions,
/// sealed with the droid key.
///
/// Each file is sealed into the scratch directory and staged from there
/// under its original relative path. Only one sealed copy exists at a time.
pub struct PreloaderAssembler<'a> {
    source: &'a Path,
    cipher: Cipher,
}

impl<'a> PreloaderAssembler<'a> {
    pub fn new(source: &'a Path, droid: DroidKey) -> Self {
        Self {
            source,
            cipher: Cipher::Droid(droid),
        }
    }
}

impl Assembler for PreloaderAssembler<'_> {
    fn name(&self) -> &'static str {
        "preloader"
    }

    #[instrument(skip_all, fields(source = %self.source.display()))]
    fn assemble(&self, processor: &FileProcessor<'_>, cache: &mut ContentCache) -> Result<Assembly> {
        let mut writer = ManifestWriter::create(processor.output(), PRELOADER_MANIFEST)?;
        let scratch = processor.scratch();
        for (dir, extension) in PRELOADER_SOURCES {
            for name in list_files(&self.source.join(dir))? {
                if !has_extension(&name, extension) {
                    continue;
                }
                let path = format!("{dir}/{name}");
                let real = self.source.join(&path);
                let plain = fs::read(&real).or_raise(|| ErrorKind::Io(real.clone()))?;
                let staged = scratch.stage(&path, &self.cipher.encrypt(&plain))?;
                writer.append_opt(processor.process(cache, &Request::new(&path, scratch.path()))?)?;
                staged.remove()?;
            }
        }
        Ok(Assembly {
            written: vec![writer.close()?],
            removed: vec![],
        })
    }
}
