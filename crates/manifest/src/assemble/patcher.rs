use super::{Assembler, Assembly};
use crate::cache::ContentCache;
use crate::error::Result;
use crate::processor::{FileProcessor, Request};
use crate::routing::{PATCHER_LAUNCHERS, PATCHER_SHARED, PATCHER_SUBFOLDER};
use crate::writer::ManifestWriter;
use std::path::Path;
use tracing::instrument;

/// Writes `InternalPatcher` and/or `ExternalPatcher`, one per launcher the
/// installation actually carries.
pub struct PatcherAssembler<'a> {
    source: &'a Path,
}

impl<'a> PatcherAssembler<'a> {
    pub fn new(source: &'a Path) -> Self {
        Self { source }
    }
}

impl Assembler for PatcherAssembler<'_> {
    fn name(&self) -> &'static str {
        "patcher"
    }

    #[instrument(skip_all, fields(source = %self.source.display()))]
    fn assemble(&self, processor: &FileProcessor<'_>, cache: &mut ContentCache) -> Result<Assembly> {
        let shared = Request::new(PATCHER_SHARED, self.source).subfolder(PATCHER_SUBFOLDER);
        let shared = processor.process(cache, &shared)?;

        let mut assembly = Assembly::default();
        for (channel, launcher) in PATCHER_LAUNCHERS {
            if !self.source.join(launcher).is_file() {
                tracing::info!(launcher, "No launcher; skipping {}", channel.patcher_manifest_name());
                continue;
            }
            let mut writer = ManifestWriter::create(processor.output(), channel.patcher_manifest_name())?;
            let request = Request::new(launcher, self.source).subfolder(PATCHER_SUBFOLDER);
            writer.append_opt(processor.process(cache, &request)?)?;
            writer.append_opt(shared.clone())?;
            assembly.written.push(writer.close()?);
        }
        Ok(assembly)
    }
}
