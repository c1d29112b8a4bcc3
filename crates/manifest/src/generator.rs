//! One complete staging run.

use crate::assemble::{AgeAssembler, Assembler, Assembly, ClientAssembler, PatcherAssembler, PreloaderAssembler};
use crate::blacklist::BlacklistPruner;
use crate::cache::ContentCache;
use crate::error::{ErrorKind, Result};
use crate::processor::FileProcessor;
use crate::scratch::ScratchDir;
use crate::writer::ManifestFile;
use exn::ResultExt;
use gum_assets::AssetIndex;
use gum_cipher::DroidKey;
use std::path::PathBuf;
use tracing::instrument;

/// Stages an installation and writes every manifest for it.
///
/// Assemblers run one after another (patcher, client, preloader, ages) over
/// a single [`ContentCache`], then the blacklist is applied. The run's
/// scratch directory is removed however the run ends.
pub struct Generator<I> {
    index: I,
    source: PathBuf,
    output: PathBuf,
    blacklist: PathBuf,
    droid: DroidKey,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub manifests: Vec<ManifestFile>,
    /// Manifests written but not shipped.
    pub removed: Vec<String>,
    /// Artifacts deleted by the blacklist.
    pub pruned: Vec<PathBuf>,
    /// Distinct files staged.
    pub files_processed: usize,
}

impl<I: AssetIndex> Generator<I> {
    pub fn new(
        index: I,
        source: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        blacklist: impl Into<PathBuf>,
        droid: DroidKey,
    ) -> Self {
        Self {
            index,
            source: source.into(),
            output: output.into(),
            blacklist: blacklist.into(),
            droid,
        }
    }

    #[instrument(skip(self), fields(source = %self.source.display(), output = %self.output.display()))]
    pub fn run(&self) -> Result<RunSummary> {
        if !self.source.is_dir() {
            tracing::error!("Installation directory not found");
            exn::bail!(ErrorKind::Io(self.source.clone()));
        }

        let scratch = ScratchDir::new()?;
        let mut cache = ContentCache::new();
        let assembly = {
            let processor = FileProcessor::new(&self.output, &scratch);
            let assemblers: [Box<dyn Assembler + '_>; 4] = [
                Box::new(PatcherAssembler::new(&self.source)),
                Box::new(ClientAssembler::new(&self.source)),
                Box::new(PreloaderAssembler::new(&self.source, self.droid)),
                Box::new(AgeAssembler::new(&self.source, &self.index)),
            ];
            let mut assembly = Assembly::default();
            for assembler in &assemblers {
                tracing::info!(assembler = assembler.name(), "Assembling");
                let result = assembler
                    .assemble(&processor, &mut cache)
                    .or_raise(|| ErrorKind::Assembly(assembler.name()))?;
                assembly.extend(result);
            }
            assembly
        };
        scratch.close()?;

        let pruned = BlacklistPruner::new(&self.blacklist, &self.output).prune()?;
        let summary = RunSummary {
            manifests: assembly.written,
            removed: assembly.removed,
            pruned,
            files_processed: cache.len(),
        };
        tracing::info!(
            manifests = summary.manifests.len(),
            removed = summary.removed.len(),
            pruned = summary.pruned.len(),
            files = summary.files_processed,
            "Staging complete"
        );
        Ok(summary)
    }
}
