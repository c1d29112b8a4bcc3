//! Manifest assemblers.
//!
//! Each assembler decides which installation files belong in its manifests,
//! feeds them through the shared [`FileProcessor`] and writes the resulting
//! records in order. All of them share one [`ContentCache`], so a file listed
//! by several assemblers is staged once.

mod age;
mod client;
mod patcher;
mod preloader;

pub use self::age::{AgeAssembler, DiscoveredAge, discover_ages};
pub use self::client::ClientAssembler;
pub use self::patcher::PatcherAssembler;
pub use self::preloader::{PRELOADER_MANIFEST, PreloaderAssembler};
use crate::cache::ContentCache;
use crate::error::Result;
use crate::processor::FileProcessor;
use crate::writer::ManifestFile;

/// One manifest channel's selection and routing rules.
pub trait Assembler {
    /// Short name used in logs and error context.
    fn name(&self) -> &'static str;

    fn assemble(&self, processor: &FileProcessor<'_>, cache: &mut ContentCache) -> Result<Assembly>;
}

/// What an assembler left in the output root.
#[derive(Debug, Default)]
pub struct Assembly {
    /// Manifests written and kept, in creation order.
    pub written: Vec<ManifestFile>,
    /// Names of manifests written and then deleted as not shippable.
    pub removed: Vec<String>,
}

impl Assembly {
    pub fn extend(&mut self, other: Assembly) {
        self.written.extend(other.written);
        self.removed.extend(other.removed);
    }
}
