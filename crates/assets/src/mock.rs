//! In-memory asset index for testing.

use crate::error::{ErrorKind, Result};
use crate::{AgeContents, AssetIndex};
use std::collections::HashMap;
use std::path::Path;

/// In-memory asset index for testing.
///
/// Ages are looked up by descriptor file stem, so `dat/Kemo.age` resolves to
/// the contents registered as `"Kemo"`. The descriptor file itself is never
/// read.
///
/// # Examples
///
/// ```
/// use gum_assets::{AgeContents, AssetIndex, MockIndex};
/// use std::path::Path;
///
/// let index = MockIndex::with_ages([("Kemo", AgeContents::default())]);
/// assert!(index.read_age(Path::new("dat/Kemo.age")).is_ok());
/// assert!(index.read_age(Path::new("dat/Teledahn.age")).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockIndex {
    ages: HashMap<String, AgeContents>,
}

impl MockIndex {
    pub fn with_ages(ages: impl IntoIterator<Item = (impl Into<String>, AgeContents)>) -> Self {
        Self {
            ages: ages.into_iter().map(|(name, contents)| (name.into(), contents)).collect(),
        }
    }
}

impl AssetIndex for MockIndex {
    fn read_age(&self, descriptor: &Path) -> Result<AgeContents> {
        descriptor
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|name| self.ages.get(name))
            .cloned()
            .ok_or_else(|| ErrorKind::NotFound(descriptor.to_path_buf()).into())
    }
}
