//! Content cache shared by every assembler in a run.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Digests and sizes of one staged file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedFile {
    /// MD5 of the bytes that were compressed (post-encryption, if encrypted).
    pub plain_hash: String,
    /// MD5 of the staged `.gz` artifact.
    pub compressed_hash: String,
    pub plain_size: u64,
    pub compressed_size: u64,
}

/// Relative source path → staging result, for the lifetime of one run.
///
/// Keyed by the relative path *exactly as requested* and nothing else: a
/// later request for the same path under a different subfolder, flag set or
/// encryption setting reuses the first result unchanged.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, ProcessedFile>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&ProcessedFile> {
        self.entries.get(path)
    }

    /// Record a staging result. The first result for a path wins; a second
    /// insert for the same path is ignored and the existing entry returned.
    pub fn insert(&mut self, path: impl Into<String>, file: ProcessedFile) -> &ProcessedFile {
        match self.entries.entry(path.into()) {
            Entry::Occupied(entry) => {
                tracing::warn!(path = %entry.key(), "Content already staged; keeping first result");
                entry.into_mut()
            },
            Entry::Vacant(entry) => entry.insert(file),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
