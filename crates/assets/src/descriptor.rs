//! Age descriptor (`.age`) parsing.
//!
//! Descriptors are short `Key=Value` text files, usually sealed with the
//! default-key cipher:
//!
//! ```text
//! StartDateTime=0000000000
//! DayLength=24.000000
//! MaxCapacity=10
//! SequencePrefix=7
//! Page=kemoGarden,0
//! Page=kemoStorm,1,1
//! ```

use crate::error::{ErrorKind, Result};
use crate::{AgeContents, AssetIndex};
use exn::ResultExt;
use gum_cipher::Cipher;
use std::path::Path;
use tracing::instrument;

/// Pages every age carries in addition to its descriptor's list, in order.
const COMMON_PAGES: [&str; 2] = ["Textures", "BuiltIn"];
const PAGE_KEY: &str = "Page";

/// Parsed age descriptor. Only what manifest generation needs is kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgeDescriptor {
    pub name: String,
    /// Page names from `Page=` lines, in descriptor order.
    pub pages: Vec<String>,
}
impl AgeDescriptor {
    /// Parse descriptor text for the age called `name`.
    ///
    /// Unknown keys are ignored; malformed `Page=` lines are rejected.
    ///
    /// ```
    /// use gum_assets::AgeDescriptor;
    ///
    /// let age = AgeDescriptor::parse("Kemo", "MaxCapacity=10\nPage=kemoGarden,0\n").unwrap();
    /// assert_eq!(age.page_file_names(), ["Kemo_District_kemoGarden.prp"]);
    /// ```
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut pages = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case(PAGE_KEY) {
                continue;
            }
            pages.push(Self::parse_page(index + 1, value.trim())?);
        }
        Ok(Self { name: name.into(), pages })
    }

    /// Page name from a `Page=name,suffix[,flags]` value. Suffix and flags
    /// must be numeric but don't affect which files ship.
    fn parse_page(line: usize, value: &str) -> Result<String> {
        let malformed = |reason: &str| ErrorKind::MalformedDescriptor { line, reason: reason.to_string() };
        let mut parts = value.split(',').map(str::trim);
        let name = match parts.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => exn::bail!(malformed("page name is empty")),
        };
        let Some(suffix) = parts.next() else {
            exn::bail!(malformed("page suffix is missing"));
        };
        suffix.parse::<u32>().map_err(|_| malformed("page suffix is not a number"))?;
        if let Some(flags) = parts.next() {
            flags.parse::<u32>().map_err(|_| malformed("page flags are not a number"))?;
        }
        Ok(name)
    }

    pub fn page_file_names(&self) -> Vec<String> {
        self.pages.iter().map(|page| self.page_file_name(page)).collect()
    }

    pub fn common_page_file_names(&self) -> Vec<String> {
        COMMON_PAGES.iter().map(|page| self.page_file_name(page)).collect()
    }

    fn page_file_name(&self, page: &str) -> String {
        format!("{}_District_{}.prp", self.name, page)
    }
}

/// [`AssetIndex`] backed by the age descriptor alone.
///
/// Sound buffers live inside the binary pages; enumerating them needs a page
/// parser, so this index reports none. Substitute a parser-backed index to
/// get `sfx` entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorIndex;

impl AssetIndex for DescriptorIndex {
    #[instrument(skip(self), fields(descriptor = %descriptor.display()))]
    fn read_age(&self, descriptor: &Path) -> Result<AgeContents> {
        let Some(name) = descriptor.file_stem().and_then(|stem| stem.to_str()) else {
            exn::bail!(ErrorKind::NotFound(descriptor.to_path_buf()));
        };
        let bytes = std::fs::read(descriptor).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(descriptor.to_path_buf()),
            _ => ErrorKind::Io(descriptor.to_path_buf()),
        })?;
        let bytes = match Cipher::is_encrypted(&bytes) {
            true => Cipher::decrypt(&bytes, None).or_raise(|| ErrorKind::Cipher)?,
            false => bytes,
        };
        let age = AgeDescriptor::parse(name, &String::from_utf8_lossy(&bytes))?;
        tracing::debug!(age = %age.name, pages = age.pages.len(), "Sound buffers require a page parser; none enumerated");
        Ok(AgeContents {
            common_pages: age.common_page_file_names(),
            pages: age.page_file_names(),
            sound_buffers: Vec::new(),
        })
    }
}
