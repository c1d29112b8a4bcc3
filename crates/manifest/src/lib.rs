//! Staging and manifest assembly for the patch file server.
//!
//! A run walks a reference installation, stages every file a client may
//! download as a deterministic `.gz` artifact under the output root (sealing
//! some of them first), and writes `.mfs` manifests listing what each kind of
//! client fetches:
//!
//! - **Patcher**: `InternalPatcher` / `ExternalPatcher`, per launcher present
//! - **Client**: `Internal` / `External` plus byte-identical `Thin` copies
//! - **Preloader**: `SecurePreloader`, sealed with the caller's droid key
//! - **Ages**: one manifest per age descriptor
//!
//! Each distinct relative path is staged at most once per run; later requests
//! reuse the cached digests. See [`Generator`] for the whole run and
//! [`FileProcessor`] for the per-file transform.

pub mod assemble;
mod blacklist;
mod cache;
mod digest;
pub mod error;
mod flags;
mod generator;
mod path;
mod processor;
mod record;
pub mod routing;
mod scratch;
mod writer;

pub use crate::blacklist::BlacklistPruner;
pub use crate::cache::{ContentCache, ProcessedFile};
pub use crate::flags::ManifestFlags;
pub use crate::generator::{Generator, RunSummary};
pub use crate::path::{to_client_path, validate as validate_path};
pub use crate::processor::{FileProcessor, Request};
pub use crate::record::ManifestRecord;
pub use crate::scratch::{ScratchDir, StagedFile};
pub use crate::writer::{MANIFEST_EXTENSION, ManifestFile, ManifestWriter, manifest_path};
