//! Relative path validation and manifest rendering.
//!
//! Installation-relative paths are carried around as `/`-separated strings
//! (`dat/Kemo.age`, `Python/python.pak`). They key the content cache, get
//! joined onto source and staging roots, and are rendered into manifests
//! with the separators the client expects.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Validates a relative path so it can't escape the root it is joined onto.
///
/// `.` components and repeated separators are dropped and `..` is resolved,
/// but the path may never climb above its root. Absolute paths, Windows
/// prefixes and null bytes are rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gum_manifest::validate_path;
/// assert!(validate_path("dat/Kemo.age").is_ok());
/// assert!(validate_path("dat/../plClient.exe").is_ok());
/// assert!(validate_path("../secrets.txt").is_err());
/// assert!(validate_path("dat/../../b").is_err());
/// assert_eq!(validate_path("./sfx//kemo.ogg/").unwrap(), Path::new("sfx/kemo.ogg"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes survive Path::components() on Unix but truncate
                // in the underlying syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir => {},
            Component::RootDir | Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Render a `/`-separated relative path the way the client names files.
///
/// ```
/// use gum_manifest::to_client_path;
/// assert_eq!(to_client_path("dat/Kemo.age"), r"dat\Kemo.age");
/// ```
pub fn to_client_path(path: &str) -> String {
    path.replace('/', "\\")
}

/// Join a relative path under an optional subfolder, `/`-separated.
pub(crate) fn join_relative(subfolder: Option<&str>, path: &str) -> String {
    match subfolder {
        Some(subfolder) => format!("{subfolder}/{path}"),
        None => path.to_string(),
    }
}
