use crate::EXTENSION;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Append the artifact extension to a path, keeping any existing extension.
///
/// `Path::with_extension` would replace `.exe` in `plClient.exe`; artifacts
/// are named `plClient.exe.gz`.
///
/// ```
/// use gum_compress::with_extension;
/// use std::path::Path;
///
/// assert_eq!(with_extension("dat/Kemo.age"), Path::new("dat/Kemo.age.gz"));
/// ```
pub fn with_extension(path: impl AsRef<Path>) -> PathBuf {
    let mut name = OsString::from(path.as_ref().as_os_str());
    name.push(EXTENSION);
    PathBuf::from(name)
}
