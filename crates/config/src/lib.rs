//! Layered configuration for manifest generation.
//!
//! Precedence, lowest to highest:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: the explicit `--config` path, else the per-user config file
//!    if one exists ([`Config::default_file`])
//! 3. Command-line flags ([`Overrides`])
//!
//! Environment variables are deliberately not a layer; a run is fully
//! described by its files and flags.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use gum_cipher::DroidKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder droid key shipped with the tool; real deployments override it.
pub const DEFAULT_DROID: &str = "31415926535897932384626433832795";
pub const DEFAULT_OUTPUT: &str = "FileSrv";
pub const DEFAULT_BLACKLIST: &str = "blacklist.txt";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference installation to stage from.
    pub source: PathBuf,
    /// 32 hexadecimal digits keying the secure preloader content.
    pub droid: String,
    /// Staging root; manifests and `.gz` artifacts are written here.
    pub output: PathBuf,
    /// Artifacts (relative to `output`, without `.gz`) removed after staging.
    pub blacklist: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            droid: DEFAULT_DROID.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            blacklist: PathBuf::from(DEFAULT_BLACKLIST),
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<PathBuf>,
}

impl Config {
    /// Merge defaults, an optional TOML file and command-line overrides.
    ///
    /// An explicit `file` must exist. Without one, the per-user config file is
    /// merged only when present.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                if let Some(path) = Self::default_file().filter(|path| path.is_file()) {
                    tracing::debug!(path = %path.display(), "Merging per-user configuration file");
                    figment = figment.merge(Toml::file_exact(path));
                }
            },
        }
        figment
            .merge(Serialized::globals(overrides))
            .extract()
            .map_err(|e| ErrorKind::Load(e.to_string()).into())
    }

    /// Per-user configuration file location, e.g. `~/.config/gum/config.toml`.
    pub fn default_file() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gum").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Decode the droid secret into the preloader cipher key.
    pub fn droid_key(&self) -> Result<DroidKey> {
        self.droid.parse::<DroidKey>().or_raise(|| ErrorKind::InvalidKey)
    }
}

#[cfg(windows)]
fn default_source() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Uru Live")
}

#[cfg(not(windows))]
fn default_source() -> PathBuf {
    // Typical Wine prefix layout for the Windows client.
    let install = Path::new(".wine/drive_c/Program Files/Uru Live");
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(install))
        .unwrap_or_else(|| install.to_path_buf())
}
