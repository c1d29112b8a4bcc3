//! Which installation files belong to which manifests.
//!
//! Selection rules are data: assemblers look files up in these tables rather
//! than branching on names themselves. Every name and extension comparison is
//! ASCII case-insensitive.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::Path;

/// Staging subfolder for top-level client files.
pub const CLIENT_SUBFOLDER: &str = "Client";
/// Staging subfolder for patcher files.
pub const PATCHER_SUBFOLDER: &str = "Patcher";
/// Virtual folder sound buffers are listed under.
pub const SFX_DIR: &str = "sfx";
/// Installation folder holding descriptors, pages and data files.
pub const DATA_DIR: &str = "dat";
/// Installation folder holding movies and menu audio.
pub const MEDIA_DIR: &str = "avi";

/// Client distribution channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Internal,
    External,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Internal, Channel::External];

    pub fn manifest_name(self) -> &'static str {
        match self {
            Channel::Internal => "Internal",
            Channel::External => "External",
        }
    }

    pub fn thin_manifest_name(self) -> &'static str {
        match self {
            Channel::Internal => "ThinInternal",
            Channel::External => "ThinExternal",
        }
    }

    pub fn patcher_manifest_name(self) -> &'static str {
        match self {
            Channel::Internal => "InternalPatcher",
            Channel::External => "ExternalPatcher",
        }
    }
}

/// Where a top-level client file goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub channels: &'static [Channel],
    /// The file is the channel's primary executable; without one the
    /// channel's manifests are not shipped.
    pub primary: bool,
}

impl Route {
    pub const BOTH: Route = Route {
        channels: &Channel::ALL,
        primary: false,
    };

    const fn primary(channel: &'static [Channel]) -> Self {
        Route { channels: channel, primary: true }
    }

    const fn only(channel: &'static [Channel]) -> Self {
        Route { channels: channel, primary: false }
    }
}

const INTERNAL: &[Channel] = &[Channel::Internal];
const EXTERNAL: &[Channel] = &[Channel::External];

/// Named top-level files with a route other than [`Route::BOTH`].
pub const CLIENT_ROUTES: &[(&str, Route)] = &[
    ("plclient.exe", Route::primary(INTERNAL)),
    ("uruexplorer.exe", Route::primary(EXTERNAL)),
    ("plcrashhandler.exe", Route::only(INTERNAL)),
    ("urucrashhandler.exe", Route::only(EXTERNAL)),
];

/// Top-level extensions never shipped in a client manifest.
pub const CLIENT_SKIPPED_EXTENSIONS: &[&str] = &["lnk", "ini"];
/// Top-level files never shipped in a client manifest; the patcher ships them.
pub const CLIENT_SKIPPED_NAMES: &[&str] = &["urulauncher.exe", "plurulauncher.exe"];

/// Media extensions shipped from [`MEDIA_DIR`].
pub const MEDIA_EXTENSIONS: &[&str] = &["avi", "bik", "ogg", "ogv"];

/// Data extensions shipped from [`DATA_DIR`], and whether each is encrypted.
pub const DATA_EXTENSIONS: &[(&str, bool)] = &[("age", true), ("p2f", false), ("loc", false)];

/// Preloader sources: (installation folder, extension). Always droid-encrypted.
pub const PRELOADER_SOURCES: &[(&str, &str)] = &[("Python", "pak"), ("SDL", "sdl")];

/// Patcher launchers, one per channel. Each patcher manifest is written only
/// when its own channel's launcher is present; `ExternalPatcher` keys on
/// `UruLauncher.exe`, not on the external client executable.
pub const PATCHER_LAUNCHERS: &[(Channel, &str)] =
    &[(Channel::Internal, "plUruLauncher.exe"), (Channel::External, "UruLauncher.exe")];
/// Shared by both patcher manifests.
pub const PATCHER_SHARED: &str = "server.ini";

/// Route for a top-level client file, or `None` if it is skipped.
pub fn client_route(file_name: &str) -> Option<Route> {
    if CLIENT_SKIPPED_NAMES.iter().any(|name| file_name.eq_ignore_ascii_case(name))
        || has_extension_in(file_name, CLIENT_SKIPPED_EXTENSIONS)
    {
        return None;
    }
    let route = CLIENT_ROUTES
        .iter()
        .find(|(name, _)| file_name.eq_ignore_ascii_case(name))
        .map_or(Route::BOTH, |(_, route)| *route);
    Some(route)
}

/// Whether a data file is shipped, and if so whether it's encrypted.
pub fn data_rule(file_name: &str) -> Option<bool> {
    DATA_EXTENSIONS
        .iter()
        .find(|(extension, _)| has_extension(file_name, extension))
        .map(|(_, encrypt)| *encrypt)
}

pub fn is_media(file_name: &str) -> bool {
    has_extension_in(file_name, MEDIA_EXTENSIONS)
}

pub fn has_extension(file_name: &str, extension: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn has_extension_in(file_name: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|extension| has_extension(file_name, extension))
}

/// Names of the regular files directly inside `dir`, in directory-listing
/// order. Names that aren't valid UTF-8 can't be written to a manifest and
/// are skipped with a warning.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).or_raise(|| ErrorKind::Io(dir.to_path_buf()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.or_raise(|| ErrorKind::Io(dir.to_path_buf()))?;
        let file_type = entry.file_type().or_raise(|| ErrorKind::Io(entry.path()))?;
        if !file_type.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => tracing::warn!(name = ?name, dir = %dir.display(), "Skipping file with non-UTF-8 name"),
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("plClient.exe", Some(Route::primary(INTERNAL)))]
    #[case("PLCLIENT.EXE", Some(Route::primary(INTERNAL)))]
    #[case("UruExplorer.exe", Some(Route::primary(EXTERNAL)))]
    #[case("plCrashHandler.exe", Some(Route::only(INTERNAL)))]
    #[case("UruCrashHandler.exe", Some(Route::only(EXTERNAL)))]
    #[case("resource.dat", Some(Route::BOTH))]
    #[case("OpenAL32.dll", Some(Route::BOTH))]
    #[case("UruLauncher.exe", None)]
    #[case("plUruLauncher.exe", None)]
    #[case("Uru Live.lnk", None)]
    #[case("server.INI", None)]
    fn test_client_route(#[case] file_name: &str, #[case] expected: Option<Route>) {
        assert_eq!(client_route(file_name), expected);
    }

    #[rstest]
    #[case("Kemo.age", Some(true))]
    #[case("KEMO.AGE", Some(true))]
    #[case("Kemo.p2f", Some(false))]
    #[case("English.loc", Some(false))]
    #[case("Kemo.fni", None)]
    #[case("Kemo_District_BuiltIn.prp", None)]
    fn test_data_rule(#[case] file_name: &str, #[case] expected: Option<bool>) {
        assert_eq!(data_rule(file_name), expected);
    }

    #[rstest]
    #[case("intro.bik", true)]
    #[case("menu.OGG", true)]
    #[case("credits.ogv", true)]
    #[case("notes.txt", false)]
    #[case("avi", false)]
    fn test_is_media(#[case] file_name: &str, #[case] expected: bool) {
        assert_eq!(is_media(file_name), expected);
    }

    #[test]
    fn test_every_route_has_a_channel() {
        for (name, route) in CLIENT_ROUTES {
            assert!(!route.channels.is_empty(), "{name} routes nowhere");
        }
    }

    #[test]
    fn test_list_files_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plClient.exe"), b"MZ").unwrap();
        fs::create_dir(dir.path().join("dat")).unwrap();
        let names = list_files(dir.path()).unwrap();
        assert_eq!(names, vec!["plClient.exe".to_string()]);
    }

    #[test]
    fn test_list_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = list_files(&dir.path().join("avi")).unwrap_err();
        assert!(matches!(*err, ErrorKind::Io(_)));
    }
}
