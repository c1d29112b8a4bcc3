use gum_assets::{AgeContents, MockIndex, SoundBuffer, SoundBufferFlags};
use gum_cipher::{Cipher, DroidKey};
use gum_compress::Gzip;
use gum_manifest::error::ErrorKind;
use gum_manifest::{ContentCache, FileProcessor, Generator, ManifestFlags, Request, ScratchDir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DROID: DroidKey = DroidKey::new([0x31415926, 0x53589793, 0x23846264, 0x33832795]);

/// A throwaway installation plus output root.
struct Install {
    root: TempDir,
}

impl Install {
    fn new() -> Self {
        let install = Self {
            root: TempDir::new().unwrap(),
        };
        for dir in ["source/avi", "source/dat", "source/sfx", "source/Python", "source/SDL", "FileSrv"] {
            fs::create_dir_all(install.root.path().join(dir)).unwrap();
        }
        install
    }

    fn with(self, files: &[&str]) -> Self {
        for file in files {
            self.write(file, format!("contents of {file}").as_bytes());
        }
        self
    }

    fn write(&self, file: &str, bytes: &[u8]) {
        fs::write(self.source().join(file), bytes).unwrap();
    }

    fn blacklist(&self, lines: &str) -> PathBuf {
        let path = self.root.path().join("blacklist.txt");
        fs::write(&path, lines).unwrap();
        path
    }

    fn source(&self) -> PathBuf {
        self.root.path().join("source")
    }

    fn output(&self) -> PathBuf {
        self.root.path().join("FileSrv")
    }

    fn manifest(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.output().join(format!("{name}.mfs")))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn generator(&self, index: MockIndex, blacklist: &Path) -> Generator<MockIndex> {
        Generator::new(index, self.source(), self.output(), blacklist, DROID)
    }
}

fn kemo() -> MockIndex {
    MockIndex::with_ages([(
        "Kemo",
        AgeContents {
            common_pages: vec!["Kemo_District_BuiltIn.prp".to_string()],
            pages: vec![],
            sound_buffers: vec![SoundBuffer::new(
                "kemoStream.ogg",
                SoundBufferFlags::ONLY_LEFT_CHANNEL | SoundBufferFlags::STREAM_COMPRESSED,
            )],
        },
    )])
}

fn fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

#[test]
fn kemo_age_manifest() {
    let install = Install::new().with(&["dat/Kemo.age", "dat/Kemo_District_BuiltIn.prp", "sfx/kemoStream.ogg"]);
    let blacklist = install.blacklist("");

    install.generator(kemo(), &blacklist).run().unwrap();

    let lines = install.manifest("Kemo");
    assert_eq!(lines.len(), 3);

    let descriptor = fields(&lines[0]);
    assert_eq!(descriptor[..2], [r"dat\Kemo.age", "dat/Kemo.age.gz"]);
    assert_eq!(descriptor[6], "0");
    // Staged sealed, and the plain digest covers the sealed bytes.
    let staged = Gzip.decompress(&fs::read(install.output().join("dat/Kemo.age.gz")).unwrap()).unwrap();
    assert!(staged.starts_with(Cipher::Default.magic()));
    assert_eq!(descriptor[4], staged.len().to_string());

    let page = fields(&lines[1]);
    assert_eq!(page[0], r"dat\Kemo_District_BuiltIn.prp");
    assert_eq!(page[6], "0");

    let sound = fields(&lines[2]);
    assert_eq!(sound[..2], [r"sfx\kemoStream.ogg", "sfx/kemoStream.ogg.gz"]);
    assert_eq!(sound[6], "3");
    assert_eq!(
        sound[6],
        (ManifestFlags::DUAL_CHANNEL_OGG | ManifestFlags::STREAM_OGG).to_string()
    );
}

#[test]
fn full_run() {
    let install = Install::new().with(&[
        "server.ini",
        "plUruLauncher.exe",
        "plClient.exe",
        "resource.dat",
        "avi/intro.bik",
        "dat/Kemo.age",
        "dat/Kemo_District_BuiltIn.prp",
        "sfx/kemoStream.ogg",
        "Python/python.pak",
        "SDL/kemo.sdl",
    ]);
    let blacklist = install.blacklist("avi/intro.bik\n");

    let summary = install.generator(kemo(), &blacklist).run().unwrap();

    let mut written: Vec<_> = summary.manifests.iter().map(|manifest| manifest.name.as_str()).collect();
    written.sort();
    assert_eq!(
        written,
        vec!["Internal", "InternalPatcher", "Kemo", "SecurePreloader", "ThinInternal"]
    );
    assert_eq!(summary.removed, vec!["External".to_string()]);
    assert_eq!(summary.pruned, vec![install.output().join("avi/intro.bik.gz")]);
    assert!(!install.output().join("avi/intro.bik.gz").exists());
    // The manifest still lists the pruned artifact; pruning only stops it being served.
    assert!(install.manifest("Internal").iter().any(|line| line.starts_with(r"avi\intro.bik,")));

    // dat/Kemo.age is listed by both the client and the age manifest but staged once.
    let client_line = install
        .manifest("Internal")
        .into_iter()
        .find(|line| line.starts_with(r"dat\Kemo.age,"))
        .unwrap();
    assert_eq!(client_line, install.manifest("Kemo")[0]);
    assert_eq!(summary.files_processed, 10);

    let preloader = install.manifest("SecurePreloader");
    assert_eq!(preloader.len(), 2);
    let staged = Gzip.decompress(&fs::read(install.output().join("Python/python.pak.gz")).unwrap()).unwrap();
    assert_eq!(Cipher::decrypt(&staged, Some(DROID)).unwrap(), b"contents of Python/python.pak");
}

#[test]
fn uppercase_descriptor_extension() {
    let install = Install::new().with(&["plClient.exe", "dat/Teledahn.AGE", "dat/Teledahn_District_BuiltIn.prp"]);
    let blacklist = install.blacklist("");
    let index = MockIndex::with_ages([(
        "Teledahn",
        AgeContents {
            common_pages: vec!["Teledahn_District_BuiltIn.prp".to_string()],
            pages: vec![],
            sound_buffers: vec![],
        },
    )]);

    install.generator(index, &blacklist).run().unwrap();

    let lines = install.manifest("Teledahn");
    assert_eq!(lines.len(), 2);
    assert_eq!(fields(&lines[0])[..2], [r"dat\Teledahn.AGE", "dat/Teledahn.AGE.gz"]);
    assert_eq!(fields(&lines[1])[0], r"dat\Teledahn_District_BuiltIn.prp");
    // The client manifest lists the same staged descriptor.
    let client_line = install
        .manifest("Internal")
        .into_iter()
        .find(|line| line.starts_with(r"dat\Teledahn.AGE,"))
        .unwrap();
    assert_eq!(client_line, lines[0]);
}

#[test]
fn processed_once_per_run() {
    let install = Install::new().with(&["dat/Kemo.age"]);
    let scratch = ScratchDir::new().unwrap();
    let processor = FileProcessor::new(install.output(), &scratch);
    let mut cache = ContentCache::new();
    let source = install.source();

    let first = processor
        .process(&mut cache, &Request::new("dat/Kemo.age", &source).encrypted())
        .unwrap()
        .unwrap();
    let artifact = install.output().join("dat/Kemo.age.gz");
    let modified = fs::metadata(&artifact).unwrap().modified().unwrap();
    // Changing the source has no effect once staged.
    install.write("dat/Kemo.age", b"changed");
    let second = processor
        .process(&mut cache, &Request::new("dat/Kemo.age", &source).encrypted())
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::metadata(&artifact).unwrap().modified().unwrap(), modified);
    assert_eq!(cache.len(), 1);
}

#[test]
fn artifact_round_trip() {
    let install = Install::new();
    let bytes: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    install.write("avi/intro.bik", &bytes);
    let scratch = ScratchDir::new().unwrap();
    let processor = FileProcessor::new(install.output(), &scratch);
    let source = install.source();

    let record = processor
        .process(&mut ContentCache::new(), &Request::new("avi/intro.bik", &source))
        .unwrap()
        .unwrap();

    let staged = fs::read(install.output().join("avi/intro.bik.gz")).unwrap();
    assert_eq!(Gzip.decompress(&staged).unwrap(), bytes);
    assert_eq!(record.plain_size, bytes.len() as u64);
    assert_eq!(record.compressed_size, staged.len() as u64);
}

#[test]
fn missing_blacklist_target_aborts() {
    let install = Install::new().with(&["plClient.exe"]);
    let blacklist = install.blacklist("Client/UruExplorer.exe\n");

    let err = install.generator(MockIndex::default(), &blacklist).run().unwrap_err();

    assert_eq!(
        *err,
        ErrorKind::MissingBlacklistTarget(install.output().join("Client/UruExplorer.exe.gz"))
    );
}

#[test]
fn assembler_failure_names_assembler() {
    let install = Install::new().with(&["dat/Kemo.age"]);
    let blacklist = install.blacklist("");

    // The index knows nothing about Kemo.
    let err = install.generator(MockIndex::default(), &blacklist).run().unwrap_err();

    assert_eq!(*err, ErrorKind::Assembly("age"));
}

#[test]
fn missing_installation() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("Uru Live");
    let err = Generator::new(MockIndex::default(), &source, root.path().join("FileSrv"), "blacklist.txt", DROID)
        .run()
        .unwrap_err();
    assert_eq!(*err, ErrorKind::Io(source));
}
