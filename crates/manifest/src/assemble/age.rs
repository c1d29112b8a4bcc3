use super::{Assembler, Assembly};
use crate::ManifestFlags;
use crate::cache::ContentCache;
use crate::error::{ErrorKind, Result};
use crate::processor::{FileProcessor, Request};
use crate::routing::{DATA_DIR, SFX_DIR, has_extension, list_files};
use crate::writer::{ManifestFile, ManifestWriter};
use exn::ResultExt;
use gum_assets::AssetIndex;
use std::path::Path;
use tracing::instrument;

const DESCRIPTOR_EXTENSION: &str = "age";

/// An age found in `<source>/dat`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredAge {
    /// Age name; names the manifest and the companion files.
    pub name: String,
    /// Descriptor file name exactly as listed, extension case included.
    pub file_name: String,
}

impl DiscoveredAge {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if !has_extension(file_name, DESCRIPTOR_EXTENSION) {
            return None;
        }
        let name = Path::new(file_name).file_stem()?.to_str()?;
        Some(Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
        })
    }

    fn descriptor(&self) -> String {
        format!("{DATA_DIR}/{}", self.file_name)
    }
}

/// Every age with a descriptor in `<source>/dat`, in directory-listing order.
pub fn discover_ages(source: &Path) -> Result<Vec<DiscoveredAge>> {
    let names = list_files(&source.join(DATA_DIR))?;
    Ok(names.iter().filter_map(|name| DiscoveredAge::from_file_name(name)).collect())
}

/// Writes one manifest per age, named after it.
pub struct AgeAssembler<'a, I> {
    source: &'a Path,
    index: &'a I,
}

impl<'a, I: AssetIndex> AgeAssembler<'a, I> {
    pub fn new(source: &'a Path, index: &'a I) -> Self {
        Self { source, index }
    }

    /// Manifest for a single age: descriptor, companions, pages, then sounds.
    #[instrument(skip(self, processor, cache, age), fields(age = %age.name))]
    pub fn assemble_age(
        &self,
        processor: &FileProcessor<'_>,
        cache: &mut ContentCache,
        age: &DiscoveredAge,
    ) -> Result<ManifestFile> {
        let descriptor = age.descriptor();
        let contents = self
            .index
            .read_age(&self.source.join(&descriptor))
            .or_raise(|| ErrorKind::AssetIndex(age.name.clone()))?;

        let mut writer = ManifestWriter::create(processor.output(), &age.name)?;
        writer.append_opt(processor.process(cache, &Request::new(&descriptor, self.source).encrypted())?)?;

        let notifications = format!("{DATA_DIR}/{}.fni", age.name);
        let data = format!("{DATA_DIR}/{}.csv", age.name);
        for (companion, encrypt) in [(&notifications, true), (&data, false)] {
            // Optional; only listed when present.
            if self.source.join(companion).is_file() {
                let request = Request::new(companion, self.source).encrypted_if(encrypt);
                writer.append_opt(processor.process(cache, &request)?)?;
            }
        }

        for page in contents.common_pages.iter().chain(&contents.pages) {
            let path = format!("{DATA_DIR}/{page}");
            writer.append_opt(processor.process(cache, &Request::new(&path, self.source))?)?;
        }

        for buffer in &contents.sound_buffers {
            let path = format!("{SFX_DIR}/{}", buffer.file_name);
            let request = Request::new(&path, self.source).flags(ManifestFlags::for_sound_buffer(buffer));
            writer.append_opt(processor.process(cache, &request)?)?;
        }
        writer.close()
    }
}

impl<I: AssetIndex> Assembler for AgeAssembler<'_, I> {
    fn name(&self) -> &'static str {
        "age"
    }

    #[instrument(skip_all, fields(source = %self.source.display()))]
    fn assemble(&self, processor: &FileProcessor<'_>, cache: &mut ContentCache) -> Result<Assembly> {
        let ages = discover_ages(self.source)?;
        tracing::info!(count = ages.len(), "Building age manifests");
        let mut assembly = Assembly::default();
        for age in ages {
            assembly.written.push(self.assemble_age(processor, cache, &age)?);
        }
        Ok(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::ScratchDir;
    use gum_assets::{AgeContents, MockIndex};
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn install(files: &[&str]) -> TempDir {
        let source = TempDir::new().unwrap();
        for file in files {
            let path = source.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file.as_bytes()).unwrap();
        }
        source
    }

    #[test]
    fn test_discover_ages() {
        let source = install(&["dat/Kemo.age", "dat/Kemo.fni", "dat/Teledahn.AGE", "dat/Kemo_District_BuiltIn.prp"]);
        let mut ages = discover_ages(source.path()).unwrap();
        ages.sort();
        let found: Vec<_> = ages.iter().map(|age| (age.name.as_str(), age.file_name.as_str())).collect();
        assert_eq!(found, vec![("Kemo", "Kemo.age"), ("Teledahn", "Teledahn.AGE")]);
    }

    #[rstest]
    #[case("Kemo.age", Some("Kemo"))]
    #[case("Teledahn.AGE", Some("Teledahn"))]
    #[case("Kemo.fni", None)]
    #[case("age", None)]
    fn test_from_file_name(#[case] file_name: &str, #[case] expected: Option<&str>) {
        let age = DiscoveredAge::from_file_name(file_name);
        assert_eq!(age.as_ref().map(|age| age.name.as_str()), expected);
    }

    #[test]
    fn test_uppercase_descriptor_extension() {
        let source = install(&["dat/Teledahn.AGE", "dat/Teledahn.fni", "dat/Teledahn_District_BuiltIn.prp"]);
        let index = MockIndex::with_ages([(
            "Teledahn",
            AgeContents {
                common_pages: vec!["Teledahn_District_BuiltIn.prp".into()],
                pages: vec![],
                sound_buffers: vec![],
            },
        )]);
        let output = TempDir::new().unwrap();
        let scratch = ScratchDir::new().unwrap();
        let processor = FileProcessor::new(output.path(), &scratch);
        let assembler = AgeAssembler::new(source.path(), &index);

        let assembly = assembler.assemble(&processor, &mut ContentCache::new()).unwrap();

        assert_eq!(assembly.written.len(), 1);
        assert_eq!(assembly.written[0].path, output.path().join("Teledahn.mfs"));
        let text = fs::read_to_string(&assembly.written[0].path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r"dat\Teledahn.AGE,dat/Teledahn.AGE.gz,"));
        assert!(lines[1].starts_with(r"dat\Teledahn.fni,"));
        assert!(output.path().join("dat/Teledahn.AGE.gz").is_file());
    }

    #[test]
    fn test_companions_and_page_order() {
        let source = install(&[
            "dat/Kemo.age",
            "dat/Kemo.csv",
            "dat/Kemo_District_Textures.prp",
            "dat/Kemo_District_kemoGarden.prp",
            "dat/Kemo_District_BuiltIn.prp",
        ]);
        let index = MockIndex::with_ages([(
            "Kemo",
            AgeContents {
                common_pages: vec!["Kemo_District_Textures.prp".into(), "Kemo_District_BuiltIn.prp".into()],
                pages: vec!["Kemo_District_kemoGarden.prp".into()],
                sound_buffers: vec![],
            },
        )]);
        let output = TempDir::new().unwrap();
        let scratch = ScratchDir::new().unwrap();
        let processor = FileProcessor::new(output.path(), &scratch);
        let mut cache = ContentCache::new();

        let manifest = AgeAssembler::new(source.path(), &index)
            .assemble_age(&processor, &mut cache, &DiscoveredAge::from_file_name("Kemo.age").unwrap())
            .unwrap();

        let text = fs::read_to_string(&manifest.path).unwrap();
        let sources: Vec<_> = text.lines().map(|line| line.split(',').next().unwrap()).collect();
        assert_eq!(
            sources,
            vec![
                r"dat\Kemo.age",
                r"dat\Kemo.csv",
                r"dat\Kemo_District_Textures.prp",
                r"dat\Kemo_District_BuiltIn.prp",
                r"dat\Kemo_District_kemoGarden.prp",
            ]
        );
        assert_eq!(manifest.path, output.path().join("Kemo.mfs"));
    }

    #[test]
    fn test_unknown_age() {
        let source = install(&["dat/Kemo.age"]);
        let output = TempDir::new().unwrap();
        let scratch = ScratchDir::new().unwrap();
        let processor = FileProcessor::new(output.path(), &scratch);
        let index = MockIndex::default();
        let err = AgeAssembler::new(source.path(), &index)
            .assemble(&processor, &mut ContentCache::new())
            .unwrap_err();
        assert!(matches!(*err, ErrorKind::AssetIndex(ref age) if age == "Kemo"));
    }
}
