use super::{Assembler, Assembly};
use crate::cache::ContentCache;
use crate::error::Result;
use crate::processor::{FileProcessor, Request};
use crate::record::ManifestRecord;
use crate::routing::{
    CLIENT_SUBFOLDER, Channel, DATA_DIR, MEDIA_DIR, client_route, data_rule, is_media, list_files,
};
use crate::writer::ManifestWriter;
use std::path::Path;
use tracing::instrument;

/// Writes the `Internal` and `External` client manifests and their `Thin`
/// copies.
///
/// A channel's manifests only survive if the installation carries that
/// channel's primary executable.
pub struct ClientAssembler<'a> {
    source: &'a Path,
}

impl<'a> ClientAssembler<'a> {
    pub fn new(source: &'a Path) -> Self {
        Self { source }
    }
}

/// Both channel writers plus whether each has seen its primary executable.
struct Channels {
    internal: ManifestWriter,
    external: ManifestWriter,
    has_internal: bool,
    has_external: bool,
}

impl Channels {
    fn create(output: &Path) -> Result<Self> {
        Ok(Self {
            internal: ManifestWriter::create(output, Channel::Internal.manifest_name())?,
            external: ManifestWriter::create(output, Channel::External.manifest_name())?,
            has_internal: false,
            has_external: false,
        })
    }

    fn writer(&mut self, channel: Channel) -> &mut ManifestWriter {
        match channel {
            Channel::Internal => &mut self.internal,
            Channel::External => &mut self.external,
        }
    }

    fn mark_primary(&mut self, channel: Channel) {
        match channel {
            Channel::Internal => self.has_internal = true,
            Channel::External => self.has_external = true,
        }
    }

    fn append(&mut self, channels: &[Channel], record: Option<ManifestRecord>) -> Result<()> {
        if let Some(record) = record {
            for channel in channels {
                self.writer(*channel).append(&record)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Assembly> {
        let mut assembly = Assembly::default();
        let channels = [
            (Channel::Internal, self.internal, self.has_internal),
            (Channel::External, self.external, self.has_external),
        ];
        for (channel, writer, keep) in channels {
            let manifest = writer.close()?;
            match keep {
                true => {
                    let thin = manifest.copy_as(channel.thin_manifest_name())?;
                    assembly.written.push(manifest);
                    assembly.written.push(thin);
                },
                false => {
                    tracing::info!(manifest = %manifest.name, "No primary executable; not shipping channel");
                    assembly.removed.push(manifest.name.clone());
                    manifest.delete()?;
                },
            }
        }
        Ok(assembly)
    }
}

impl Assembler for ClientAssembler<'_> {
    fn name(&self) -> &'static str {
        "client"
    }

    #[instrument(skip_all, fields(source = %self.source.display()))]
    fn assemble(&self, processor: &FileProcessor<'_>, cache: &mut ContentCache) -> Result<Assembly> {
        let mut channels = Channels::create(processor.output())?;

        for name in list_files(self.source)? {
            let Some(route) = client_route(&name) else {
                tracing::debug!(file = %name, "Not a client file");
                continue;
            };
            if route.primary {
                for channel in route.channels {
                    channels.mark_primary(*channel);
                }
            }
            let request = Request::new(&name, self.source).subfolder(CLIENT_SUBFOLDER);
            channels.append(route.channels, processor.process(cache, &request)?)?;
        }

        for name in list_files(&self.source.join(MEDIA_DIR))? {
            if is_media(&name) {
                let path = format!("{MEDIA_DIR}/{name}");
                channels.append(&Channel::ALL, processor.process(cache, &Request::new(&path, self.source))?)?;
            }
        }

        for name in list_files(&self.source.join(DATA_DIR))? {
            if let Some(encrypt) = data_rule(&name) {
                let path = format!("{DATA_DIR}/{name}");
                let request = Request::new(&path, self.source).encrypted_if(encrypt);
                channels.append(&Channel::ALL, processor.process(cache, &request)?)?;
            }
        }

        channels.finish()
    }
}
