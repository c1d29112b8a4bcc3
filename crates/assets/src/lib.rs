//! Age content enumeration.
//!
//! An age ships as a descriptor (`dat/<Age>.age`) plus the pages it names and
//! the sound files those pages reference. Manifest generation only needs the
//! *names* of those files and a few bits of sound metadata, so the parsing is
//! hidden behind the [`AssetIndex`] trait: the bundled [`DescriptorIndex`]
//! reads descriptors directly, while a full page parser (or the in-memory
//! `MockIndex` behind the `mock` feature) can be substituted without touching
//! any manifest logic.

mod descriptor;
pub mod error;
#[cfg(feature = "mock")]
mod mock;

pub use crate::descriptor::{AgeDescriptor, DescriptorIndex};
use crate::error::Result;
#[cfg(feature = "mock")]
pub use crate::mock::MockIndex;
use std::ops::BitOr;
use std::path::Path;

/// Enumerates the files an age consists of.
pub trait AssetIndex {
    /// Read the age described by the descriptor at `descriptor`.
    ///
    /// Page and sound-buffer order is significant: manifests list them in the
    /// order returned here.
    fn read_age(&self, descriptor: &Path) -> Result<AgeContents>;
}

/// Files belonging to one age, as bare file names (no directory component).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgeContents {
    /// Pages every age carries regardless of its descriptor (textures, built-ins).
    pub common_pages: Vec<String>,
    /// Pages listed by the descriptor.
    pub pages: Vec<String>,
    /// Sound buffers referenced by any of the age's pages.
    pub sound_buffers: Vec<SoundBuffer>,
}

/// A sound file referenced by a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundBuffer {
    pub file_name: String,
    pub flags: SoundBufferFlags,
}
impl SoundBuffer {
    pub fn new(file_name: impl Into<String>, flags: SoundBufferFlags) -> Self {
        Self { file_name: file_name.into(), flags }
    }

    /// Sound plays from one channel of a stereo file.
    pub fn is_single_channel(&self) -> bool {
        self.flags.contains(SoundBufferFlags::ONLY_LEFT_CHANNEL)
            || self.flags.contains(SoundBufferFlags::ONLY_RIGHT_CHANNEL)
    }

    /// Sound is decompressed while streaming instead of up front.
    pub fn is_stream_compressed(&self) -> bool {
        self.flags.contains(SoundBufferFlags::STREAM_COMPRESSED)
    }
}

/// Engine-side sound buffer flag bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SoundBufferFlags(u32);
impl SoundBufferFlags {
    pub const NONE: Self = Self(0);
    pub const IS_EXTERNAL: Self = Self(0x01);
    pub const ALWAYS_EXTERNAL: Self = Self(0x02);
    pub const ONLY_LEFT_CHANNEL: Self = Self(0x04);
    pub const ONLY_RIGHT_CHANNEL: Self = Self(0x08);
    pub const STREAM_COMPRESSED: Self = Self(0x10);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}
impl BitOr for SoundBufferFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SoundBufferFlags::NONE, false, false)]
    #[case(SoundBufferFlags::ONLY_LEFT_CHANNEL, true, false)]
    #[case(SoundBufferFlags::ONLY_RIGHT_CHANNEL, true, false)]
    #[case(SoundBufferFlags::STREAM_COMPRESSED, false, true)]
    #[case(SoundBufferFlags::ONLY_LEFT_CHANNEL | SoundBufferFlags::STREAM_COMPRESSED, true, true)]
    #[case(SoundBufferFlags::IS_EXTERNAL | SoundBufferFlags::ALWAYS_EXTERNAL, false, false)]
    fn test_sound_buffer_predicates(
        #[case] flags: SoundBufferFlags,
        #[case] single_channel: bool,
        #[case] stream_compressed: bool,
    ) {
        let buffer = SoundBuffer::new("kemoStream.ogg", flags);
        assert_eq!(buffer.is_single_channel(), single_channel);
        assert_eq!(buffer.is_stream_compressed(), stream_compressed);
    }

    #[test]
    fn test_flags_bits() {
        let flags = SoundBufferFlags::from_bits(0x14);
        assert!(flags.contains(SoundBufferFlags::ONLY_LEFT_CHANNEL));
        assert!(flags.contains(SoundBufferFlags::STREAM_COMPRESSED));
        assert!(!flags.contains(SoundBufferFlags::ONLY_RIGHT_CHANNEL));
        assert_eq!(flags.bits(), 0x14);
    }
}
