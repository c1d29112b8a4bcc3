use gum_assets::SoundBuffer;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::BitOr;

/// Per-record hint telling the client how to unpack a sound file.
///
/// Only `sfx` records carry bits; everything else is [`NONE`](Self::NONE).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ManifestFlags(u32);

impl ManifestFlags {
    pub const NONE: Self = Self(0x00);
    /// Split the stereo file into two mono channels.
    pub const DUAL_CHANNEL_OGG: Self = Self(0x01);
    /// Leave compressed on disk; decoded while streaming.
    pub const STREAM_OGG: Self = Self(0x02);
    /// Decode as a single stereo file.
    pub const STEREO_OGG: Self = Self(0x04);

    /// Flags for a sound buffer.
    ///
    /// Single-channel buffers get [`DUAL_CHANNEL_OGG`](Self::DUAL_CHANNEL_OGG),
    /// all others [`STEREO_OGG`](Self::STEREO_OGG); never both.
    /// [`STREAM_OGG`](Self::STREAM_OGG) is added independently.
    pub fn for_sound_buffer(buffer: &SoundBuffer) -> Self {
        let channels = match buffer.is_single_channel() {
            true => Self::DUAL_CHANNEL_OGG,
            false => Self::STEREO_OGG,
        };
        match buffer.is_stream_compressed() {
            true => channels | Self::STREAM_OGG,
            false => channels,
        }
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ManifestFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Display for ManifestFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
