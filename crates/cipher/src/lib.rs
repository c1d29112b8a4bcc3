//! Encrypted-stream container read by the game client.
//!
//! Age descriptors, font indexes and secure preloader content are shipped
//! inside a small container: a 12-byte magic naming the scheme, the
//! little-endian plaintext length, then the zero-padded plaintext encrypted
//! in 8-byte blocks.
//!
//! Two schemes are supported:
//!
//! - [`Cipher::Default`]: XTEA with the key baked into every client.
//! - [`Cipher::Droid`]: XXTEA with a caller-derived [`DroidKey`], used for
//!   the secure preloader so scripts and state descriptions can only be read
//!   by clients holding the same key.

pub mod error;
mod key;
mod stream;
mod tea;

pub use crate::key::DroidKey;

const DEFAULT_MAGIC: &[u8; 12] = b"whatdoyousee";
const DROID_MAGIC: &[u8; 12] = b"BriceIsSmart";

/// Encryption scheme plus key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cipher {
    /// XTEA with the fixed client key.
    #[default]
    Default,
    /// XXTEA with a caller-derived key.
    Droid(DroidKey),
}

impl Cipher {
    /// Magic bytes opening a container written with this scheme.
    pub fn magic(&self) -> &'static [u8; 12] {
        match self {
            Cipher::Default => DEFAULT_MAGIC,
            Cipher::Droid(_) => DROID_MAGIC,
        }
    }

    /// Returns `true` if `bytes` open with either scheme's magic.
    pub fn is_encrypted(bytes: &[u8]) -> bool {
        bytes.starts_with(DEFAULT_MAGIC) || bytes.starts_with(DROID_MAGIC)
    }
}
