use crate::error::{Error, ErrorKind};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Fixed key the client uses for every encrypted file not covered by a droid key.
pub(crate) const DEFAULT_KEY: [u32; 4] = [0x6C0A_5452, 0x0382_7D0F, 0x3A17_0B92, 0x16DB_7FC2];

const KEY_DIGITS: usize = 32;
const WORD_DIGITS: usize = 8;

/// Caller-supplied key for secure preloader content.
///
/// Parsed from 32 hexadecimal digits, each group of eight read as one
/// big-endian word.
///
/// ```
/// use gum_cipher::DroidKey;
///
/// let key: DroidKey = "31415926535897932384626433832795".parse().unwrap();
/// assert_eq!(key.words(), [0x31415926, 0x53589793, 0x23846264, 0x33832795]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DroidKey([u32; 4]);

impl DroidKey {
    pub const fn new(words: [u32; 4]) -> Self {
        Self(words)
    }

    pub fn words(&self) -> [u32; 4] {
        self.0
    }
}

impl FromStr for DroidKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Length is checked in bytes: anything non-ASCII fails the hex check anyway.
        if s.len() != KEY_DIGITS || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            exn::bail!(ErrorKind::InvalidKey(s.to_string()));
        }
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(s.as_bytes().chunks(WORD_DIGITS)) {
            // Already validated as ASCII hex digits.
            let digits = std::str::from_utf8(chunk).map_err(|_| ErrorKind::InvalidKey(s.to_string()))?;
            *word = u32::from_str_radix(digits, 16).map_err(|_| ErrorKind::InvalidKey(s.to_string()))?;
        }
        Ok(Self(words))
    }
}

// Keep key material out of logs.
impl Debug for DroidKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("DroidKey(..)")
    }
}
