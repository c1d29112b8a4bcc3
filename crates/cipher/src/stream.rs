//! Container encoding and decoding.

use crate::error::{ErrorKind, Result};
use crate::key::DEFAULT_KEY;
use crate::tea::{xtea_decipher, xtea_encipher, xxtea_decipher, xxtea_encipher};
use crate::{Cipher, DROID_MAGIC, DEFAULT_MAGIC, DroidKey};
use exn::ResultExt;
use std::io::Write;
use tracing::instrument;

const MAGIC_SIZE: usize = 12;
const HEADER_SIZE: usize = MAGIC_SIZE + 4;
const BLOCK_SIZE: usize = 8;

impl Cipher {
    /// Encrypt `plain` into a complete container in memory.
    ///
    /// ```
    /// use gum_cipher::Cipher;
    ///
    /// let sealed = Cipher::Default.encrypt(b"Page=Kemo,1");
    /// assert!(Cipher::is_encrypted(&sealed));
    /// assert_eq!(Cipher::decrypt(&sealed, None).unwrap(), b"Page=Kemo,1");
    /// ```
    pub fn encrypt(&self, plain: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(HEADER_SIZE + plain.len().next_multiple_of(BLOCK_SIZE));
        output.extend_from_slice(self.magic());
        output.extend_from_slice(&(plain.len() as u32).to_le_bytes());
        for chunk in plain.chunks(BLOCK_SIZE) {
            let mut bytes = [0u8; BLOCK_SIZE];
            bytes[..chunk.len()].copy_from_slice(chunk);
            let mut block = to_words(&bytes);
            self.encipher(&mut block);
            output.extend_from_slice(&from_words(block));
        }
        output
    }

    /// Encrypt `plain` and write the container to `writer`, returning bytes written.
    #[instrument(skip(self, plain, writer), fields(input_size = plain.len()))]
    pub fn encrypt_to<W: Write>(&self, plain: &[u8], mut writer: W) -> Result<u64> {
        let sealed = self.encrypt(plain);
        writer.write_all(&sealed).or_raise(|| ErrorKind::Io)?;
        writer.flush().or_raise(|| ErrorKind::Io)?;
        Ok(sealed.len() as u64)
    }

    /// Decrypt a container, detecting the scheme from its magic.
    ///
    /// Droid containers need the key; pass `None` when only default-key
    /// content is expected.
    pub fn decrypt(sealed: &[u8], droid: Option<DroidKey>) -> Result<Vec<u8>> {
        if sealed.len() < HEADER_SIZE {
            exn::bail!(ErrorKind::Truncated);
        }
        let (header, payload) = sealed.split_at(HEADER_SIZE);
        let cipher = match &header[..MAGIC_SIZE] {
            m if m == DEFAULT_MAGIC => Cipher::Default,
            m if m == DROID_MAGIC => match droid {
                Some(key) => Cipher::Droid(key),
                None => exn::bail!(ErrorKind::MissingKey),
            },
            _ => exn::bail!(ErrorKind::UnrecognizedFormat),
        };
        let mut size = [0u8; 4];
        size.copy_from_slice(&header[MAGIC_SIZE..]);
        let size = u32::from_le_bytes(size) as usize;
        if payload.len() < size.next_multiple_of(BLOCK_SIZE) || payload.len() % BLOCK_SIZE != 0 {
            exn::bail!(ErrorKind::Truncated);
        }
        let mut plain = Vec::with_capacity(payload.len());
        for chunk in payload.chunks_exact(BLOCK_SIZE) {
            let mut bytes = [0u8; BLOCK_SIZE];
            bytes.copy_from_slice(chunk);
            let mut block = to_words(&bytes);
            cipher.decipher(&mut block);
            plain.extend_from_slice(&from_words(block));
        }
        plain.truncate(size);
        Ok(plain)
    }

    fn encipher(&self, block: &mut [u32; 2]) {
        match self {
            Cipher::Default => xtea_encipher(block, &DEFAULT_KEY),
            Cipher::Droid(key) => xxtea_encipher(block, &key.words()),
        }
    }

    fn decipher(&self, block: &mut [u32; 2]) {
        match self {
            Cipher::Default => xtea_decipher(block, &DEFAULT_KEY),
            Cipher::Droid(key) => xxtea_decipher(block, &key.words()),
        }
    }
}

fn to_words(bytes: &[u8; BLOCK_SIZE]) -> [u32; 2] {
    [
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}

fn from_words(block: [u32; 2]) -> [u8; BLOCK_SIZE] {
    let mut bytes = [0u8; BLOCK_SIZE];
    bytes[..4].copy_from_slice(&block[0].to_le_bytes());
    bytes[4..].copy_from_slice(&block[1].to_le_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DROID: DroidKey = DroidKey::new([0x3141_5926, 0x5358_9793, 0x2384_6264, 0x3383_2795]);

    #[rstest]
    #[case(b"")]
    #[case(b"1234567")]
    #[case(b"12345678")]
    #[case(b"StartDateTime=0000000000\nPage=Kemo,1\n")]
    fn test_default_roundtrip(#[case] plain: &[u8]) {
        let sealed = Cipher::Default.encrypt(plain);
        assert_eq!(sealed.len(), HEADER_SIZE + plain.len().next_multiple_of(BLOCK_SIZE));
        assert_eq!(Cipher::decrypt(&sealed, None).unwrap(), plain);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"xyz")]
    #[case(b"# state description\nSTATEDESC Kemo\n{\n}\n")]
    fn test_droid_roundtrip(#[case] plain: &[u8]) {
        let sealed = Cipher::Droid(DROID).encrypt(plain);
        assert!(sealed.starts_with(b"BriceIsSmart"));
        assert_eq!(Cipher::decrypt(&sealed, Some(DROID)).unwrap(), plain);
    }

    #[test]
    fn test_header_layout() {
        let sealed = Cipher::Default.encrypt(b"0123456789");
        assert_eq!(&sealed[..12], b"whatdoyousee");
        assert_eq!(&sealed[12..16], &10u32.to_le_bytes());
        assert_eq!(sealed.len(), 16 + 16);
    }

    #[test]
    fn test_schemes_differ() {
        let plain = b"same plaintext!!";
        let default = Cipher::Default.encrypt(plain);
        let droid = Cipher::Droid(DROID).encrypt(plain);
        assert_ne!(default[HEADER_SIZE..], droid[HEADER_SIZE..]);
        assert_ne!(&default[HEADER_SIZE..], plain.as_slice());
    }

    #[test]
    fn test_droid_requires_key() {
        let sealed = Cipher::Droid(DROID).encrypt(b"secret");
        assert_eq!(*Cipher::decrypt(&sealed, None).unwrap_err(), ErrorKind::MissingKey);
    }

    #[test]
    fn test_unrecognized() {
        let err = Cipher::decrypt(b"notthedroids\0\0\0\0", None).unwrap_err();
        assert_eq!(*err, ErrorKind::UnrecognizedFormat);
    }

    #[test]
    fn test_truncated() {
        let mut sealed = Cipher::Default.encrypt(b"0123456789");
        sealed.truncate(sealed.len() - 8);
        assert_eq!(*Cipher::decrypt(&sealed, None).unwrap_err(), ErrorKind::Truncated);
        assert_eq!(*Cipher::decrypt(b"whatdoyousee", None).unwrap_err(), ErrorKind::Truncated);
    }

    #[test]
    fn test_encrypt_to_writer() {
        let mut output = Vec::new();
        let written = Cipher::Default.encrypt_to(b"abc", &mut output).unwrap();
        assert_eq!(written, output.len() as u64);
        assert_eq!(output, Cipher::Default.encrypt(b"abc"));
    }
}
