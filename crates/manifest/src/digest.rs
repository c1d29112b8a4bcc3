//! 128-bit content digests, as lowercase hex.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use md5::{Digest, Md5};
use std::fs::File;
use std::path::Path;

pub(crate) fn hex_digest(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// Digest a file's bytes as they are on disk, returning the digest and size.
pub(crate) fn hex_digest_file(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    let mut hasher = Md5::new();
    let size = std::io::copy(&mut file, &mut hasher).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
    Ok((format!("{:x}", hasher.finalize()), size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"", "d41d8cd98f00b204e9800998ecf8427e")]
    #[case(b"abc", "900150983cd24fb0d6963f7d28e17f72")]
    #[case(b"The quick brown fox jumps over the lazy dog", "9e107d9d372bb6826bd81d3542a419d6")]
    fn test_hex_digest(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(hex_digest(input), expected);
    }

    #[test]
    fn test_hex_digest_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(hex_digest_file(&path).unwrap(), ("900150983cd24fb0d6963f7d28e17f72".to_string(), 3));
    }
}
