//! Compression Operations

use crate::Gzip;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use flate2::{Compression as GzCompression, GzBuilder, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use tracing::instrument;

// Artifacts are generated once and fetched by every client; spend the CPU.
const GZIP_LEVEL: GzCompression = GzCompression::best();
// RFC 1952 "unknown" operating system. Keeps the header byte stable across
// the platforms a staging tree might be generated on.
const GZIP_OS_UNKNOWN: u8 = 255;

impl Gzip {
    /// Compress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use gum_compress::Gzip;
    ///
    /// let data = b"Hello, world!";
    /// let compressed = Gzip.compress(data).unwrap();
    /// assert_eq!(Gzip.decompress(&compressed).unwrap(), data);
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.compress_into(input, &mut output)?;
        Ok(output)
    }

    /// Decompress a byte slice in memory.
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decompress_into(input, &mut output)?;
        Ok(output)
    }

    #[instrument(skip(self, input, output), fields(input_size = input.len(), output_size))]
    pub fn compress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let mut encoder = self.wrap_writer(&mut *output);
        encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
        encoder.finish().or_raise(|| ErrorKind::Io)?;
        let size = output.len();
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    #[instrument(skip(self, input, output), fields(input_size = input.len(), output_size))]
    pub fn decompress_into(&self, input: &[u8], output: &mut Vec<u8>) -> Result<usize> {
        let mut decoder = GzDecoder::new(input);
        let size = decoder.read_to_end(output).or_raise(|| ErrorKind::InvalidData)?;
        tracing::Span::current().record("output_size", size);
        Ok(size)
    }

    /// Wrap a writer with the deterministic gzip encoding layer.
    ///
    /// The returned encoder must be [`finish`](GzEncoder::finish)ed to write
    /// the gzip trailer; dropping it also finishes, but swallows any error.
    pub fn wrap_writer<W: Write>(&self, writer: W) -> GzEncoder<W> {
        GzBuilder::new().mtime(0).operating_system(GZIP_OS_UNKNOWN).write(writer, GZIP_LEVEL)
    }

    /// Compress from a reader to a writer, returning uncompressed bytes consumed.
    ///
    /// The gzip trailer is written before returning, so the writer holds a
    /// complete member once this succeeds (flushing any buffering the writer
    /// itself does is the caller's job).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use gum_compress::Gzip;
    ///
    /// let input = Cursor::new(b"Hello, world!");
    /// let mut output = Vec::new();
    /// let bytes = Gzip.compress_stream(input, &mut output).unwrap();
    /// assert_eq!(bytes, 13);
    /// ```
    pub fn compress_stream<R: Read, W: Write>(&self, mut reader: R, writer: W) -> Result<u64> {
        let mut encoder = self.wrap_writer(writer);
        let bytes = std::io::copy(&mut reader, &mut encoder).or_raise(|| ErrorKind::Io)?;
        encoder.finish().or_raise(|| ErrorKind::Io)?;
        Ok(bytes)
    }
}
