//! Compression utilities for parquet pages.
//! - Zstd via the zstd crate.

use crate::error::ReadError;

/// Page compression codecs the reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Zstd,
}

/// Compress a buffer according to the requested codec.
/// Always returns a new Vec<u8> (per Parquet page convention).
///
/// The reader itself never compresses; this is the counterpart used by
/// fixture builders when assembling page payloads.
pub fn compress(input: &[u8], codec: Compression) -> Result<Vec<u8>, ReadError> {
    match codec {
        Compression::None => Ok(input.to_vec()),
        // Level 1 is fastest, with good compression.
        Compression::Zstd => zstd::stream::encode_all(input, 1).map_err(ReadError::Io),
    }
}

/// Decompress a buffer according to the codec.
/// Returns a new Vec<u8> containing the decompressed data.
///
/// # Errors
/// Returns [`ReadError::Format`] when the payload is not valid for the
/// codec.
pub fn decompress(input: &[u8], codec: Compression) -> Result<Vec<u8>, ReadError> {
    match codec {
        Compression::None => Ok(input.to_vec()),
        Compression::Zstd => zstd::stream::decode_all(input)
            .map_err(|e| ReadError::Format(format!("zstd decompression failed: {e}"))),
    }
}
