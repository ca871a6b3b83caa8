//! RLE / bit-packed hybrid decoding.
//!
//! Parquet encodes levels and dictionary indices as a sequence of
//! runs. Each run starts with a ULEB128 header whose low bit selects
//! the form: `0` is a run-length run (one value, a repeat count), `1`
//! is a bit-packed block of `8 * (header >> 1)` values. The decoder
//! emits `(value, repeats)` events in stream order; it performs no I/O
//! and no allocation.

use crate::error::ReadError;

/// Read one unsigned LEB128 value, returning it with the remaining
/// input. Run headers are small; anything longer than 10 bytes is
/// rejected rather than silently wrapped.
pub fn read_uleb128(data: &[u8]) -> Result<(u64, &[u8]), ReadError> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate() {
        if i >= 10 {
            return Err(ReadError::Format(
                "ULEB128 value is longer than 10 bytes".into(),
            ));
        }
        value |= u64::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, &data[i + 1..]));
        }
    }
    Err(ReadError::Format("truncated ULEB128 value".into()))
}

/// Decode a hybrid stream of unsigned integers of `bit_width` bits,
/// invoking `emit(value, repeats)` for every run event until the input
/// is exhausted.
///
/// `bit_width` 0 is legal (a dictionary of one element): both run
/// forms then produce zeros without consuming value bytes.
pub fn decode_hybrid<F>(data: &[u8], bit_width: u32, emit: &mut F) -> Result<(), ReadError>
where
    F: FnMut(u32, u64) -> Result<(), ReadError>,
{
    debug_assert!(bit_width <= 32);
    let mask = if bit_width == 0 {
        0
    } else {
        (1u64 << bit_width) - 1
    };
    let byte_width = ((bit_width + 7) / 8) as usize;

    let mut data = data;
    while !data.is_empty() {
        let (header, rest) = read_uleb128(data)?;
        data = rest;

        if header & 1 == 0 {
            // RLE run: one little-endian value, `header >> 1` repeats.
            let repeats = header >> 1;
            if data.len() < byte_width {
                return Err(ReadError::Format("truncated RLE run value".into()));
            }
            let mut value = 0u32;
            for (i, &byte) in data[..byte_width].iter().enumerate() {
                value |= u32::from(byte) << (i * 8);
            }
            data = &data[byte_width..];
            emit(value, repeats)?;
        } else {
            // Bit-packed run: groups of 8 values, LSB-first through a
            // rolling buffer. 64 bits cover the worst case of 7 stale
            // bits plus a full 32-bit value.
            let mut remaining = (header >> 1) * 8;
            if bit_width == 0 {
                if remaining > 0 {
                    emit(0, remaining)?;
                }
                continue;
            }
            let mut buffer = 0u64;
            let mut buffered = 0u32;
            while remaining > 0 {
                let (&byte, rest) = data
                    .split_first()
                    .ok_or_else(|| ReadError::Format("truncated bit-packed run".into()))?;
                data = rest;
                buffer |= u64::from(byte) << buffered;
                buffered += 8;
                // The remaining-counter must tick per emitted value,
                // not per byte read.
                while buffered >= bit_width && remaining > 0 {
                    emit((buffer & mask) as u32, 1)?;
                    buffer >>= bit_width;
                    buffered -= bit_width;
                    remaining -= 1;
                }
            }
        }
    }
    Ok(())
}
