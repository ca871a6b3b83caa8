//! Fixed-width PLAIN value decoding.

use crate::format::types::PhysicalType;

/// A primitive value stored in Parquet PLAIN encoding as a fixed-width
/// little-endian field. Implemented for the integer types the
/// aggregation entry points accept.
pub trait PlainValue: Copy {
    /// Physical type tag a leaf must carry for this value type.
    const PHYSICAL_TYPE: PhysicalType;
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decode one value from the head of `data`, returning the value
    /// and the remaining slice. Callers guarantee at least
    /// [`WIDTH`](Self::WIDTH) bytes.
    fn decode_plain(data: &[u8]) -> (Self, &[u8]);
}

impl PlainValue for i32 {
    const PHYSICAL_TYPE: PhysicalType = PhysicalType::Int32;
    const WIDTH: usize = 4;

    fn decode_plain(data: &[u8]) -> (Self, &[u8]) {
        let (head, rest) = data.split_at(Self::WIDTH);
        (i32::from_le_bytes(head.try_into().unwrap()), rest)
    }
}

impl PlainValue for i64 {
    const PHYSICAL_TYPE: PhysicalType = PhysicalType::Int64;
    const WIDTH: usize = 8;

    fn decode_plain(data: &[u8]) -> (Self, &[u8]) {
        let (head, rest) = data.split_at(Self::WIDTH);
        (i64::from_le_bytes(head.try_into().unwrap()), rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_returns_value_and_rest() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-5i64).to_le_bytes());
        buf.extend_from_slice(&7i64.to_le_bytes());
        let (first, rest) = i64::decode_plain(&buf);
        assert_eq!(first, -5);
        let (second, rest) = i64::decode_plain(rest);
        assert_eq!(second, 7);
        assert!(rest.is_empty());

        let buf = (-1i32).to_le_bytes();
        let (value, rest) = i32::decode_plain(&buf);
        assert_eq!(value, -1);
        assert!(rest.is_empty());
    }
}
