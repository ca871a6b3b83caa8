//! PLAIN-encoded dictionary page decoding.

use crate::error::ReadError;
use crate::traits::plain_value::PlainValue;

/// Decode a PLAIN dictionary payload of `num_values` fixed-width
/// values. The payload must be consumed exactly.
pub fn decode_plain_dictionary<V: PlainValue>(
    payload: &[u8],
    num_values: usize,
) -> Result<Vec<V>, ReadError> {
    let expected = num_values * V::WIDTH;
    if payload.len() != expected {
        return Err(ReadError::Format(format!(
            "invalid dictionary page length: {} bytes for {} {} values (want {})",
            payload.len(),
            num_values,
            V::PHYSICAL_TYPE,
            expected,
        )));
    }
    let mut dict = Vec::with_capacity(num_values);
    let mut rest = payload;
    for _ in 0..num_values {
        let (value, remaining) = V::decode_plain(rest);
        dict.push(value);
        rest = remaining;
    }
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_int64_entries_in_order() {
        let mut payload = Vec::new();
        for v in [-1i64, 0, 1] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let dict: Vec<i64> = decode_plain_dictionary(&payload, 3).unwrap();
        assert_eq!(dict, vec![-1, 0, 1]);
    }

    #[test]
    fn decodes_int32_entries() {
        let mut payload = Vec::new();
        for v in [3i32, 7] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let dict: Vec<i32> = decode_plain_dictionary(&payload, 2).unwrap();
        assert_eq!(dict, vec![3, 7]);
    }

    #[test]
    fn residual_bytes_are_a_format_error() {
        let payload = [0u8; 12]; // not a multiple of 8
        let err = decode_plain_dictionary::<i64>(&payload, 1).unwrap_err();
        assert!(matches!(err, ReadError::Format(msg) if msg.contains("invalid dictionary page length")));
    }

    #[test]
    fn empty_dictionary_is_legal() {
        let dict: Vec<i64> = decode_plain_dictionary(&[], 0).unwrap();
        assert!(dict.is_empty());
    }
}
