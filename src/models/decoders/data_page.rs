//! Data page value decoding: level-stream stripping, encoding
//! dispatch, dictionary index resolution.

use crate::constants::LEVEL_LEN_PREFIX;
use crate::error::ReadError;
use crate::format::page::PageHeader;
use crate::format::types::{Encoding, PageType};
use crate::models::decoders::hybrid::decode_hybrid;
use crate::traits::aggregator::Aggregator;
use crate::traits::plain_value::PlainValue;

/// Decode one data page payload, resolving dictionary indices and
/// feeding `(value, repeats)` events to the aggregator.
///
/// `has_rep_levels` / `has_def_levels` come from the leaf's position
/// in the schema tree and decide which level blocks precede the value
/// section. Level values themselves are skipped, not decoded.
pub fn decode_data_page<V, A>(
    header: &PageHeader,
    payload: &[u8],
    has_rep_levels: bool,
    has_def_levels: bool,
    dict: &[V],
    aggregator: &mut A,
) -> Result<(), ReadError>
where
    V: PlainValue,
    A: Aggregator<V>,
{
    let data_header = match header.type_ {
        PageType::DataPage => header.data_page_header.as_ref().ok_or_else(|| {
            ReadError::Format("data page is missing its data page header".into())
        })?,
        PageType::DataPageV2 => {
            return Err(ReadError::Unsupported(
                "v2 data pages are not supported".into(),
            ))
        }
        other => {
            return Err(ReadError::Format(format!(
                "unexpected {other} page in the data page region"
            )))
        }
    };

    if data_header.repetition_level_encoding != Encoding::Rle {
        return Err(ReadError::Unsupported(format!(
            "unsupported repetition level encoding: {}",
            data_header.repetition_level_encoding
        )));
    }
    if data_header.definition_level_encoding != Encoding::Rle {
        return Err(ReadError::Unsupported(format!(
            "unsupported definition level encoding: {}",
            data_header.definition_level_encoding
        )));
    }

    let mut data = payload;
    if has_rep_levels {
        data = skip_level_block(data)?;
    }
    if has_def_levels {
        data = skip_level_block(data)?;
    }

    match data_header.encoding {
        Encoding::RleDictionary => {
            let (&bit_width, stream) = data.split_first().ok_or_else(|| {
                ReadError::Format("data page is missing the dictionary bit width".into())
            })?;
            if bit_width > 32 {
                return Err(ReadError::Format(format!(
                    "invalid dictionary bit width {bit_width}"
                )));
            }
            decode_hybrid(stream, u32::from(bit_width), &mut |index, repeats| {
                let value = dict.get(index as usize).copied().ok_or_else(|| {
                    ReadError::Format(format!(
                        "dictionary index {index} out of range ({} entries)",
                        dict.len()
                    ))
                })?;
                aggregator.aggregate(value, repeats);
                Ok(())
            })
        }
        other => Err(ReadError::Unsupported(format!(
            "unsupported page encoding: {other}"
        ))),
    }
}

/// Skip one length-prefixed level block: a u32 LE byte length followed
/// by that many level bytes.
fn skip_level_block(data: &[u8]) -> Result<&[u8], ReadError> {
    if data.len() < LEVEL_LEN_PREFIX {
        return Err(ReadError::Format(
            "level block length prefix is truncated".into(),
        ));
    }
    let len = u32::from_le_bytes(data[..LEVEL_LEN_PREFIX].try_into().unwrap()) as usize;
    data.get(LEVEL_LEN_PREFIX + len..).ok_or_else(|| {
        ReadError::Format(format!(
            "level block of {len} bytes exceeds the page payload"
        ))
    })
}
