//! Parquet enumerations as defined in `parquet.thrift`.
//!
//! The reader acts on a small subset of these, but the full value
//! ranges are decoded so metadata written by arbitrary producers can
//! still be inspected.

use std::fmt;

use serde::{Serialize, Serializer};
use thrift::{ProtocolError, ProtocolErrorKind};

fn unknown_value(what: &str, value: i32) -> thrift::Error {
    thrift::Error::Protocol(ProtocolError::new(
        ProtocolErrorKind::InvalidData,
        format!("unknown {what} value {value}"),
    ))
}

/// Physical storage types for leaf columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    Boolean = 0,
    Int32 = 1,
    Int64 = 2,
    Int96 = 3,
    Float = 4,
    Double = 5,
    ByteArray = 6,
    FixedLenByteArray = 7,
}

impl PhysicalType {
    /// Return the Parquet `i32` type ID corresponding to this physical type.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Convert from a Parquet `i32` type ID. `None` for unknown IDs.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Boolean),
            1 => Some(Self::Int32),
            2 => Some(Self::Int64),
            3 => Some(Self::Int96),
            4 => Some(Self::Float),
            5 => Some(Self::Double),
            6 => Some(Self::ByteArray),
            7 => Some(Self::FixedLenByteArray),
            _ => None,
        }
    }

    pub(crate) fn read_i32(value: i32) -> thrift::Result<Self> {
        Self::from_i32(value).ok_or_else(|| unknown_value("Type", value))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int96 => "INT96",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::ByteArray => "BYTE_ARRAY",
            Self::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PhysicalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Field repetition: 0=REQUIRED, 1=OPTIONAL, 2=REPEATED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
    Required = 0,
    Optional = 1,
    Repeated = 2,
}

impl Repetition {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Required),
            1 => Some(Self::Optional),
            2 => Some(Self::Repeated),
            _ => None,
        }
    }

    pub(crate) fn read_i32(value: i32) -> thrift::Result<Self> {
        Self::from_i32(value).ok_or_else(|| unknown_value("FieldRepetitionType", value))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Optional => "OPTIONAL",
            Self::Repeated => "REPEATED",
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Repetition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Parquet page encodings. Only PLAIN dictionary pages and
/// RLE_DICTIONARY data pages (with RLE levels) are decoded; the rest
/// are recognized so they can be named in inspection output and error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain = 0,
    /// Deprecated in favour of RLE_DICTIONARY.
    PlainDictionary = 2,
    /// Run-Length Encoding (used for levels and dictionary indices).
    Rle = 3,
    BitPacked = 4,
    DeltaBinaryPacked = 5,
    DeltaLengthByteArray = 6,
    DeltaByteArray = 7,
    /// Current standard for dictionary-encoded data pages.
    RleDictionary = 8,
    ByteStreamSplit = 9,
}

impl Encoding {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Plain),
            2 => Some(Self::PlainDictionary),
            3 => Some(Self::Rle),
            4 => Some(Self::BitPacked),
            5 => Some(Self::DeltaBinaryPacked),
            6 => Some(Self::DeltaLengthByteArray),
            7 => Some(Self::DeltaByteArray),
            8 => Some(Self::RleDictionary),
            9 => Some(Self::ByteStreamSplit),
            _ => None,
        }
    }

    pub(crate) fn read_i32(value: i32) -> thrift::Result<Self> {
        Self::from_i32(value).ok_or_else(|| unknown_value("Encoding", value))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::PlainDictionary => "PLAIN_DICTIONARY",
            Self::Rle => "RLE",
            Self::BitPacked => "BIT_PACKED",
            Self::DeltaBinaryPacked => "DELTA_BINARY_PACKED",
            Self::DeltaLengthByteArray => "DELTA_LENGTH_BYTE_ARRAY",
            Self::DeltaByteArray => "DELTA_BYTE_ARRAY",
            Self::RleDictionary => "RLE_DICTIONARY",
            Self::ByteStreamSplit => "BYTE_STREAM_SPLIT",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Compression codecs. Only UNCOMPRESSED and ZSTD payloads can be
/// decoded; the rest are inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionCodec {
    Uncompressed = 0,
    Snappy = 1,
    Gzip = 2,
    Lzo = 3,
    Brotli = 4,
    Lz4 = 5,
    Zstd = 6,
    Lz4Raw = 7,
}

impl CompressionCodec {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Uncompressed),
            1 => Some(Self::Snappy),
            2 => Some(Self::Gzip),
            3 => Some(Self::Lzo),
            4 => Some(Self::Brotli),
            5 => Some(Self::Lz4),
            6 => Some(Self::Zstd),
            7 => Some(Self::Lz4Raw),
            _ => None,
        }
    }

    pub(crate) fn read_i32(value: i32) -> thrift::Result<Self> {
        Self::from_i32(value).ok_or_else(|| unknown_value("CompressionCodec", value))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Uncompressed => "UNCOMPRESSED",
            Self::Snappy => "SNAPPY",
            Self::Gzip => "GZIP",
            Self::Lzo => "LZO",
            Self::Brotli => "BROTLI",
            Self::Lz4 => "LZ4",
            Self::Zstd => "ZSTD",
            Self::Lz4Raw => "LZ4_RAW",
        }
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CompressionCodec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Page type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    DataPage = 0,
    IndexPage = 1,
    DictionaryPage = 2,
    DataPageV2 = 3,
}

impl PageType {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::DataPage),
            1 => Some(Self::IndexPage),
            2 => Some(Self::DictionaryPage),
            3 => Some(Self::DataPageV2),
            _ => None,
        }
    }

    pub(crate) fn read_i32(value: i32) -> thrift::Result<Self> {
        Self::from_i32(value).ok_or_else(|| unknown_value("PageType", value))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DataPage => "DATA_PAGE",
            Self::IndexPage => "INDEX_PAGE",
            Self::DictionaryPage => "DICTIONARY_PAGE",
            Self::DataPageV2 => "DATA_PAGE_V2",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
