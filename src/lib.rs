//! # pqscan
//!
//! Minimal reader for the Parquet columnar format.
//!
//! Two capabilities over a seekable byte source:
//! * [`inspect`](models::readers::metadata_reader::inspect) — decode
//!   the footer into a [`MetaData`] tree describing the schema, row
//!   groups, column chunks and pages;
//! * [`ParquetReader::sum_int64`] — stream one integer column through
//!   the page / dictionary decode pipeline into a running sum, without
//!   materializing rows.
//!
//! Scope: classic v1 data pages with RLE-encoded levels, PLAIN
//! dictionary pages, RLE_DICTIONARY data pages, UNCOMPRESSED or ZSTD
//! page compression.

pub mod traits {
    pub mod aggregator;
    pub mod plain_value;
}

pub mod format {
    pub mod metadata;
    pub mod page;
    pub mod types;
}

pub mod models {
    pub mod aggregators;
    pub mod cursor;
    pub mod metadata;

    pub mod decoders {
        pub mod data_page;
        pub mod hybrid;
        pub mod plain;
    }
    pub mod readers {
        pub mod column_reader;
        pub mod metadata_reader;
        pub mod page_stream;
    }
}

pub mod cancel;
pub mod compression;
pub mod constants;
pub mod error;

pub use crate::cancel::CancelToken;
pub use crate::error::ReadError;
pub use crate::models::metadata::MetaData;
pub use crate::models::readers::column_reader::ParquetReader;
