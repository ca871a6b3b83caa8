//! Page header structures from `parquet.thrift`.
//!
//! A `PageHeader` immediately precedes every page payload inside a
//! column chunk. It is a tagged union over the page kinds; exactly one
//! of the kind-specific headers is present for the kinds this reader
//! understands.

use thrift::protocol::{
    field_id, verify_required_field_exists, TFieldIdentifier, TInputProtocol, TOutputProtocol,
    TSerializable, TStructIdentifier, TType,
};

use crate::format::types::{Encoding, PageType};

#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub type_: PageType,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    pub data_page_header: Option<DataPageHeader>,
    pub dictionary_page_header: Option<DictionaryPageHeader>,
    pub data_page_header_v2: Option<DataPageHeaderV2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataPageHeader {
    /// Values in the page, including nulls and repeated values.
    pub num_values: i32,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryPageHeader {
    pub num_values: i32,
    pub encoding: Encoding,
    pub is_sorted: Option<bool>,
}

/// Parsed for structural inspection only; the value decoder rejects
/// v2 data pages.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPageHeaderV2 {
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: Encoding,
    pub definition_levels_byte_length: i32,
    pub repetition_levels_byte_length: i32,
    pub is_compressed: bool,
}

impl TSerializable for PageHeader {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<PageHeader> {
        i_prot.read_struct_begin()?;
        let mut type_: Option<PageType> = None;
        let mut uncompressed_page_size: Option<i32> = None;
        let mut compressed_page_size: Option<i32> = None;
        let mut data_page_header: Option<DataPageHeader> = None;
        let mut dictionary_page_header: Option<DictionaryPageHeader> = None;
        let mut data_page_header_v2: Option<DataPageHeaderV2> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => type_ = Some(PageType::read_i32(i_prot.read_i32()?)?),
                2 => uncompressed_page_size = Some(i_prot.read_i32()?),
                3 => compressed_page_size = Some(i_prot.read_i32()?),
                5 => data_page_header = Some(DataPageHeader::read_from_in_protocol(i_prot)?),
                7 => {
                    dictionary_page_header =
                        Some(DictionaryPageHeader::read_from_in_protocol(i_prot)?)
                }
                8 => data_page_header_v2 = Some(DataPageHeaderV2::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageHeader.type", &type_)?;
        verify_required_field_exists(
            "PageHeader.uncompressed_page_size",
            &uncompressed_page_size,
        )?;
        verify_required_field_exists("PageHeader.compressed_page_size", &compressed_page_size)?;
        Ok(PageHeader {
            type_: type_.expect("required field verified above"),
            uncompressed_page_size: uncompressed_page_size
                .expect("required field verified above"),
            compressed_page_size: compressed_page_size.expect("required field verified above"),
            data_page_header,
            dictionary_page_header,
            data_page_header_v2,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("type", TType::I32, 1))?;
        o_prot.write_i32(self.type_.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "uncompressed_page_size",
            TType::I32,
            2,
        ))?;
        o_prot.write_i32(self.uncompressed_page_size)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "compressed_page_size",
            TType::I32,
            3,
        ))?;
        o_prot.write_i32(self.compressed_page_size)?;
        o_prot.write_field_end()?;
        if let Some(header) = &self.data_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "data_page_header",
                TType::Struct,
                5,
            ))?;
            header.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(header) = &self.dictionary_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "dictionary_page_header",
                TType::Struct,
                7,
            ))?;
            header.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        if let Some(header) = &self.data_page_header_v2 {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "data_page_header_v2",
                TType::Struct,
                8,
            ))?;
            header.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for DataPageHeader {
    fn read_from_in_protocol(i_prot: &mut dyn TInputProtocol) -> thrift::Result<DataPageHeader> {
        i_prot.read_struct_begin()?;
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_level_encoding: Option<Encoding> = None;
        let mut repetition_level_encoding: Option<Encoding> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => num_values = Some(i_prot.read_i32()?),
                2 => encoding = Some(Encoding::read_i32(i_prot.read_i32()?)?),
                3 => definition_level_encoding = Some(Encoding::read_i32(i_prot.read_i32()?)?),
                4 => repetition_level_encoding = Some(Encoding::read_i32(i_prot.read_i32()?)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeader.num_values", &num_values)?;
        verify_required_field_exists("DataPageHeader.encoding", &encoding)?;
        verify_required_field_exists(
            "DataPageHeader.definition_level_encoding",
            &definition_level_encoding,
        )?;
        verify_required_field_exists(
            "DataPageHeader.repetition_level_encoding",
            &repetition_level_encoding,
        )?;
        Ok(DataPageHeader {
            num_values: num_values.expect("required field verified above"),
            encoding: encoding.expect("required field verified above"),
            definition_level_encoding: definition_level_encoding
                .expect("required field verified above"),
            repetition_level_encoding: repetition_level_encoding
                .expect("required field verified above"),
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I32, 1))?;
        o_prot.write_i32(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encoding", TType::I32, 2))?;
        o_prot.write_i32(self.encoding.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "definition_level_encoding",
            TType::I32,
            3,
        ))?;
        o_prot.write_i32(self.definition_level_encoding.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "repetition_level_encoding",
            TType::I32,
            4,
        ))?;
        o_prot.write_i32(self.repetition_level_encoding.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for DictionaryPageHeader {
    fn read_from_in_protocol(
        i_prot: &mut dyn TInputProtocol,
    ) -> thrift::Result<DictionaryPageHeader> {
        i_prot.read_struct_begin()?;
        let mut num_values: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut is_sorted: Option<bool> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => num_values = Some(i_prot.read_i32()?),
                2 => encoding = Some(Encoding::read_i32(i_prot.read_i32()?)?),
                3 => is_sorted = Some(i_prot.read_bool()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DictionaryPageHeader.num_values", &num_values)?;
        verify_required_field_exists("DictionaryPageHeader.encoding", &encoding)?;
        Ok(DictionaryPageHeader {
            num_values: num_values.expect("required field verified above"),
            encoding: encoding.expect("required field verified above"),
            is_sorted,
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DictionaryPageHeader"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I32, 1))?;
        o_prot.write_i32(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encoding", TType::I32, 2))?;
        o_prot.write_i32(self.encoding.as_i32())?;
        o_prot.write_field_end()?;
        if let Some(is_sorted) = self.is_sorted {
            o_prot.write_field_begin(&TFieldIdentifier::new("is_sorted", TType::Bool, 3))?;
            o_prot.write_bool(is_sorted)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

impl TSerializable for DataPageHeaderV2 {
    fn read_from_in_protocol(
        i_prot: &mut dyn TInputProtocol,
    ) -> thrift::Result<DataPageHeaderV2> {
        i_prot.read_struct_begin()?;
        let mut num_values: Option<i32> = None;
        let mut num_nulls: Option<i32> = None;
        let mut num_rows: Option<i32> = None;
        let mut encoding: Option<Encoding> = None;
        let mut definition_levels_byte_length: Option<i32> = None;
        let mut repetition_levels_byte_length: Option<i32> = None;
        let mut is_compressed: Option<bool> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_id(&field_ident)? {
                1 => num_values = Some(i_prot.read_i32()?),
                2 => num_nulls = Some(i_prot.read_i32()?),
                3 => num_rows = Some(i_prot.read_i32()?),
                4 => encoding = Some(Encoding::read_i32(i_prot.read_i32()?)?),
                5 => definition_levels_byte_length = Some(i_prot.read_i32()?),
                6 => repetition_levels_byte_length = Some(i_prot.read_i32()?),
                7 => is_compressed = Some(i_prot.read_bool()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeaderV2.num_values", &num_values)?;
        verify_required_field_exists("DataPageHeaderV2.encoding", &encoding)?;
        Ok(DataPageHeaderV2 {
            num_values: num_values.expect("required field verified above"),
            num_nulls: num_nulls.unwrap_or(0),
            num_rows: num_rows.unwrap_or(0),
            encoding: encoding.expect("required field verified above"),
            definition_levels_byte_length: definition_levels_byte_length.unwrap_or(0),
            repetition_levels_byte_length: repetition_levels_byte_length.unwrap_or(0),
            is_compressed: is_compressed.unwrap_or(true),
        })
    }

    fn write_to_out_protocol(&self, o_prot: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeaderV2"))?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_values", TType::I32, 1))?;
        o_prot.write_i32(self.num_values)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_nulls", TType::I32, 2))?;
        o_prot.write_i32(self.num_nulls)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("num_rows", TType::I32, 3))?;
        o_prot.write_i32(self.num_rows)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("encoding", TType::I32, 4))?;
        o_prot.write_i32(self.encoding.as_i32())?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "definition_levels_byte_length",
            TType::I32,
            5,
        ))?;
        o_prot.write_i32(self.definition_levels_byte_length)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new(
            "repetition_levels_byte_length",
            TType::I32,
            6,
        ))?;
        o_prot.write_i32(self.repetition_levels_byte_length)?;
        o_prot.write_field_end()?;
        o_prot.write_field_begin(&TFieldIdentifier::new("is_compressed", TType::Bool, 7))?;
        o_prot.write_bool(self.is_compressed)?;
        o_prot.write_field_end()?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}
