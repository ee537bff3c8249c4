//! Base types for the structure of a binary tag document.

use std::io::{self, Cursor, Read, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tagpak_tree::TagValue;

use crate::compression::CompressionMethod;
use crate::error::{Error, Result};

/// Format version written by this library
pub const FORMAT_VERSION: u8 = 1;

/// Key reference byte announcing an inline key
pub const ESCAPE_ALIAS: u8 = 0xFF;

/// Compact length byte announcing a 4-byte length
pub const EXTENDED_LENGTH: u8 = 254;

/// Binary tag document header
///
/// Always starts with "TAGT", then the version and the compression byte.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"TAGT", big)]
pub struct TagHeader {
    /// Version of the format
    pub version: u8,

    /// How the dictionary and body are stored
    #[br(map = |flag: i8| CompressionMethod::from(flag))]
    #[bw(map = |method: &CompressionMethod| i8::from(*method))]
    pub compression: CompressionMethod,
}

impl TagHeader {
    /// Encoded size of the header in bytes
    pub const SIZE: usize = 6;

    /// Read and validate a header from a stream that may not support seeking
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; Self::SIZE];
        reader.read_exact(&mut raw)?;

        let header = TagHeader::read(&mut Cursor::new(raw))?;
        if header.version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(header.version));
        }
        Ok(header)
    }

    /// Write the header to a stream that may not support seeking
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut raw = Cursor::new(Vec::with_capacity(Self::SIZE));
        self.write(&mut raw)?;
        writer.write_all(raw.get_ref())?;
        Ok(())
    }
}

impl Default for TagHeader {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            compression: CompressionMethod::None,
        }
    }
}

/// The leading byte of every body record
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    StructureBegin = 0,
    StructureTerminate = 1,
    StructureEmpty = 2,
    ListBegin = 3,
    ListTerminate = 4,
    ListEmpty = 5,
    Bool = 6,
    Byte = 7,
    ByteArray = 8,
    Int16 = 9,
    Int32 = 10,
    Int64 = 11,
    Float32 = 12,
    Float64 = 13,
    String = 14,
}

impl RecordType {
    /// The record type used to store `value`
    pub fn for_value(value: &TagValue) -> Self {
        match value {
            TagValue::Bool(_) => RecordType::Bool,
            TagValue::Byte(_) => RecordType::Byte,
            TagValue::ByteArray(_) => RecordType::ByteArray,
            TagValue::Int16(_) => RecordType::Int16,
            TagValue::Int32(_) => RecordType::Int32,
            TagValue::Int64(_) => RecordType::Int64,
            TagValue::Float32(_) => RecordType::Float32,
            TagValue::Float64(_) => RecordType::Float64,
            TagValue::String(_) => RecordType::String,
            TagValue::Structure(_) => RecordType::StructureBegin,
            TagValue::List(_) => RecordType::ListBegin,
        }
    }
}

impl TryFrom<u8> for RecordType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => RecordType::StructureBegin,
            1 => RecordType::StructureTerminate,
            2 => RecordType::StructureEmpty,
            3 => RecordType::ListBegin,
            4 => RecordType::ListTerminate,
            5 => RecordType::ListEmpty,
            6 => RecordType::Bool,
            7 => RecordType::Byte,
            8 => RecordType::ByteArray,
            9 => RecordType::Int16,
            10 => RecordType::Int32,
            11 => RecordType::Int64,
            12 => RecordType::Float32,
            13 => RecordType::Float64,
            14 => RecordType::String,
            _ => return Err(Error::UnknownRecordType(value)),
        })
    }
}

/// Write a compact length: one byte below [`EXTENDED_LENGTH`], otherwise the marker and 4 bytes
pub fn write_compact_len<W: Write>(writer: &mut W, length: usize) -> io::Result<()> {
    match u8::try_from(length) {
        Ok(short) if short < EXTENDED_LENGTH => writer.write_u8(short),
        _ => {
            let long = u32::try_from(length).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "length exceeds 4 GiB")
            })?;
            writer.write_u8(EXTENDED_LENGTH)?;
            writer.write_u32::<BigEndian>(long)
        }
    }
}

/// Read a compact length written by [`write_compact_len`]
pub fn read_compact_len<R: Read>(reader: &mut R) -> Result<usize> {
    match reader.read_u8()? {
        EXTENDED_LENGTH => Ok(reader.read_u32::<BigEndian>()? as usize),
        ESCAPE_ALIAS => Err(Error::InvalidLength(ESCAPE_ALIAS)),
        short => Ok(short as usize),
    }
}

/// Read exactly `length` bytes without trusting `length` for the allocation
pub fn read_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader.by_ref().take(length as u64).read_to_end(&mut buffer)?;
    if buffer.len() != length {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buffer)
}

/// Read exactly `length` bytes of UTF-8
pub fn read_utf8<R: Read>(reader: &mut R, length: usize) -> Result<String> {
    Ok(String::from_utf8(read_bytes(reader, length)?)?)
}
