//! Base types for the structure of a tag archive.

use std::io::{self, Cursor, Read, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Format version written by this library
pub const FORMAT_VERSION: u8 = 1;

/// Name length byte announcing a 4-byte length
pub const EXTENDED_NAME_LENGTH: u8 = 254;

/// Name length byte ending the directory
pub const END_OF_DIRECTORY: u8 = 255;

/// Tag archive header
///
/// Always starts with "TPAK", followed by the version.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"TPAK", big)]
pub struct ArchiveHeader {
    /// Version of the format
    pub version: u8,
}

impl ArchiveHeader {
    /// Encoded size of the header in bytes
    pub const SIZE: usize = 5;

    /// Read and validate a header from a stream that may not support seeking
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; Self::SIZE];
        reader.read_exact(&mut raw)?;

        let header = ArchiveHeader::read(&mut Cursor::new(raw))?;
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

impl Default for ArchiveHeader {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
        }
    }
}

/// One entry of the archive directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Name of the entry
    pub name: String,

    /// Size of the payload in bytes
    pub size: u32,
}

impl DirectoryEntry {
    /// Read the next entry, or `None` at the end of the directory
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let length = match reader.read_u8()? {
            END_OF_DIRECTORY => return Ok(None),
            EXTENDED_NAME_LENGTH => reader.read_u32::<BigEndian>()? as usize,
            short => short as usize,
        };

        let mut name = Vec::new();
        reader.by_ref().take(length as u64).read_to_end(&mut name)?;
        if name.len() != length {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        Ok(Some(DirectoryEntry {
            name: String::from_utf8(name)?,
            size: reader.read_u32::<BigEndian>()?,
        }))
    }

    /// Write this entry
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let length = self.name.len();
        match u8::try_from(length) {
            Ok(short) if short < EXTENDED_NAME_LENGTH => writer.write_u8(short)?,
            _ => {
                let long = u32::try_from(length).map_err(|_| Error::EntryTooLarge {
                    name: self.name.clone(),
                    size: length,
                })?;
                writer.write_u8(EXTENDED_NAME_LENGTH)?;
                writer.write_u32::<BigEndian>(long)?;
            }
        }
        writer.write_all(self.name.as_bytes())?;
        writer.write_u32::<BigEndian>(self.size)?;
        Ok(())
    }

    /// Write the byte ending the directory
    pub fn write_end<W: Write>(writer: &mut W) -> Result<()> {
        writer.write_u8(END_OF_DIRECTORY)?;
        Ok(())
    }
}
