//! Types for reading binary tag documents
//!

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;
use tagpak_tree::{error::VisitError, TagEvent, TagReader, TagValue};
use tracing::{debug, instrument, trace};

use crate::compression::{CompressionMethod, TagBlockReader};
use crate::dictionary::KeyDictionary;
use crate::error::{Error, Result};
use crate::types::{read_bytes, read_compact_len, read_utf8, RecordType, TagHeader, ESCAPE_ALIAS};

/// Deepest nesting of structures and lists a document may use
///
/// Every list and every structure, the root included, counts as one level.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Structure,
    List,
}

/// Binary tag document reader
///
/// Implements [`TagReader`]; drive it with [`tagpak_tree::Structure::read_from`], or use
/// [`crate::decode`].
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn print_root_keys(reader: impl Read) -> tagpak_binary::Result<()> {
///     let mut reader = tagpak_binary::BinaryReader::new(reader)?;
///     let root = tagpak_tree::Structure::read_from(&mut reader)?;
///
///     for key in root.keys() {
///         println!("{key}");
///     }
///
///     Ok(())
/// }
/// ```
pub struct BinaryReader<R: Read> {
    block: TagBlockReader<R>,
    header: TagHeader,
    dictionary: KeyDictionary,
    scopes: Vec<Scope>,
}

impl<R: Read> BinaryReader<R> {
    /// Read the header of a document and prepare to read its contents
    ///
    /// Fails when the magic or version do not match.
    pub fn new(mut reader: R) -> Result<BinaryReader<R>> {
        let header = TagHeader::read_from(&mut reader)?;
        Ok(BinaryReader {
            block: TagBlockReader::new(reader, header.compression)?,
            header,
            dictionary: KeyDictionary::new(),
            scopes: Vec::new(),
        })
    }

    /// Returns how the document was compressed
    pub fn compression(&self) -> CompressionMethod {
        self.header.compression
    }

    /// The dictionary of the document, available after [`TagReader::begin`]
    pub fn dictionary(&self) -> &KeyDictionary {
        &self.dictionary
    }

    /// Unwrap and return the inner reader object
    ///
    /// For compressed documents the position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.block.into_inner()
    }

    fn read_key(&mut self) -> Result<String> {
        match self.block.read_u8()? {
            ESCAPE_ALIAS => {
                let length = read_compact_len(&mut self.block)?;
                read_utf8(&mut self.block, length)
            }
            alias => self
                .dictionary
                .resolve(alias)
                .map(str::to_owned)
                .ok_or(Error::UnknownKeyAlias(alias)),
        }
    }

    /// The root is the only record without a key
    fn read_optional_key(&mut self) -> Result<Option<String>> {
        if self.scopes.is_empty() {
            Ok(None)
        } else {
            self.read_key().map(Some)
        }
    }

    fn read_sized(&mut self) -> Result<Vec<u8>> {
        let length = self.block.read_u32::<BigEndian>()? as usize;
        read_bytes(&mut self.block, length)
    }

    fn read_scalar(&mut self, record: RecordType) -> Result<TagValue> {
        Ok(match record {
            RecordType::Bool => TagValue::Bool(self.block.read_u8()? != 0),
            RecordType::Byte => TagValue::Byte(self.block.read_i8()?),
            RecordType::ByteArray => TagValue::ByteArray(self.read_sized()?),
            RecordType::Int16 => TagValue::Int16(self.block.read_i16::<BigEndian>()?),
            RecordType::Int32 => TagValue::Int32(self.block.read_i32::<BigEndian>()?),
            RecordType::Int64 => TagValue::Int64(self.block.read_i64::<BigEndian>()?),
            RecordType::Float32 => TagValue::Float32(self.block.read_f32::<BigEndian>()?),
            RecordType::Float64 => TagValue::Float64(self.block.read_f64::<BigEndian>()?),
            RecordType::String => TagValue::String(String::from_utf8(self.read_sized()?)?),
            other => return Err(Error::UnknownRecordType(other as u8)),
        })
    }

    fn push(&mut self, scope: Scope) -> Result<()> {
        if self.scopes.len() >= MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }
        self.scopes.push(scope);
        Ok(())
    }

    fn pop(&mut self, expected: Scope, name: &'static str) -> Result<()> {
        match self.scopes.pop() {
            Some(scope) if scope == expected => Ok(()),
            _ => Err(VisitError::Unbalanced(name).into()),
        }
    }
}

impl<R: Read> TagReader for BinaryReader<R> {
    type Error = Error;

    #[instrument(skip_all, err)]
    fn begin(&mut self) -> Result<()> {
        self.scopes.clear();
        self.dictionary = KeyDictionary::read_from(&mut self.block)?;
        debug!(
            keys = self.dictionary.len(),
            compression = ?self.header.compression,
            "reading binary tag document"
        );
        Ok(())
    }

    fn next_event(&mut self) -> Result<TagEvent> {
        let record = RecordType::try_from(self.block.read_u8()?)?;
        trace!(?record, depth = self.scopes.len());

        Ok(match record {
            RecordType::StructureTerminate => TagEvent::StructureTerminate,
            RecordType::ListTerminate => TagEvent::ListTerminate,
            RecordType::StructureBegin => TagEvent::Structure(self.read_optional_key()?),
            RecordType::StructureEmpty => TagEvent::StructureEmpty(self.read_optional_key()?),
            RecordType::ListBegin => TagEvent::List(self.read_key()?),
            RecordType::ListEmpty => TagEvent::ListEmpty(self.read_key()?),
            scalar => {
                let key = self.read_key()?;
                let value = self.read_scalar(scalar)?;
                TagEvent::Tag { key, value }
            }
        })
    }

    fn begin_structure(&mut self) -> Result<()> {
        self.push(Scope::Structure)
    }

    fn end_structure(&mut self) -> Result<()> {
        self.pop(Scope::Structure, "structure")
    }

    fn begin_list(&mut self) -> Result<()> {
        self.push(Scope::List)
    }

    fn end_list(&mut self) -> Result<()> {
        self.pop(Scope::List, "list")
    }

    fn end(&mut self) -> Result<()> {
        if !self.scopes.is_empty() {
            return Err(VisitError::Unterminated(self.scopes.len()).into());
        }
        Ok(())
    }
}
