//! Types for writing binary tag documents
//!

use bon::Builder;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;
use tagpak_tree::{error::VisitError, Structure, TagValue, TagWriter};
use tracing::{debug, instrument, trace};

use crate::compression::{CompressionMethod, TagBlockWriter};
use crate::dictionary::KeyDictionary;
use crate::error::{Error, Result};
use crate::types::{write_compact_len, RecordType, TagHeader, ESCAPE_ALIAS};

/// Options for how a document should be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct BinaryWriterOptions {
    /// Alias frequent keys through a per-document dictionary
    #[builder(default = true)]
    pub use_dictionary: bool,

    /// The compression method to use for the dictionary and body
    #[builder(default)]
    pub compression: CompressionMethod,
}

impl Default for BinaryWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Structure,
    List,
    Element,
}

/// Binary tag document generator
///
/// Implements [`TagWriter`]; drive it with [`Structure::write_to`], or use [`crate::encode`].
///
/// ```
/// # fn doit() -> tagpak_binary::Result<()>
/// # {
/// use tagpak_binary::{BinaryWriter, BinaryWriterOptions, CompressionMethod};
/// use tagpak_tree::Structure;
///
/// let mut root = Structure::new();
/// root.set_string("greeting", "Hello, World!");
///
/// let mut writer = BinaryWriter::new(Vec::new(), BinaryWriterOptions::builder()
///            .compression(CompressionMethod::zlib())
///            .build());
/// root.write_to(&mut writer)?;
///
/// let bytes = writer.into_inner();
/// assert_eq!(&bytes[..4], b"TAGT");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct BinaryWriter<W: Write> {
    block: TagBlockWriter<W>,
    options: BinaryWriterOptions,
    dictionary: KeyDictionary,
    scopes: Vec<Scope>,
}

impl<W: Write> BinaryWriter<W> {
    /// Prepare to write one document into `inner`
    pub fn new(inner: W, options: BinaryWriterOptions) -> BinaryWriter<W> {
        BinaryWriter {
            block: TagBlockWriter::new(inner, options.compression),
            options,
            dictionary: KeyDictionary::new(),
            scopes: Vec::new(),
        }
    }

    /// The options this writer was created with
    pub fn options(&self) -> BinaryWriterOptions {
        self.options
    }

    /// The dictionary chosen for the current document
    pub fn dictionary(&self) -> &KeyDictionary {
        &self.dictionary
    }

    /// Unwrap and return the inner writer
    ///
    /// Compressed output only reaches the inner writer once [`TagWriter::end`] has run.
    pub fn into_inner(self) -> W {
        self.block.into_inner()
    }

    fn write_record(&mut self, record: RecordType) -> Result<()> {
        trace!(?record, depth = self.scopes.len());
        self.block.write_u8(record as u8)?;
        Ok(())
    }

    fn write_key(&mut self, key: &str) -> Result<()> {
        match self.dictionary.alias_for(key) {
            Some(alias) => self.block.write_u8(alias)?,
            None => {
                self.block.write_u8(ESCAPE_ALIAS)?;
                write_compact_len(&mut self.block, key.len())?;
                self.block.write_all(key.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_sized(&mut self, bytes: &[u8]) -> Result<()> {
        let length = u32::try_from(bytes.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "value exceeds 4 GiB")
        })?;
        self.block.write_u32::<BigEndian>(length)?;
        self.block.write_all(bytes)?;
        Ok(())
    }

    fn in_list(&self) -> bool {
        self.scopes.last() == Some(&Scope::List)
    }

    /// Only the root and list elements are keyless
    fn check_key(&self, key: Option<&str>) -> Result<()> {
        let keyless = self.scopes.is_empty() || self.in_list();
        match (keyless, key) {
            (true, None) | (false, Some(_)) => Ok(()),
            (true, Some(key)) => Err(VisitError::UnexpectedEvent {
                expected: "keyless structure",
                found: format!("structure {key:?}"),
            }
            .into()),
            (false, None) => Err(VisitError::UnexpectedEvent {
                expected: "keyed structure",
                found: "keyless structure".to_owned(),
            }
            .into()),
        }
    }

    fn pop(&mut self, expected: Scope, name: &'static str) -> Result<()> {
        match self.scopes.pop() {
            Some(scope) if scope == expected => Ok(()),
            _ => Err(VisitError::Unbalanced(name).into()),
        }
    }
}

impl<W: Write> TagWriter for BinaryWriter<W> {
    type Error = Error;

    #[instrument(skip_all, err)]
    fn begin(&mut self, root: &Structure) -> Result<()> {
        self.scopes.clear();
        self.dictionary = if self.options.use_dictionary {
            KeyDictionary::build(root)
        } else {
            KeyDictionary::new()
        };

        let header = TagHeader {
            compression: self.options.compression,
            ..Default::default()
        };
        header.write_to(self.block.get_mut())?;

        debug!(
            keys = self.dictionary.len(),
            compression = ?self.options.compression,
            "writing binary tag document"
        );
        self.dictionary.write_to(&mut self.block)
    }

    fn begin_structure(&mut self, key: Option<&str>) -> Result<()> {
        self.check_key(key)?;
        if self.in_list() {
            self.scopes.push(Scope::Element);
            return Ok(());
        }

        self.write_record(RecordType::StructureBegin)?;
        if let Some(key) = key {
            self.write_key(key)?;
        }
        self.scopes.push(Scope::Structure);
        Ok(())
    }

    fn end_structure(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::Structure | Scope::Element) => self.write_record(RecordType::StructureTerminate),
            _ => Err(VisitError::Unbalanced("structure").into()),
        }
    }

    fn structure_empty(&mut self, key: Option<&str>) -> Result<()> {
        self.check_key(key)?;
        if self.in_list() {
            return self.write_record(RecordType::StructureTerminate);
        }

        self.write_record(RecordType::StructureEmpty)?;
        if let Some(key) = key {
            self.write_key(key)?;
        }
        Ok(())
    }

    fn begin_list(&mut self, key: &str) -> Result<()> {
        self.write_record(RecordType::ListBegin)?;
        self.write_key(key)?;
        self.scopes.push(Scope::List);
        Ok(())
    }

    fn end_list_terminate(&mut self) -> Result<()> {
        self.pop(Scope::Element, "list element")?;
        self.pop(Scope::List, "list")?;
        self.write_record(RecordType::ListTerminate)
    }

    fn end_list_empty(&mut self) -> Result<()> {
        self.pop(Scope::List, "list")?;
        self.write_record(RecordType::ListTerminate)
    }

    fn list_empty(&mut self, key: &str) -> Result<()> {
        self.write_record(RecordType::ListEmpty)?;
        self.write_key(key)
    }

    fn write_tag(&mut self, key: &str, value: &TagValue) -> Result<()> {
        if !value.is_scalar() {
            return Err(VisitError::NotScalar(value.kind()).into());
        }

        self.write_record(RecordType::for_value(value))?;
        self.write_key(key)?;
        match value {
            TagValue::Bool(v) => self.block.write_u8(u8::from(*v))?,
            TagValue::Byte(v) => self.block.write_i8(*v)?,
            TagValue::ByteArray(v) => self.write_sized(v)?,
            TagValue::Int16(v) => self.block.write_i16::<BigEndian>(*v)?,
            TagValue::Int32(v) => self.block.write_i32::<BigEndian>(*v)?,
            TagValue::Int64(v) => self.block.write_i64::<BigEndian>(*v)?,
            TagValue::Float32(v) => self.block.write_f32::<BigEndian>(*v)?,
            TagValue::Float64(v) => self.block.write_f64::<BigEndian>(*v)?,
            TagValue::String(v) => self.write_sized(v.as_bytes())?,
            TagValue::Structure(_) | TagValue::List(_) => {
                return Err(VisitError::NotScalar(value.kind()).into())
            }
        }
        Ok(())
    }

    #[instrument(skip_all, err)]
    fn end(&mut self) -> Result<()> {
        if !self.scopes.is_empty() {
            return Err(VisitError::Unterminated(self.scopes.len()).into());
        }
        self.block.finish()?;
        Ok(())
    }
}
