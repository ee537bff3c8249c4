//! The push/pull protocol used to serialize a tree.
//!
//! A format implements [`TagWriter`] to receive a tree and [`TagReader`] to produce one. The
//! depth-first walk lives here, in [`Structure::write_to`] and [`Structure::read_from`], so
//! every format sees the same sequence of calls for the same tree.
//!
//! For a tree `{a: 1, s: {}, l: [{b: 2}, {}]}` a writer receives:
//!
//! ```text
//! begin(root)
//! begin_structure(None)
//!   write_tag("a", 1)
//!   structure_empty(Some("s"))
//!   begin_list("l")
//!     begin_structure(None)
//!       write_tag("b", 2)
//!     end_structure()
//!   end_list_empty()
//! end_structure()
//! end()
//! ```
//!
//! Inside a list, every element but the last is closed with [`TagWriter::end_structure`] (or
//! announced with [`TagWriter::structure_empty`] when it has no entries). The last element is
//! closed with [`TagWriter::end_list_terminate`], or [`TagWriter::end_list_empty`] when it has
//! no entries, and that call also closes the list.

use crate::error::VisitError;
use crate::structure::Structure;
use crate::value::TagValue;

/// Receives a tree as a sequence of calls
pub trait TagWriter {
    /// Error type of this writer
    type Error: From<VisitError>;

    /// Start a document. `root` is the complete tree about to be written.
    fn begin(&mut self, root: &Structure) -> Result<(), Self::Error>;

    /// Open a structure with entries. `key` is `None` for the root and for list elements.
    fn begin_structure(&mut self, key: Option<&str>) -> Result<(), Self::Error>;

    /// Close the innermost structure, or a list element that is not the last one
    fn end_structure(&mut self) -> Result<(), Self::Error>;

    /// Emit a structure without entries. `key` is `None` for the root and for list elements.
    fn structure_empty(&mut self, key: Option<&str>) -> Result<(), Self::Error>;

    /// Open a list with at least one element
    fn begin_list(&mut self, key: &str) -> Result<(), Self::Error>;

    /// Close the last element of the innermost list together with the list
    fn end_list_terminate(&mut self) -> Result<(), Self::Error>;

    /// Close the innermost list whose last element has no entries
    fn end_list_empty(&mut self) -> Result<(), Self::Error>;

    /// Emit a list without elements
    fn list_empty(&mut self, key: &str) -> Result<(), Self::Error>;

    /// Emit a scalar. Structures and lists are never passed here.
    fn write_tag(&mut self, key: &str, value: &TagValue) -> Result<(), Self::Error>;

    /// Finish the document
    fn end(&mut self) -> Result<(), Self::Error>;
}

/// One step produced by a [`TagReader`]
#[derive(Debug, Clone, PartialEq)]
pub enum TagEvent {
    /// A scalar entry
    Tag { key: String, value: TagValue },
    /// A structure with entries follows, closed by [`TagEvent::StructureTerminate`]
    Structure(Option<String>),
    /// A structure without entries
    StructureEmpty(Option<String>),
    /// The innermost structure or list element is complete
    StructureTerminate,
    /// A list with at least one element follows
    List(String),
    /// A list without elements
    ListEmpty(String),
    /// The innermost list element is complete, and so is its list
    ListTerminate,
}

impl TagEvent {
    /// Short human readable description, used in error messages
    pub fn describe(&self) -> String {
        match self {
            TagEvent::Tag { key, value } => format!("{} tag {key:?}", value.kind()),
            TagEvent::Structure(Some(key)) => format!("structure {key:?}"),
            TagEvent::Structure(None) => "unnamed structure".to_owned(),
            TagEvent::StructureEmpty(Some(key)) => format!("empty structure {key:?}"),
            TagEvent::StructureEmpty(None) => "unnamed empty structure".to_owned(),
            TagEvent::StructureTerminate => "structure terminator".to_owned(),
            TagEvent::List(key) => format!("list {key:?}"),
            TagEvent::ListEmpty(key) => format!("empty list {key:?}"),
            TagEvent::ListTerminate => "list terminator".to_owned(),
        }
    }
}

/// Produces a tree as a sequence of [`TagEvent`]s
///
/// The `begin_*`/`end_*` calls tell the reader where the walk is, for formats whose
/// encoding depends on the nesting.
pub trait TagReader {
    /// Error type of this reader
    type Error: From<VisitError>;

    /// Start reading a document
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Read the next event
    fn next_event(&mut self) -> Result<TagEvent, Self::Error>;

    /// The walk entered the structure (or list element) announced by the last event
    fn begin_structure(&mut self) -> Result<(), Self::Error>;

    /// The walk left the innermost structure
    fn end_structure(&mut self) -> Result<(), Self::Error>;

    /// The walk entered the list announced by the last event
    fn begin_list(&mut self) -> Result<(), Self::Error>;

    /// The walk left the innermost list
    fn end_list(&mut self) -> Result<(), Self::Error>;

    /// Finish the document
    fn end(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Structure,
    List,
}

impl Structure {
    /// Walk this tree depth first, pushing it into `writer`
    pub fn write_to<W: TagWriter + ?Sized>(&self, writer: &mut W) -> Result<(), W::Error> {
        writer.begin(self)?;
        if self.is_empty() {
            writer.structure_empty(None)?;
        } else {
            writer.begin_structure(None)?;
            write_entries(self, writer)?;
            writer.end_structure()?;
        }
        writer.end()
    }

    /// Pull a complete tree out of `reader`
    ///
    /// Nothing is returned unless the whole document is well formed.
    pub fn read_from<R: TagReader + ?Sized>(reader: &mut R) -> Result<Structure, R::Error> {
        reader.begin()?;
        let root = match reader.next_event()? {
            TagEvent::StructureEmpty(_) => Structure::new(),
            TagEvent::Structure(_) => {
                reader.begin_structure()?;
                let root = read_structure(reader)?;
                reader.end_structure()?;
                root
            }
            other => return Err(unexpected("root structure", &other).into()),
        };
        reader.end()?;
        Ok(root)
    }
}

fn write_entries<W: TagWriter + ?Sized>(structure: &Structure, writer: &mut W) -> Result<(), W::Error> {
    for (key, value) in structure.iter() {
        match value {
            TagValue::Structure(child) if child.is_empty() => writer.structure_empty(Some(key))?,
            TagValue::Structure(child) => {
                writer.begin_structure(Some(key))?;
                write_entries(child, writer)?;
                writer.end_structure()?;
            }
            TagValue::List(items) => write_list(key, items, writer)?,
            scalar => writer.write_tag(key, scalar)?,
        }
    }
    Ok(())
}

fn write_list<W: TagWriter + ?Sized>(key: &str, items: &[Structure], writer: &mut W) -> Result<(), W::Error> {
    if items.is_empty() {
        return writer.list_empty(key);
    }

    writer.begin_list(key)?;
    let last = items.len() - 1;
    for (index, item) in items.iter().enumerate() {
        match (item.is_empty(), index == last) {
            (true, false) => writer.structure_empty(None)?,
            (true, true) => writer.end_list_empty()?,
            (false, is_last) => {
                writer.begin_structure(None)?;
                write_entries(item, writer)?;
                if is_last {
                    writer.end_list_terminate()?;
                } else {
                    writer.end_structure()?;
                }
            }
        }
    }
    Ok(())
}

fn read_structure<R: TagReader + ?Sized>(reader: &mut R) -> Result<Structure, R::Error> {
    match read_entries(reader, false)? {
        (structure, Closing::Structure) => Ok(structure),
        (_, Closing::List) => Err(VisitError::Unbalanced("list").into()),
    }
}

fn read_entries<R: TagReader + ?Sized>(
    reader: &mut R,
    in_list: bool,
) -> Result<(Structure, Closing), R::Error> {
    let mut structure = Structure::new();
    loop {
        match reader.next_event()? {
            TagEvent::Tag { key, value } => {
                structure.set(key, value);
            }
            TagEvent::Structure(Some(key)) => {
                reader.begin_structure()?;
                let child = read_structure(reader)?;
                reader.end_structure()?;
                structure.set_structure(key, child);
            }
            TagEvent::StructureEmpty(Some(key)) => {
                structure.set_structure(key, Structure::new());
            }
            TagEvent::List(key) => {
                reader.begin_list()?;
                let items = read_list(reader)?;
                reader.end_list()?;
                structure.set_list(key, items);
            }
            TagEvent::ListEmpty(key) => {
                structure.set_list(key, Vec::new());
            }
            TagEvent::StructureTerminate => return Ok((structure, Closing::Structure)),
            TagEvent::ListTerminate if in_list => return Ok((structure, Closing::List)),
            other => return Err(unexpected("keyed entry or terminator", &other).into()),
        }
    }
}

fn read_list<R: TagReader + ?Sized>(reader: &mut R) -> Result<Vec<Structure>, R::Error> {
    let mut items = Vec::new();
    loop {
        reader.begin_structure()?;
        let (item, closing) = read_entries(reader, true)?;
        reader.end_structure()?;
        items.push(item);

        if closing == Closing::List {
            return Ok(items);
        }
    }
}

fn unexpected(expected: &'static str, found: &TagEvent) -> VisitError {
    VisitError::UnexpectedEvent {
        expected,
        found: found.describe(),
    }
}
