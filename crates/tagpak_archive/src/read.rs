//! Reading tag archives
//!

use indexmap::IndexMap;
use std::io::{self, Read, Seek, SeekFrom};
use tagpak_binary::BinaryWriterOptions;
use tagpak_tree::Structure;
use tracing::{debug, instrument, trace};

use crate::archive::TagArchive;
use crate::error::Result;
use crate::types::{ArchiveHeader, DirectoryEntry};

fn read_directory<R: Read>(reader: &mut R) -> Result<Vec<DirectoryEntry>> {
    ArchiveHeader::read_from(reader)?;

    let mut directory = Vec::new();
    while let Some(entry) = DirectoryEntry::read_from(reader)? {
        trace!(name = %entry.name, size = entry.size, "directory entry");
        directory.push(entry);
    }
    debug!(entries = directory.len(), "read archive directory");
    Ok(directory)
}

impl TagArchive {
    /// Read a complete archive, loading every payload into memory
    ///
    /// Payloads are not decoded until they are requested with [`TagArchive::get`]. When a name
    /// appears more than once, the last payload wins.
    #[instrument(skip_all, err)]
    pub fn read<R: Read>(mut reader: R) -> Result<TagArchive> {
        let directory = read_directory(&mut reader)?;

        let mut entries = IndexMap::with_capacity(directory.len());
        for entry in directory {
            let mut payload = Vec::new();
            reader
                .by_ref()
                .take(u64::from(entry.size))
                .read_to_end(&mut payload)?;
            if payload.len() != entry.size as usize {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            entries.insert(entry.name, payload);
        }

        Ok(TagArchive {
            entries,
            options: BinaryWriterOptions::default(),
        })
    }

    /// Decode the entry named `name` straight from an archive stream
    ///
    /// Only the directory and the requested payload are read; every other payload is skipped
    /// over. Returns `None` when the archive has no such entry.
    ///
    /// ```no_run
    /// use std::fs::File;
    ///
    /// fn load_settings() -> tagpak_archive::Result<()> {
    ///     let file = File::open("save.tpak")?;
    ///     if let Some(settings) = tagpak_archive::TagArchive::extract_one(file, "settings")? {
    ///         println!("volume: {}", settings.get_i32("volume"));
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(reader), err)]
    pub fn extract_one<R: Read + Seek>(mut reader: R, name: &str) -> Result<Option<Structure>> {
        let directory = read_directory(&mut reader)?;

        let Some(position) = directory.iter().rposition(|entry| entry.name == name) else {
            return Ok(None);
        };
        let offset = directory[..position]
            .iter()
            .map(|entry| u64::from(entry.size))
            .sum::<u64>();
        let size = directory[position].size;
        debug!(offset, size, "extracting entry");

        // Offsets are relative to the end of the directory
        let offset = i64::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "entry offset out of range"))?;
        reader.seek(SeekFrom::Current(offset))?;

        let structure = tagpak_binary::decode(reader.take(u64::from(size)))?;
        Ok(Some(structure))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tracing_test::traced_test;

    use tagpak_binary::BinaryWriterOptions;
    use tagpak_tree::Structure;

    use crate::archive::TagArchive;
    use crate::error::{Error, Result};

    #[rustfmt::skip]
    const TWO_ENTRIES: [u8; 40] = [
        // Header
        0x54, 0x50, 0x41, 0x4B, 0x01,
        // "a": 8 bytes
        0x01, b'a', 0x00, 0x00, 0x00, 0x08,
        // "b": 14 bytes
        0x01, b'b', 0x00, 0x00, 0x00, 0x0E,
        // End of directory
        0xFF,
        // "a": {}
        0x54, 0x41, 0x47, 0x54, 0x01, 0xFF, 0x00, 0x02,
        // "b": {n: byte(4)}
        0x54, 0x41, 0x47, 0x54, 0x01, 0xFF, 0x00, 0x00, 0x07, 0xFF, 0x01, b'n', 0x04,
        0x01,
    ];

    #[traced_test]
    #[test]
    fn read_two_entries() -> Result<()> {
        let archive = TagArchive::read(TWO_ENTRIES.as_slice())?;

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(archive.get_raw("a").map(<[u8]>::len), Some(8));
        assert!(archive.get("b")?.is_some_and(|b| b.get_byte("n") == 4));
        assert_eq!(archive.options(), BinaryWriterOptions::default());

        Ok(())
    }

    #[test]
    fn read_empty_archive() -> Result<()> {
        let archive = TagArchive::read([0x54, 0x50, 0x41, 0x4B, 0x01, 0xFF].as_slice())?;
        assert!(archive.is_empty());
        Ok(())
    }

    #[test]
    fn read_truncated_payload() {
        let input = &TWO_ENTRIES[..TWO_ENTRIES.len() - 3];
        assert!(matches!(
            TagArchive::read(input),
            Err(Error::IOError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn read_invalid_magic() {
        let input = [0x54, 0x52, 0x45, 0x45, 0x01, 0xFF];
        assert!(matches!(
            TagArchive::read(input.as_slice()),
            Err(Error::InvalidArchive)
        ));
    }

    #[traced_test]
    #[test]
    fn extract_second_entry() -> Result<()> {
        let mut expected = Structure::new();
        expected.set_byte("n", 4);

        assert_eq!(
            TagArchive::extract_one(Cursor::new(TWO_ENTRIES), "b")?,
            Some(expected)
        );
        assert_eq!(
            TagArchive::extract_one(Cursor::new(TWO_ENTRIES), "a")?,
            Some(Structure::new())
        );
        assert_eq!(TagArchive::extract_one(Cursor::new(TWO_ENTRIES), "c")?, None);

        Ok(())
    }
}
