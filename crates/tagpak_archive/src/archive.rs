//! The in-memory archive
//!

use indexmap::IndexMap;
use tagpak_binary::BinaryWriterOptions;
use tagpak_tree::Structure;
use tracing::{instrument, trace};

use crate::error::{Error, Result};

/// A set of named, encoded tag trees
///
/// Every tree is encoded when it is [`put`](TagArchive::put) and decoded again on every
/// [`get`](TagArchive::get); the archive only ever holds bytes. Entries keep the order they were
/// first inserted in, which is also the order they are written in.
///
/// ```
/// # fn doit() -> tagpak_archive::Result<()>
/// # {
/// use tagpak_archive::TagArchive;
/// use tagpak_tree::Structure;
///
/// let mut settings = Structure::new();
/// settings.set_i32("volume", 7);
///
/// let mut archive = TagArchive::new();
/// archive.put("settings", &settings)?;
///
/// let data = archive.write(Vec::new())?;
/// let archive = TagArchive::read(data.as_slice())?;
/// assert_eq!(archive.get("settings")?, Some(settings));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
///
/// Sharing an archive between threads is the caller's business, like for [`Structure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagArchive {
    pub(crate) entries: IndexMap<String, Vec<u8>>,
    pub(crate) options: BinaryWriterOptions,
}

impl TagArchive {
    /// Create an empty archive encoding entries with the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty archive encoding entries with `options`
    pub fn with_options(options: BinaryWriterOptions) -> Self {
        TagArchive {
            entries: IndexMap::new(),
            options,
        }
    }

    /// The options [`TagArchive::put`] encodes with
    pub fn options(&self) -> BinaryWriterOptions {
        self.options
    }

    /// Number of entries in this archive
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry named `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns an iterator over all entry names, in archive order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Encode `structure` and store it under `name`, replacing any previous entry
    ///
    /// A replaced entry keeps its position in the archive.
    #[instrument(skip_all, err)]
    pub fn put(&mut self, name: impl Into<String>, structure: &Structure) -> Result<()> {
        let payload = tagpak_binary::to_bytes(structure, self.options)?;
        let name = name.into();
        trace!(name = %name, size = payload.len(), "storing entry");
        self.entries.insert(name, payload);
        Ok(())
    }

    /// Decode the entry named `name`
    ///
    /// The payload is decoded on every call; nothing is cached.
    pub fn get(&self, name: &str) -> Result<Option<Structure>> {
        self.entries
            .get(name)
            .map(|payload| tagpak_binary::from_bytes(payload).map_err(Error::from))
            .transpose()
    }

    /// The encoded payload of the entry named `name`
    pub fn get_raw(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Store an already encoded payload under `name`
    ///
    /// The payload is decoded once first, so that an archive only ever holds valid documents.
    #[instrument(skip_all, fields(size = payload.len()), err)]
    pub fn put_raw(&mut self, name: impl Into<String>, payload: Vec<u8>) -> Result<()> {
        tagpak_binary::from_bytes(&payload)?;
        self.entries.insert(name.into(), payload);
        Ok(())
    }

    /// Remove the entry named `name`, returning its payload
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.shift_remove(name)
    }

    /// Give the entry named `from` the name `to`, without decoding it
    ///
    /// The entry keeps its position; an existing entry named `to` is replaced.
    #[instrument(skip(self), err)]
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let Some(mut index) = self.entries.get_index_of(from) else {
            return Err(Error::EntryNotFound(from.to_owned()));
        };
        if from == to {
            return Ok(());
        }

        if let Some(existing) = self.entries.get_index_of(to) {
            self.entries.shift_remove_index(existing);
            if existing < index {
                index -= 1;
            }
        }

        if let Some((_, payload)) = self.entries.shift_remove_index(index) {
            self.entries.shift_insert(index, to.to_owned(), payload);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use tagpak_binary::{BinaryWriterOptions, CompressionMethod};
    use tagpak_tree::Structure;

    use crate::archive::TagArchive;
    use crate::error::{Error, Result};

    fn numbered(n: i32) -> Structure {
        [("N", n)].into_iter().collect()
    }

    #[traced_test]
    #[test]
    fn put_and_get() -> Result<()> {
        let mut archive = TagArchive::new();
        archive.put("x", &numbered(1))?;
        archive.put("y", &numbered(2))?;

        assert_eq!(archive.len(), 2);
        assert!(archive.contains("x"));
        assert_eq!(archive.get("y")?, Some(numbered(2)));
        assert_eq!(archive.get("z")?, None);
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["x", "y"]);

        Ok(())
    }

    #[test]
    fn put_replaces_in_place() -> Result<()> {
        let mut archive = TagArchive::new();
        archive.put("a", &numbered(1))?;
        archive.put("b", &numbered(2))?;
        archive.put("a", &numbered(3))?;

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(archive.get("a")?, Some(numbered(3)));

        Ok(())
    }

    #[test]
    fn put_stores_a_snapshot() -> Result<()> {
        let mut tree = numbered(1);
        let mut archive = TagArchive::new();
        archive.put("a", &tree)?;

        tree.set_i32("N", 2);
        assert_eq!(archive.get("a")?, Some(numbered(1)));

        Ok(())
    }

    #[test]
    fn rename_keeps_position() -> Result<()> {
        let mut archive = TagArchive::new();
        archive.put("a", &numbered(1))?;
        archive.put("b", &numbered(2))?;
        archive.put("c", &numbered(3))?;

        let payload = archive.get_raw("b").map(<[u8]>::to_vec);
        archive.rename("b", "renamed")?;

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["a", "renamed", "c"]);
        assert_eq!(archive.get_raw("renamed").map(<[u8]>::to_vec), payload);
        assert!(!archive.contains("b"));

        Ok(())
    }

    #[test]
    fn rename_over_existing() -> Result<()> {
        let mut archive = TagArchive::new();
        archive.put("a", &numbered(1))?;
        archive.put("b", &numbered(2))?;
        archive.put("c", &numbered(3))?;

        archive.rename("c", "a")?;

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(archive.get("a")?, Some(numbered(3)));

        Ok(())
    }

    #[test]
    fn rename_missing() {
        let mut archive = TagArchive::new();
        assert!(matches!(
            archive.rename("nope", "other"),
            Err(Error::EntryNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn remove_entry() -> Result<()> {
        let mut archive = TagArchive::new();
        archive.put("a", &numbered(1))?;

        assert!(archive.remove("a").is_some());
        assert!(archive.remove("a").is_none());
        assert!(archive.is_empty());

        Ok(())
    }

    #[test]
    fn put_raw_validates() -> Result<()> {
        let mut archive = TagArchive::new();
        assert!(archive.put_raw("bad", b"not a tag document".to_vec()).is_err());
        assert!(!archive.contains("bad"));

        let payload = tagpak_binary::to_bytes(&numbered(5), BinaryWriterOptions::default())?;
        archive.put_raw("good", payload)?;
        assert_eq!(archive.get("good")?, Some(numbered(5)));

        Ok(())
    }

    #[test]
    fn options_apply_to_put() -> Result<()> {
        let options = BinaryWriterOptions::builder()
            .compression(CompressionMethod::zlib())
            .build();
        let mut archive = TagArchive::with_options(options);
        archive.put("a", &numbered(1))?;

        assert_eq!(archive.options(), options);
        // Compression byte of the entry's header
        assert_eq!(archive.get_raw("a").map(|p| p[5]), Some(6));
        assert_eq!(archive.get("a")?, Some(numbered(1)));

        Ok(())
    }
}
