//! Per-document key dictionaries.

use std::{
    cmp::Reverse,
    collections::HashMap,
    io::{Read, Write},
};

use byteorder::{ReadBytesExt, WriteBytesExt};
use tagpak_tree::{Structure, TagValue};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::types::{read_compact_len, read_utf8, write_compact_len};

/// Most keys a dictionary can hold; alias `255` is reserved for inline keys
pub const MAX_DICTIONARY_KEYS: usize = 255;

/// Maps the most valuable keys of a document to single byte aliases
///
/// ```
/// use tagpak_binary::KeyDictionary;
/// use tagpak_tree::Structure;
///
/// let mut root = Structure::new();
/// root.set_i32("position", 1);
/// root.get_or_insert_structure("child").set_i32("position", 2);
///
/// let dictionary = KeyDictionary::build(&root);
/// assert_eq!(dictionary.alias_for("position"), Some(0));
/// assert_eq!(dictionary.resolve(0), Some("position"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDictionary {
    keys: Vec<String>,
    aliases: HashMap<String, u8>,
}

impl KeyDictionary {
    /// A dictionary without keys; every key is written inline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered key list, keeping at most [`MAX_DICTIONARY_KEYS`] keys
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        let keys = keys
            .into_iter()
            .take(MAX_DICTIONARY_KEYS)
            .collect::<Vec<_>>();

        let aliases = keys
            .iter()
            .enumerate()
            .map(|(alias, key)| (key.clone(), alias as u8))
            .collect();

        KeyDictionary { keys, aliases }
    }

    /// Choose the dictionary for `root`
    ///
    /// Every distinct key is scored `length + length * (occurrences - 1)`, so that keys which
    /// are both long and repeated win. The best [`MAX_DICTIONARY_KEYS`] are kept, best first;
    /// ties go to the lexicographically smaller key.
    #[instrument(skip_all)]
    pub fn build(root: &Structure) -> Self {
        let mut occurrences = HashMap::new();
        count_keys(root, &mut occurrences);

        let mut scored = occurrences
            .into_iter()
            .map(|(key, count): (&str, u64)| {
                let length = key.len() as u64;
                (length + length * (count - 1), key)
            })
            .collect::<Vec<_>>();
        scored.sort_unstable_by(|a, b| (Reverse(a.0), a.1).cmp(&(Reverse(b.0), b.1)));

        let dictionary = Self::from_keys(scored.into_iter().map(|(_, key)| key.to_owned()));
        debug!(keys = dictionary.len(), "built key dictionary");
        dictionary
    }

    /// Number of keys in the dictionary
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the dictionary holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The keys in alias order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The alias of `key`, if it is in the dictionary
    pub fn alias_for(&self, key: &str) -> Option<u8> {
        self.aliases.get(key).copied()
    }

    /// The key behind `alias`
    pub fn resolve(&self, alias: u8) -> Option<&str> {
        self.keys.get(alias as usize).map(String::as_str)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.keys.len() as u8)?;
        for key in &self.keys {
            write_compact_len(writer, key.len())?;
            writer.write_all(key.as_bytes())?;
        }
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let count = reader.read_u8()?;
        let mut keys = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let length = read_compact_len(reader)?;
            keys.push(read_utf8(reader, length)?);
        }
        Ok(Self::from_keys(keys))
    }
}

fn count_keys<'a>(structure: &'a Structure, occurrences: &mut HashMap<&'a str, u64>) {
    for (key, value) in structure.iter() {
        *occurrences.entry(key).or_default() += 1;
        match value {
            TagValue::Structure(child) => count_keys(child, occurrences),
            TagValue::List(items) => items.iter().for_each(|item| count_keys(item, occurrences)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use tagpak_tree::Structure;

    use crate::dictionary::{KeyDictionary, MAX_DICTIONARY_KEYS};
    use crate::error::Result;

    #[test]
    fn scores_length_by_occurrence() {
        let mut root = Structure::new();
        // "abcdef": 6 once                  -> 6
        // "ab": 2, three times              -> 6
        // "abcd": 4, twice                  -> 8
        root.set_bool("abcdef", true).set_bool("ab", true).set_bool("abcd", true);
        let child = root.get_or_insert_structure("c");
        child.set_bool("ab", true).set_bool("abcd", true);
        root.set_list("l", vec![[("ab", 1i32)].into_iter().collect()]);

        let dictionary = KeyDictionary::build(&root);
        assert_eq!(dictionary.keys(), &["abcd", "ab", "abcdef", "c", "l"]);
        assert_eq!(dictionary.alias_for("abcd"), Some(0));
        assert_eq!(dictionary.alias_for("c"), Some(3));
        assert_eq!(dictionary.alias_for("missing"), None);
        assert_eq!(dictionary.resolve(4), Some("l"));
        assert_eq!(dictionary.resolve(5), None);
    }

    #[test]
    fn never_exceeds_limit() {
        let root = (0..1000)
            .map(|i| (format!("key_{i:04}"), i))
            .collect::<Structure>();

        let dictionary = KeyDictionary::build(&root);
        assert_eq!(dictionary.len(), MAX_DICTIONARY_KEYS);
        assert_eq!(dictionary.resolve(254), Some("key_0254"));
        assert_eq!(dictionary.alias_for("key_0255"), None);
    }

    #[test]
    fn empty_tree() {
        assert!(KeyDictionary::build(&Structure::new()).is_empty());
    }

    #[test]
    fn write_and_read() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            0x02,
            0x03, b'f', b'o', b'o',
            0x01, b'x',
        ];

        let dictionary = KeyDictionary::from_keys(["foo".to_owned(), "x".to_owned()]);
        let mut actual = Vec::new();
        dictionary.write_to(&mut actual)?;
        assert_eq!(actual, expected);

        let read = KeyDictionary::read_from(&mut Cursor::new(actual))?;
        assert_eq!(read, dictionary);
        Ok(())
    }
}
