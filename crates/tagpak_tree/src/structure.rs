//! Keyed nodes of the tree.

use indexmap::IndexMap;
use std::hash::{Hash, Hasher};
use tracing::trace;

use crate::value::TagValue;

/// A mapping from string keys to [`TagValue`]s
///
/// Keys are unique and iteration order carries no meaning; two structures holding the same
/// entries in a different order are equal and hash the same. Entries are kept in insertion
/// order so that repeated encodes of one tree are byte-identical.
///
/// ```
/// use tagpak_tree::Structure;
///
/// let mut root = Structure::new();
/// root.set_bool("enabled", true);
/// root.get_or_insert_structure("window").set_i32("width", 640);
///
/// assert!(root.get_bool("enabled"));
/// assert_eq!(root.get_or_insert_structure("window").get_i32("width"), 640);
/// assert_eq!(root.get_string("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    entries: IndexMap<String, TagValue>,
}

macro_rules! scalar_accessors {
    ($(($get:ident, $set:ident, $variant:ident, $ty:ty, $default:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Read a `", stringify!($ty), "`, or `", stringify!($default), "` when the key is missing or holds another variant")]
            pub fn $get(&self, key: &str) -> $ty {
                match self.entries.get(key) {
                    Some(TagValue::$variant(value)) => *value,
                    _ => $default,
                }
            }

            #[doc = concat!("Store a `", stringify!($ty), "`, replacing any value under `key`")]
            pub fn $set(&mut self, key: impl Into<String>, value: $ty) -> &mut Self {
                self.entries.insert(key.into(), TagValue::$variant(value));
                self
            }
        )*
    };
}

impl Structure {
    /// Create an empty structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries directly under this structure
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this structure has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists under `key`, regardless of its variant
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over every entry of this structure
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the keys of this structure
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the raw value under `key`
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries.get(key)
    }

    /// Store a raw value, returning the one it replaced
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Option<TagValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove the value under `key`, returning it
    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.entries.shift_remove(key)
    }

    /// Move the value under `from` to `to`, replacing anything at `to`
    ///
    /// Nothing happens when `from` is absent.
    pub fn move_key(&mut self, from: &str, to: impl Into<String>) {
        if let Some(value) = self.entries.shift_remove(from) {
            self.entries.insert(to.into(), value);
        }
    }

    scalar_accessors!(
        (get_bool, set_bool, Bool, bool, false),
        (get_byte, set_byte, Byte, i8, 0),
        (get_i16, set_i16, Int16, i16, 0),
        (get_i32, set_i32, Int32, i32, 0),
        (get_i64, set_i64, Int64, i64, 0),
        (get_f32, set_f32, Float32, f32, 0.0),
        (get_f64, set_f64, Float64, f64, 0.0),
    );

    /// Read a string, or `""` when the key is missing or holds another variant
    pub fn get_string(&self, key: &str) -> &str {
        match self.entries.get(key) {
            Some(TagValue::String(value)) => value,
            _ => "",
        }
    }

    /// Store a string, replacing any value under `key`
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .insert(key.into(), TagValue::String(value.into()));
        self
    }

    /// Read a byte array, or an empty slice when the key is missing or holds another variant
    pub fn get_byte_array(&self, key: &str) -> &[u8] {
        match self.entries.get(key) {
            Some(TagValue::ByteArray(value)) => value,
            _ => &[],
        }
    }

    /// Store a byte array, replacing any value under `key`
    pub fn set_byte_array(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.entries
            .insert(key.into(), TagValue::ByteArray(value.into()));
        self
    }

    /// Look up a nested structure without creating one
    pub fn structure(&self, key: &str) -> Option<&Structure> {
        match self.entries.get(key) {
            Some(TagValue::Structure(value)) => Some(value),
            _ => None,
        }
    }

    /// Look up a nested structure for mutation without creating one
    pub fn structure_mut(&mut self, key: &str) -> Option<&mut Structure> {
        match self.entries.get_mut(key) {
            Some(TagValue::Structure(value)) => Some(value),
            _ => None,
        }
    }

    /// Get the nested structure under `key`, attaching a new empty one first if the key is
    /// missing or holds another variant
    ///
    /// This mutates `self` even when used only to read, which is what makes incremental
    /// building (`root.get_or_insert_structure("a").get_or_insert_structure("b")`) work.
    pub fn get_or_insert_structure(&mut self, key: &str) -> &mut Structure {
        let mut slot = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| TagValue::Structure(Structure::new()));

        // Runs at most twice
        loop {
            match slot {
                TagValue::Structure(structure) => return structure,
                other => {
                    trace!(key, kind = %other.kind(), "replacing value with empty structure");
                    *other = TagValue::Structure(Structure::new());
                    slot = other;
                }
            }
        }
    }

    /// Store a nested structure, replacing any value under `key`
    pub fn set_structure(&mut self, key: impl Into<String>, value: Structure) -> &mut Self {
        self.entries
            .insert(key.into(), TagValue::Structure(value));
        self
    }

    /// Read a list, or an empty slice when the key is missing or holds another variant
    ///
    /// Unlike [`Structure::get_or_insert_structure`] this never modifies the structure.
    pub fn list(&self, key: &str) -> &[Structure] {
        match self.entries.get(key) {
            Some(TagValue::List(value)) => value,
            _ => &[],
        }
    }

    /// Look up a list for mutation without creating one
    pub fn list_mut(&mut self, key: &str) -> Option<&mut Vec<Structure>> {
        match self.entries.get_mut(key) {
            Some(TagValue::List(value)) => Some(value),
            _ => None,
        }
    }

    /// Store a list, replacing any value under `key`
    pub fn set_list(&mut self, key: impl Into<String>, value: Vec<Structure>) -> &mut Self {
        self.entries.insert(key.into(), TagValue::List(value));
        self
    }
}

impl Hash for Structure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        state.write_usize(entries.len());
        for (key, value) in entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: Into<String>, V: Into<TagValue>> FromIterator<(K, V)> for Structure {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Structure {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<TagValue>> Extend<(K, V)> for Structure {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use tracing_test::traced_test;

    use crate::structure::Structure;
    use crate::value::TagValue;

    fn hash_of(structure: &Structure) -> u64 {
        let mut hasher = DefaultHasher::new();
        structure.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn missing_keys_return_defaults() {
        let structure = Structure::new();

        assert!(!structure.get_bool("a"));
        assert_eq!(structure.get_byte("a"), 0);
        assert_eq!(structure.get_i16("a"), 0);
        assert_eq!(structure.get_i32("a"), 0);
        assert_eq!(structure.get_i64("a"), 0);
        assert_eq!(structure.get_f32("a"), 0.0);
        assert_eq!(structure.get_f64("a"), 0.0);
        assert_eq!(structure.get_string("a"), "");
        assert!(structure.get_byte_array("a").is_empty());
        assert!(structure.list("a").is_empty());
        assert!(structure.structure("a").is_none());
        assert!(structure.is_empty());
    }

    #[test]
    fn mismatched_types_return_defaults() {
        let mut structure = Structure::new();
        structure.set_string("name", "value").set_i32("count", 7);

        assert_eq!(structure.get_i32("name"), 0);
        assert_eq!(structure.get_string("count"), "");
        assert_eq!(structure.get_i64("count"), 0);
        assert!(structure.list("count").is_empty());
        assert_eq!(structure.len(), 2);
    }

    #[test]
    fn set_overwrites() {
        let mut structure = Structure::new();
        structure.set_i32("a", 1);
        structure.set_i32("a", 2);
        assert_eq!(structure.get_i32("a"), 2);
        assert_eq!(structure.len(), 1);

        structure.set_string("a", "now a string");
        assert_eq!(structure.get_i32("a"), 0);
        assert_eq!(structure.get_string("a"), "now a string");
        assert_eq!(structure.len(), 1);
    }

    #[test]
    fn get_or_insert_structure_attaches_child() {
        let mut root = Structure::new();
        root.get_or_insert_structure("a")
            .get_or_insert_structure("b")
            .set_bool("c", true);

        assert!(root.contains_key("a"));
        let b = root
            .structure("a")
            .and_then(|a| a.structure("b"))
            .expect("nested structures should exist");
        assert!(b.get_bool("c"));
    }

    #[traced_test]
    #[test]
    fn get_or_insert_structure_replaces_mismatch() {
        let mut root = Structure::new();
        root.set_i64("a", 12);

        assert!(root.get_or_insert_structure("a").is_empty());
        assert_eq!(root.get("a"), Some(&TagValue::Structure(Structure::new())));
        assert!(logs_contain("replacing value with empty structure"));
    }

    #[test]
    fn get_or_insert_structure_keeps_existing() {
        let mut root = Structure::new();
        root.set_i32("before", 1);
        root.get_or_insert_structure("a").set_i32("n", 7);
        root.set_i32("after", 2);

        assert_eq!(root.get_or_insert_structure("a").get_i32("n"), 7);
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["before", "a", "after"]);
    }

    #[test]
    fn list_does_not_vivify() {
        let root = Structure::new();
        assert!(root.list("items").is_empty());
        assert!(!root.contains_key("items"));
    }

    #[test]
    fn list_mutation() {
        let mut root = Structure::new();
        root.set_list("items", Vec::new());
        root.list_mut("items")
            .expect("list was just set")
            .push([("id", 1i32)].into_iter().collect());

        assert_eq!(root.list("items").len(), 1);
        assert_eq!(root.list("items")[0].get_i32("id"), 1);
    }

    #[test]
    fn move_key() {
        let mut root = Structure::new();
        root.set_string("from", "value").set_bool("to", true);

        root.move_key("from", "to");
        assert!(!root.contains_key("from"));
        assert_eq!(root.get_string("to"), "value");

        root.move_key("absent", "other");
        assert!(!root.contains_key("other"));
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn remove() {
        let mut root = Structure::new();
        root.set_byte("b", 5);
        assert_eq!(root.remove("b"), Some(TagValue::Byte(5)));
        assert_eq!(root.remove("b"), None);
    }

    #[test]
    fn copy_is_independent() {
        let mut original = Structure::new();
        original.get_or_insert_structure("x").set_i32("n", 1);
        original.set_byte_array("bytes", vec![1, 2, 3]);
        original.set_list("items", vec![Structure::new()]);

        let copy = original.clone();

        original.get_or_insert_structure("x").set_i32("n", 2);
        original
            .list_mut("items")
            .expect("list exists")
            .push(Structure::new());
        original.set_byte_array("bytes", vec![9]);

        assert_eq!(copy.structure("x").map(|x| x.get_i32("n")), Some(1));
        assert_eq!(copy.list("items").len(), 1);
        assert_eq!(copy.get_byte_array("bytes"), &[1, 2, 3]);
        assert_ne!(original, copy);
    }

    #[test]
    fn equality_and_hash_ignore_order() {
        let mut a = Structure::new();
        a.set_i32("one", 1).set_string("two", "2");
        a.get_or_insert_structure("three")
            .set_byte_array("bytes", vec![3]);

        let mut b = Structure::new();
        b.get_or_insert_structure("three")
            .set_byte_array("bytes", vec![3]);
        b.set_string("two", "2").set_i32("one", 1);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        b.get_or_insert_structure("three")
            .set_byte_array("bytes", vec![4]);
        assert_ne!(a, b);
    }

    #[test]
    fn from_iterator() {
        let structure: Structure = [("a", TagValue::from(1i32)), ("b", TagValue::from("b"))]
            .into_iter()
            .collect();

        assert_eq!(structure.get_i32("a"), 1);
        assert_eq!(structure.get_string("b"), "b");
        assert_eq!(structure.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
