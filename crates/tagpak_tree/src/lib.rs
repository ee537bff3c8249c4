//! This library holds the **Tag Tree**, the recursive data model shared by the tagpak formats.
//!
//! # Tag Tree
//!
//! A tree is rooted at a [`Structure`], an unordered mapping from string keys to [`TagValue`]s.
//! Values are one of a closed set of variants:
//!
//! | Variant     | Rust type          | Default returned by typed getters |
//! |-------------|--------------------|-----------------------------------|
//! | `Bool`      | `bool`             | `false`                           |
//! | `Byte`      | `i8`               | `0`                               |
//! | `ByteArray` | `Vec<u8>`          | empty slice                       |
//! | `Int16`     | `i16`              | `0`                               |
//! | `Int32`     | `i32`              | `0`                               |
//! | `Int64`     | `i64`              | `0`                               |
//! | `Float32`   | `f32`              | `0.0`                             |
//! | `Float64`   | `f64`              | `0.0`                             |
//! | `String`    | `String`           | `""`                              |
//! | `Structure` | [`Structure`]      | see [`Structure::get_or_insert_structure`] |
//! | `List`      | `Vec<Structure>`   | empty slice                       |
//!
//! Lists are homogeneous and only ever hold structures.
//!
//! ## Lenient access
//!
//! Reading a missing key, or a key holding a different variant, is not an error: the typed
//! getters return the default listed above. Callers that need to tell the difference use
//! [`Structure::get`] or [`Structure::contains_key`].
//!
//! ## Ownership
//!
//! Setters take their value by ownership, so a child structure always has exactly one parent.
//! Storing the same subtree under two parents needs an explicit `clone()`, which is deep.
//!
//! Sharing a structure between threads is the caller's business; wrap it in a lock when
//! several threads mutate it.
//!
//! ## Serialization
//!
//! The tree does not know any wire format. [`Structure::write_to`] and [`Structure::read_from`]
//! walk the tree depth first against the [`visit::TagWriter`] and [`visit::TagReader`]
//! traits, and each format supplies its own implementation of those traits.
//!

pub mod error;
pub mod structure;
pub mod value;
pub mod visit;

pub use structure::Structure;
pub use value::{TagKind, TagValue};
pub use visit::{TagEvent, TagReader, TagWriter};
