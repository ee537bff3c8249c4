//! This library bundles many named tag trees into a single **tag archive**.
//!
//! # Tag Archive Format Documentation
//!
//! An archive is a flat directory of named entries. Every entry holds one tree encoded with
//! [`tagpak_binary`]; the archive itself never looks inside a payload once it is encoded.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field            | Description                                        |
//! |----------------|------------------|----------------------------------------------------|
//! | 0x0000         | Magic number     | 4 bytes: `TPAK`                                    |
//! | 0x0004         | Version          | 1 byte: Fixed value `1`                            |
//! | 0x0005         | Directory        | Entries, terminated by a single `255` byte         |
//! | ...            | Payloads         | Payload bytes of every entry, in directory order   |
//!
//! ### Directory Entry
//!
//! | Field          | Description                                                         |
//! |----------------|---------------------------------------------------------------------|
//! | Name length    | 1 byte `0..=253`, or `254` followed by a 4-byte length              |
//! | Name           | UTF-8 bytes                                                         |
//! | Payload length | 4 bytes                                                             |
//!
//! A name length byte of `255` ends the directory. The payload of an entry starts at the end of
//! the directory plus the lengths of all payloads listed before it, which is what allows
//! [`TagArchive::extract_one`] to decode a single entry without reading the others.
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte integers
//! - **Names**: Unique within an archive, no hierarchy
//!

pub mod archive;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use archive::TagArchive;
pub use error::{Error, Result};
