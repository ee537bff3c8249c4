//! This library reads and writes the **binary tag** encoding of a [`tagpak_tree::Structure`].
//!
//! # Binary Tag Format Documentation
//!
//! A binary tag document holds exactly one tree. It is written in a single forward pass: no
//! lengths are computed ahead of time and nothing is patched afterwards, so both ends work on
//! plain [`std::io::Read`] / [`std::io::Write`] streams.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field            | Description                                                 |
//! |----------------|------------------|-------------------------------------------------------------|
//! | 0x0000         | Magic number     | 4 bytes: `TAGT`                                             |
//! | 0x0004         | Version          | 1 byte: Fixed value `1`                                     |
//! | 0x0005         | Compression      | 1 byte, signed: `-1` uncompressed, `0..=9` zlib level       |
//! | 0x0006         | Block length     | 4 bytes: Only when compressed, size of the zlib block       |
//! | ...            | Key dictionary   | Count byte and keys, inside the zlib block when compressed  |
//! | ...            | Body             | Record stream, inside the zlib block when compressed        |
//!
//! All multi-byte integers are **big-endian**.
//!
//! ### Lengths
//!
//! Keys use a *compact length*: one byte `0..=253` holds the length itself, byte `254` is followed
//! by a 4-byte length, and byte `255` is never valid. Strings and byte arrays always use a 4-byte
//! length.
//!
//! ### Key Dictionary
//!
//! A count byte `N` followed by `N` compactly length-prefixed UTF-8 keys. The key at position `i`
//! is referenced in the body by the single byte `i`. The dictionary is chosen per document by
//! scoring every distinct key as `length + length * (occurrences - 1)` and keeping the 255 best.
//!
//! ### Key References
//!
//! | Byte       | Meaning                                               |
//! |------------|-------------------------------------------------------|
//! | `0..=254`  | Dictionary alias                                      |
//! | `255`      | Escape: a compactly length-prefixed UTF-8 key follows |
//!
//! ### Body
//!
//! Each record is a type byte, then a key reference, then the payload:
//!
//! | Type | Record                | Key | Payload                                       |
//! |------|-----------------------|-----|-----------------------------------------------|
//! | 0    | Structure begin       | yes | records, then a structure terminator          |
//! | 1    | Structure terminate   | no  |                                               |
//! | 2    | Structure empty       | yes |                                               |
//! | 3    | List begin            | yes | elements                                      |
//! | 4    | List terminate        | no  |                                               |
//! | 5    | List empty            | yes |                                               |
//! | 6    | Bool                  | yes | 1 byte                                        |
//! | 7    | Byte                  | yes | 1 byte                                        |
//! | 8    | Byte array            | yes | 4-byte length, bytes                          |
//! | 9    | Int16                 | yes | 2 bytes                                       |
//! | 10   | Int32                 | yes | 4 bytes                                       |
//! | 11   | Int64                 | yes | 8 bytes                                       |
//! | 12   | Float32               | yes | 4 bytes, IEEE 754                             |
//! | 13   | Float64               | yes | 8 bytes, IEEE 754                             |
//! | 14   | String                | yes | 4-byte length, UTF-8 bytes                    |
//!
//! The root structure is written without a key: a structure begin record holding its entries, or
//! a single structure empty record.
//!
//! List elements have neither key nor begin record. Every element is its records followed by a
//! structure terminator, except the last one which ends with a list terminator instead; that byte
//! closes the element and the list at once.
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte integers
//! - **Compression Methods**:
//!   - `-1`: None (no compression)
//!   - `0..=9`: Zlib at that level
//!

use std::io::{Cursor, Read, Write};

use tagpak_tree::Structure;

pub mod compression;
pub mod dictionary;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use compression::CompressionMethod;
pub use dictionary::KeyDictionary;
pub use error::{Error, Result};
pub use read::BinaryReader;
pub use write::{BinaryWriter, BinaryWriterOptions};

/// Encode `structure` into `writer`, returning the writer once the document is complete
pub fn encode<W: Write>(structure: &Structure, writer: W, options: BinaryWriterOptions) -> Result<W> {
    let mut writer = BinaryWriter::new(writer, options);
    structure.write_to(&mut writer)?;
    Ok(writer.into_inner())
}

/// Decode one document from `reader`
pub fn decode<R: Read>(reader: R) -> Result<Structure> {
    let mut reader = BinaryReader::new(reader)?;
    Structure::read_from(&mut reader)
}

/// Encode `structure` into a new buffer
pub fn to_bytes(structure: &Structure, options: BinaryWriterOptions) -> Result<Vec<u8>> {
    Ok(encode(structure, Cursor::new(Vec::new()), options)?.into_inner())
}

/// Decode one document from a byte slice
pub fn from_bytes(bytes: &[u8]) -> Result<Structure> {
    decode(bytes)
}
