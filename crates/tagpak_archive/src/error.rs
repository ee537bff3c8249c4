//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`], including truncated input
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// Transparent wrapper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    /// data is not a tag archive
    #[error("data is not a tag archive")]
    InvalidArchive,

    /// The archive was written by an unknown version of the format
    #[error("unsupported tag archive version {0}")]
    UnsupportedVersion(u8),

    /// An entry payload could not be encoded or decoded
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] tagpak_binary::Error),

    /// unable to find requested entry
    #[error("unable to find entry {0:?}")]
    EntryNotFound(String),

    /// An entry does not fit the 4-byte payload length of the directory
    #[error("entry {name:?} is {size} bytes, more than an archive can hold")]
    EntryTooLarge {
        /// Name of the entry
        name: String,
        /// Size of its payload
        size: usize,
    },
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::BadMagic { .. } => Error::InvalidArchive,
            binrw::Error::Io(error) => Error::IOError(error),
            other => Error::BinRWError(other),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
