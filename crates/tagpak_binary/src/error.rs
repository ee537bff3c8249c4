//! Error types that can be emitted from this library

use miette::Diagnostic;
use tagpak_tree::error::VisitError;
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

    /// The data does not start with the binary tag magic
    #[error("data is not a binary tag document")]
    InvalidMagic,

    /// The document was written by an unknown version of the format
    #[error("unsupported binary tag version {0}")]
    UnsupportedVersion(u8),

    /// A record started with a byte that is not a record type
    #[error("unknown record type {0:#04x}")]
    UnknownRecordType(u8),

    /// A key reference points past the end of the key dictionary
    #[error("key alias {0} has no dictionary entry")]
    UnknownKeyAlias(u8),

    /// A compact length started with a reserved byte
    #[error("invalid length marker {0:#04x}")]
    InvalidLength(u8),

    /// Structures and lists are nested deeper than [`crate::read::MAX_DEPTH`]
    #[error("document is nested deeper than {0} levels")]
    TooDeep(usize),

    /// The record stream does not describe a well formed tree
    #[error(transparent)]
    Visit(#[from] VisitError),
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::BadMagic { .. } => Error::InvalidMagic,
            binrw::Error::Io(error) => Error::IOError(error),
            other => Error::BinRWError(other),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
