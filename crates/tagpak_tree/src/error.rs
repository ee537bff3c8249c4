//! Error types that can be emitted while walking a tree
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::value::TagKind;

/// Protocol violations detected while driving a [`crate::TagWriter`] or [`crate::TagReader`]
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum VisitError {
    /// The reader produced an event that is not valid at this point of the walk
    #[error("expected {expected}, found {found}")]
    UnexpectedEvent {
        /// What the walk was prepared to accept
        expected: &'static str,
        /// Description of the event that was produced
        found: String,
    },

    /// A structure or list was closed without a matching open
    #[error("unbalanced {0} terminator")]
    Unbalanced(&'static str),

    /// A structure or list was passed where only scalars are accepted
    #[error("{0} is not a scalar tag")]
    NotScalar(TagKind),

    /// The walk ended while structures or lists were still open
    #[error("{0} scopes still open at end of document")]
    Unterminated(usize),
}

/// Generic result type with [`VisitError`] as its error variant
pub type Result<T> = core::result::Result<T, VisitError>;
