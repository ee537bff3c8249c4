//! Values that can be stored in a [`Structure`].

use derive_more::derive::{Display, From};
use std::hash::{Hash, Hasher};

use crate::structure::Structure;

/// The variant of a [`TagValue`] without its payload
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagKind {
    #[display("bool")]
    Bool,
    #[display("byte")]
    Byte,
    #[display("byte array")]
    ByteArray,
    #[display("int16")]
    Int16,
    #[display("int32")]
    Int32,
    #[display("int64")]
    Int64,
    #[display("float32")]
    Float32,
    #[display("float64")]
    Float64,
    #[display("string")]
    String,
    #[display("structure")]
    Structure,
    #[display("list")]
    List,
}

/// A single value in the tree
///
/// Floats compare and hash by their bit pattern, so `NaN` equals itself and `0.0` differs
/// from `-0.0`. This keeps [`Eq`] and [`Hash`] lawful for whole trees.
#[derive(From, Debug, Clone)]
pub enum TagValue {
    Bool(bool),
    Byte(i8),
    ByteArray(Vec<u8>),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Structure(Structure),
    List(Vec<Structure>),
}

impl TagValue {
    /// Get the variant of this value
    pub fn kind(&self) -> TagKind {
        match self {
            TagValue::Bool(_) => TagKind::Bool,
            TagValue::Byte(_) => TagKind::Byte,
            TagValue::ByteArray(_) => TagKind::ByteArray,
            TagValue::Int16(_) => TagKind::Int16,
            TagValue::Int32(_) => TagKind::Int32,
            TagValue::Int64(_) => TagKind::Int64,
            TagValue::Float32(_) => TagKind::Float32,
            TagValue::Float64(_) => TagKind::Float64,
            TagValue::String(_) => TagKind::String,
            TagValue::Structure(_) => TagKind::Structure,
            TagValue::List(_) => TagKind::List,
        }
    }

    /// Whether this value is a leaf (neither a structure nor a list)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TagValue::Structure(_) | TagValue::List(_))
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(value.to_owned())
    }
}

impl From<&[u8]> for TagValue {
    fn from(value: &[u8]) -> Self {
        TagValue::ByteArray(value.to_vec())
    }
}

impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TagValue::Bool(a), TagValue::Bool(b)) => a == b,
            (TagValue::Byte(a), TagValue::Byte(b)) => a == b,
            (TagValue::ByteArray(a), TagValue::ByteArray(b)) => a == b,
            (TagValue::Int16(a), TagValue::Int16(b)) => a == b,
            (TagValue::Int32(a), TagValue::Int32(b)) => a == b,
            (TagValue::Int64(a), TagValue::Int64(b)) => a == b,
            (TagValue::Float32(a), TagValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (TagValue::Float64(a), TagValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (TagValue::String(a), TagValue::String(b)) => a == b,
            (TagValue::Structure(a), TagValue::Structure(b)) => a == b,
            (TagValue::List(a), TagValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TagValue {}

impl Hash for TagValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            TagValue::Bool(v) => v.hash(state),
            TagValue::Byte(v) => v.hash(state),
            TagValue::ByteArray(v) => v.hash(state),
            TagValue::Int16(v) => v.hash(state),
            TagValue::Int32(v) => v.hash(state),
            TagValue::Int64(v) => v.hash(state),
            TagValue::Float32(v) => v.to_bits().hash(state),
            TagValue::Float64(v) => v.to_bits().hash(state),
            TagValue::String(v) => v.hash(state),
            TagValue::Structure(v) => v.hash(state),
            TagValue::List(v) => v.hash(state),
        }
    }
}
