//! Semantic classification of MessagePack values.

use std::fmt;

/// The broad kind of the next value in a stream, as reported by
/// `Unpacker::next_type` without consuming anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    Nil,
    Raw,
    Array,
    Map,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Nil => "nil",
            Self::Raw => "raw",
            Self::Array => "array",
            Self::Map => "map",
        })
    }
}
