//! Error types for the MessagePack codec.

/// Errors that can occur while decoding or encoding MessagePack data.
#[derive(Debug, thiserror::Error)]
pub enum MsgPackError {
    /// The stream contained a byte sequence that is not valid MessagePack.
    #[error("format error: {0}")]
    Format(String),

    /// A decoded value did not match the type the caller asked for.
    #[error("type error: {0}")]
    Type(String),

    /// An announced raw/array/map size exceeded the configured limit.
    #[error("size of {kind} ({size}) over limit at {limit}")]
    SizeLimit {
        kind: &'static str,
        size: i64,
        limit: usize,
    },

    /// The byte source ended in the middle of a value.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
