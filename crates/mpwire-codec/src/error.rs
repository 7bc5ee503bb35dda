/// Errors that can occur during value encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The encoded output would exceed the configured capacity.
    #[error("encoded output too large ({needed} more bytes needed, {available} available)")]
    CapacityExceeded { needed: usize, available: usize },

    /// The value has no wire representation.
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// The input ended before a complete value was read.
    #[error("truncated input at offset {offset} ({needed} bytes needed, {remaining} remaining)")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// The tag byte has no defined meaning.
    #[error("unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// A string, array or map length does not fit the widest size class.
    #[error("length {len} exceeds the 32-bit size class")]
    SizeOverflow { len: usize },

    /// Arrays/maps are nested deeper than the configured limit.
    #[error("nesting depth exceeds limit of {max}")]
    DepthLimitExceeded { max: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
