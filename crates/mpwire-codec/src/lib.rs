//! Strict MessagePack-family codec for a small dynamic value model.
//!
//! Values ([`Value`]) are nil, booleans, integers, floats, byte strings,
//! arrays and maps. Encoding always picks the smallest legal tag:
//! - integral numbers use fixnums or 8/16/32/64-bit integer classes
//! - other numbers are written as big-endian 64-bit doubles
//! - strings, arrays and maps use fix tags, then 16-bit, then 32-bit lengths
//!
//! Decoding is bounds-checked at every width and never panics on untrusted
//! input. Both directions enforce a nesting limit and report failures
//! through [`CodecError`]; partial output is never handed back.

pub mod config;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod sink;
pub mod tag;
pub mod value;

pub use config::{CodecConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENCODED_SIZE};
pub use cursor::ByteCursor;
pub use decode::{decode, decode_with_config, Decoder, ValueIter};
pub use encode::{encode, encode_with_config, Encoder};
pub use error::{CodecError, Result};
pub use sink::ByteSink;
pub use value::Value;
