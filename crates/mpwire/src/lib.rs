//! Compact self-describing binary value encoding with a strict decoder.
//!
//! mpwire encodes a small dynamic value model (nil, booleans, numbers,
//! strings, arrays, maps) into a MessagePack-family wire format and decodes
//! it back from untrusted bytes without panicking.
//!
//! # Crate Structure
//!
//! - [`codec`] — Value model, encoder, decoder and their limits
//! - `codec::json` — JSON conversion (behind `json` feature)

/// Re-export codec types.
pub mod codec {
    pub use mpwire_codec::*;
}

pub use mpwire_codec::{decode, encode, CodecConfig, CodecError, Decoder, Encoder, Value};
