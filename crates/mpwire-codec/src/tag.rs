//! Tag byte assignments.
//!
//! Ranges are inclusive. Fixed-width families carry their payload in the low
//! bits of the tag itself.

pub const POSITIVE_FIXNUM_MAX: u8 = 0x7f;

pub const FIXMAP: u8 = 0x80;
pub const FIXMAP_MAX: u8 = 0x8f;
pub const FIXARRAY: u8 = 0x90;
pub const FIXARRAY_MAX: u8 = 0x9f;
pub const FIXSTR: u8 = 0xa0;
pub const FIXSTR_MAX: u8 = 0xbf;

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;

pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

pub const NEGATIVE_FIXNUM: u8 = 0xe0;

/// Longest string a fixstr tag can carry.
pub const FIXSTR_LEN_MAX: usize = 31;
/// Largest array/map a fix tag can carry.
pub const FIXCOLLECTION_LEN_MAX: usize = 15;
/// First length that no size class can carry (2^32 - 1).
pub const LEN_LIMIT: usize = u32::MAX as usize;

/// Human-readable family name for a tag byte.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        0x00..=POSITIVE_FIXNUM_MAX => "positive fixnum",
        FIXMAP..=FIXMAP_MAX => "fixmap",
        FIXARRAY..=FIXARRAY_MAX => "fixarray",
        FIXSTR..=FIXSTR_MAX => "fixstr",
        NIL => "nil",
        FALSE | TRUE => "bool",
        FLOAT32 => "float 32",
        FLOAT64 => "float 64",
        UINT8 => "uint 8",
        UINT16 => "uint 16",
        UINT32 => "uint 32",
        UINT64 => "uint 64",
        INT8 => "int 8",
        INT16 => "int 16",
        INT32 => "int 32",
        INT64 => "int 64",
        STR16 => "str 16",
        STR32 => "str 32",
        ARRAY16 => "array 16",
        ARRAY32 => "array 32",
        MAP16 => "map 16",
        MAP32 => "map 32",
        NEGATIVE_FIXNUM..=0xff => "negative fixnum",
        _ => "unknown",
    }
}
