use bytes::Bytes;
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::sink::ByteSink;
use crate::tag;
use crate::value::Value;

/// Tags for one length-prefixed family (strings, arrays or maps).
#[derive(Debug, Clone, Copy)]
pub(crate) struct SizeClass {
    fix_tag: u8,
    fix_max: usize,
    tag16: u8,
    tag32: u8,
}

pub(crate) const STR_CLASS: SizeClass = SizeClass {
    fix_tag: tag::FIXSTR,
    fix_max: tag::FIXSTR_LEN_MAX,
    tag16: tag::STR16,
    tag32: tag::STR32,
};

pub(crate) const ARRAY_CLASS: SizeClass = SizeClass {
    fix_tag: tag::FIXARRAY,
    fix_max: tag::FIXCOLLECTION_LEN_MAX,
    tag16: tag::ARRAY16,
    tag32: tag::ARRAY32,
};

pub(crate) const MAP_CLASS: SizeClass = SizeClass {
    fix_tag: tag::FIXMAP,
    fix_max: tag::FIXCOLLECTION_LEN_MAX,
    tag16: tag::MAP16,
    tag32: tag::MAP32,
};

/// Integer encoding chosen for an integral float.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Integral {
    Unsigned(u64),
    Negative(i64),
}

/// Converts values into tag-prefixed bytes.
///
/// The encoder owns its output buffer and reuses the allocation across
/// calls; each [`encode`](Self::encode) starts from an empty sink. Taking
/// `&mut self` keeps a single encoder from being driven by two callers at
/// once.
#[derive(Debug)]
pub struct Encoder {
    sink: ByteSink,
    config: CodecConfig,
}

impl Encoder {
    /// Create an encoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create an encoder with explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            sink: ByteSink::new(config.max_encoded_size),
            config,
        }
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode one value.
    ///
    /// On error nothing is returned; bytes written before the failure are
    /// discarded.
    pub fn encode(&mut self, value: &Value) -> Result<Bytes> {
        self.sink.reset();
        if let Err(err) = self.encode_value(value, 0) {
            self.sink.fail(err);
        }

        let bytes = self
            .sink
            .finish()
            .inspect_err(|err| debug!(kind = value.kind(), error = %err, "encode failed"))?;
        debug!(kind = value.kind(), size = bytes.len(), "encoded value");
        Ok(bytes)
    }

    /// Pre-order walk over an explicit work list, so stack usage does not
    /// grow with value nesting.
    fn encode_value(&mut self, root: &Value, depth: usize) -> Result<usize> {
        let mut pending = vec![(root, depth)];
        let mut written = 0;

        while let Some((value, depth)) = pending.pop() {
            if depth > self.config.max_depth {
                return Err(CodecError::DepthLimitExceeded {
                    max: self.config.max_depth,
                });
            }

            written += match value {
                Value::Nil => self.sink.put_tag(tag::NIL)?,
                Value::Bool(false) => self.sink.put_tag(tag::FALSE)?,
                Value::Bool(true) => self.sink.put_tag(tag::TRUE)?,
                Value::Integer(v) if *v >= 0 => self.encode_unsigned(*v as u64)?,
                Value::Integer(v) => self.encode_negative(*v)?,
                Value::UnsignedInteger(v) => self.encode_unsigned(*v)?,
                Value::Float(f) => match integral(*f) {
                    Some(Integral::Unsigned(v)) => self.encode_unsigned(v)?,
                    Some(Integral::Negative(v)) => self.encode_negative(v)?,
                    None => self.sink.put_tag_f64(tag::FLOAT64, *f)?,
                },
                Value::Bytes(bytes) => {
                    let header = put_header(&mut self.sink, &STR_CLASS, bytes.len())?;
                    header + self.sink.append(bytes)?
                }
                Value::Array(items) => {
                    let header = put_header(&mut self.sink, &ARRAY_CLASS, items.len())?;
                    pending.extend(items.iter().rev().map(|item| (item, depth + 1)));
                    header
                }
                Value::Map(pairs) => {
                    let header = put_header(&mut self.sink, &MAP_CLASS, pairs.len())?;
                    for (key, val) in pairs.iter().rev() {
                        pending.push((val, depth + 1));
                        pending.push((key, depth + 1));
                    }
                    header
                }
                Value::Opaque(name) => {
                    return Err(CodecError::UnsupportedValueType(format!(
                        "opaque host value `{name}`"
                    )))
                }
            };
        }
        Ok(written)
    }

    fn encode_unsigned(&mut self, v: u64) -> Result<usize> {
        if v <= u64::from(tag::POSITIVE_FIXNUM_MAX) {
            self.sink.put_tag(v as u8)
        } else if let Ok(v) = u8::try_from(v) {
            self.sink.put_tag_u8(tag::UINT8, v)
        } else if let Ok(v) = u16::try_from(v) {
            self.sink.put_tag_u16(tag::UINT16, v)
        } else if let Ok(v) = u32::try_from(v) {
            self.sink.put_tag_u32(tag::UINT32, v)
        } else {
            self.sink.put_tag_u64(tag::UINT64, v)
        }
    }

    /// `v` must be negative.
    fn encode_negative(&mut self, v: i64) -> Result<usize> {
        if v >= -32 {
            self.sink.put_tag(tag::NEGATIVE_FIXNUM | (v as u8 & 0x1f))
        } else if let Ok(v) = i8::try_from(v) {
            self.sink.put_tag_u8(tag::INT8, v as u8)
        } else if let Ok(v) = i16::try_from(v) {
            self.sink.put_tag_u16(tag::INT16, v as u16)
        } else if let Ok(v) = i32::try_from(v) {
            self.sink.put_tag_u32(tag::INT32, v as u32)
        } else {
            self.sink.put_tag_u64(tag::INT64, v as u64)
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the smallest legal length header of `class` for `len`.
pub(crate) fn put_header(sink: &mut ByteSink, class: &SizeClass, len: usize) -> Result<usize> {
    if len <= class.fix_max {
        sink.put_tag(class.fix_tag | len as u8)
    } else if let Ok(len) = u16::try_from(len) {
        sink.put_tag_u16(class.tag16, len)
    } else if len < tag::LEN_LIMIT {
        sink.put_tag_u32(class.tag32, len as u32)
    } else {
        Err(sink.fail(CodecError::SizeOverflow { len }))
    }
}

/// Integer form of a finite, integral float that fits 64 bits.
fn integral(f: f64) -> Option<Integral> {
    // 2^64 and -2^63, both exact in f64.
    const U64_END: f64 = 18_446_744_073_709_551_616.0;
    const I64_MIN: f64 = -9_223_372_036_854_775_808.0;

    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f >= 0.0 {
        (f < U64_END).then_some(Integral::Unsigned(f as u64))
    } else {
        (f >= I64_MIN).then_some(Integral::Negative(f as i64))
    }
}

/// Encode a value with the default configuration.
pub fn encode(value: &Value) -> Result<Bytes> {
    Encoder::new().encode(value)
}

/// Encode a value with explicit limits.
pub fn encode_with_config(value: &Value, config: CodecConfig) -> Result<Bytes> {
    Encoder::with_config(config).encode(value)
}
