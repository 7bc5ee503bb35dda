use tracing::debug;

use crate::config::CodecConfig;
use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use crate::tag;
use crate::value::Value;

/// Reconstructs values from untrusted bytes.
///
/// Every width check happens before the cursor advances, so malformed or
/// truncated input produces an error rather than a panic. Declared
/// collection sizes are checked against the remaining input before any
/// allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode the first value in `input`.
    ///
    /// Returns the value and the number of bytes it occupied; trailing bytes
    /// are left for the caller. Empty input decodes to `(Nil, 0)`.
    pub fn decode(&self, input: &[u8]) -> Result<(Value, usize)> {
        if input.is_empty() {
            return Ok((Value::Nil, 0));
        }

        let mut cursor = ByteCursor::new(input);
        let value = self
            .decode_value(&mut cursor, 0)
            .inspect_err(|err| debug!(input_len = input.len(), error = %err, "decode failed"))?;
        debug!(kind = value.kind(), consumed = cursor.offset(), "decoded value");
        Ok((value, cursor.offset()))
    }

    /// Iterate over back-to-back values in `input`.
    pub fn iter<'a>(&self, input: &'a [u8]) -> ValueIter<'a> {
        ValueIter {
            decoder: *self,
            cursor: ByteCursor::new(input),
            done: false,
        }
    }

    /// Decode every value in `input`, failing on the first malformed one.
    pub fn decode_all(&self, input: &[u8]) -> Result<Vec<Value>> {
        self.iter(input).collect()
    }

    /// Decode one value at the cursor position.
    ///
    /// Nested collections are tracked on an explicit stack, so stack usage
    /// does not grow with input nesting. `depth` is the nesting level of the
    /// value at the cursor. Errors are recorded on the cursor and stay
    /// sticky.
    pub fn decode_value(&self, cursor: &mut ByteCursor<'_>, depth: usize) -> Result<Value> {
        let mut open: Vec<Collection> = Vec::new();

        'values: loop {
            if depth + open.len() > self.config.max_depth {
                return Err(cursor.fail(CodecError::DepthLimitExceeded {
                    max: self.config.max_depth,
                }));
            }

            let mut value = match decode_item(cursor)? {
                Item::Value(value) => value,
                Item::Array(0) => Value::Array(Vec::new()),
                Item::Map(0) => Value::Map(Vec::new()),
                Item::Array(len) => {
                    // Each element occupies at least one byte.
                    cursor.ensure(len)?;
                    open.push(Collection::array(len));
                    continue;
                }
                Item::Map(len) => {
                    cursor.ensure(len.saturating_mul(2))?;
                    open.push(Collection::map(len));
                    continue;
                }
            };

            while let Some(mut parent) = open.pop() {
                if !parent.push(value) {
                    open.push(parent);
                    continue 'values;
                }
                value = parent.into_value();
            }
            return Ok(value);
        }
    }
}

/// One tag's worth of input: a complete scalar or a collection header.
enum Item {
    Value(Value),
    Array(usize),
    Map(usize),
}

/// A collection whose elements are still being decoded.
enum Collection {
    Array {
        items: Vec<Value>,
        len: usize,
    },
    Map {
        pairs: Vec<(Value, Value)>,
        key: Option<Value>,
        len: usize,
    },
}

impl Collection {
    fn array(len: usize) -> Self {
        Collection::Array {
            items: Vec::with_capacity(len),
            len,
        }
    }

    fn map(len: usize) -> Self {
        Collection::Map {
            pairs: Vec::with_capacity(len),
            key: None,
            len,
        }
    }

    /// Add the next decoded element. Returns true once the collection is full.
    fn push(&mut self, value: Value) -> bool {
        match self {
            Collection::Array { items, len } => {
                items.push(value);
                items.len() == *len
            }
            Collection::Map { pairs, key, len } => match key.take() {
                None => {
                    *key = Some(value);
                    false
                }
                Some(k) => {
                    pairs.push((k, value));
                    pairs.len() == *len
                }
            },
        }
    }

    fn into_value(self) -> Value {
        match self {
            Collection::Array { items, .. } => Value::Array(items),
            Collection::Map { pairs, .. } => Value::Map(pairs),
        }
    }
}

/// Read one tag and its fixed-width payload.
fn decode_item(cursor: &mut ByteCursor<'_>) -> Result<Item> {
    let offset = cursor.offset();
    let t = cursor.read_u8()?;
    let value = match t {
        0x00..=tag::POSITIVE_FIXNUM_MAX => Value::Integer(t.into()),
        tag::FIXMAP..=tag::FIXMAP_MAX => return Ok(Item::Map(usize::from(t & 0x0f))),
        tag::FIXARRAY..=tag::FIXARRAY_MAX => return Ok(Item::Array(usize::from(t & 0x0f))),
        tag::FIXSTR..=tag::FIXSTR_MAX => decode_str(cursor, usize::from(t & 0x1f))?,
        tag::NIL => Value::Nil,
        tag::FALSE => Value::Bool(false),
        tag::TRUE => Value::Bool(true),
        tag::FLOAT32 => Value::Float(cursor.read_f32()?.into()),
        tag::FLOAT64 => Value::Float(cursor.read_f64()?),
        tag::UINT8 => unsigned(cursor.read_u8()?.into()),
        tag::UINT16 => unsigned(cursor.read_u16()?.into()),
        tag::UINT32 => unsigned(cursor.read_u32()?.into()),
        tag::UINT64 => unsigned(cursor.read_u64()?),
        tag::INT8 => Value::Integer(cursor.read_i8()?.into()),
        tag::INT16 => Value::Integer(cursor.read_i16()?.into()),
        tag::INT32 => Value::Integer(cursor.read_i32()?.into()),
        tag::INT64 => Value::Integer(cursor.read_i64()?),
        tag::STR16 => {
            let len = usize::from(cursor.read_u16()?);
            decode_str(cursor, len)?
        }
        tag::STR32 => {
            let len = cursor.read_u32()? as usize;
            decode_str(cursor, len)?
        }
        tag::ARRAY16 => return Ok(Item::Array(usize::from(cursor.read_u16()?))),
        tag::ARRAY32 => return Ok(Item::Array(cursor.read_u32()? as usize)),
        tag::MAP16 => return Ok(Item::Map(usize::from(cursor.read_u16()?))),
        tag::MAP32 => return Ok(Item::Map(cursor.read_u32()? as usize)),
        tag::NEGATIVE_FIXNUM..=0xff => Value::Integer((t as i8).into()),
        _ => return Err(cursor.fail(CodecError::UnknownTag { tag: t, offset })),
    };
    Ok(Item::Value(value))
}

fn decode_str(cursor: &mut ByteCursor<'_>, len: usize) -> Result<Value> {
    Ok(Value::Bytes(cursor.take(len)?.to_vec()))
}

/// Non-negative integers that fit i64 decode as `Integer`.
fn unsigned(v: u64) -> Value {
    i64::try_from(v).map_or(Value::UnsignedInteger(v), Value::Integer)
}

/// Iterator over concatenated values in one buffer.
///
/// Stops after the input is exhausted or after the first error.
#[derive(Debug)]
pub struct ValueIter<'a> {
    decoder: Decoder,
    cursor: ByteCursor<'a>,
    done: bool,
}

impl ValueIter<'_> {
    /// Bytes consumed by the values yielded so far.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }
}

impl Iterator for ValueIter<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_exhausted() {
            return None;
        }
        match self.decoder.decode_value(&mut self.cursor, 0) {
            Ok(value) => Some(Ok(value)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode the first value in `input` with the default configuration.
pub fn decode(input: &[u8]) -> Result<(Value, usize)> {
    Decoder::new().decode(input)
}

/// Decode the first value in `input` with explicit limits.
pub fn decode_with_config(input: &[u8], config: CodecConfig) -> Result<(Value, usize)> {
    Decoder::with_config(config).decode(input)
}
