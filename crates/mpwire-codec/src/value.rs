/// A dynamic value with a direct wire representation.
///
/// `Array` and `Map` are distinct variants chosen by whoever builds the
/// value; the codec never guesses collection shape. Map pairs keep their
/// insertion order but the order carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    UnsignedInteger(u64),
    /// Integral floats are written with the integer width classes.
    Float(f64),
    /// Text or byte string; the wire format does not tell them apart.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// A host reference (function, handle, resource) with no wire form.
    /// Encoding it always fails with `CodecError::UnsupportedValueType`.
    Opaque(String),
}

impl Value {
    /// Short name of the variant, used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::UnsignedInteger(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of any numeric variant that holds an exact i64.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Integer(v) => Some(v),
            Value::UnsignedInteger(v) => i64::try_from(v).ok(),
            Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => None,
        }
    }

    /// Integer view of any numeric variant that holds an exact u64.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Integer(v) => u64::try_from(v).ok(),
            Value::UnsignedInteger(v) => Some(v),
            Value::Float(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
                Some(f as u64)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Integer(v) => Some(v as f64),
            Value::UnsignedInteger(v) => Some(v as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The string payload, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a map entry by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_bytes() == Some(key.as_bytes()))
            .map(|(_, v)| v)
    }

    /// Build a collection from host key/value entries.
    ///
    /// The result is an `Array` only when the keys are exactly the integers
    /// `1..=n` (in any order, each once); elements are placed by key. Any
    /// other key set, including an empty one, produces a `Map` with the
    /// entries in their given order. Nothing is dropped in either case.
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Self {
        let n = entries.len();
        if n == 0 {
            return Value::Map(entries);
        }

        let mut seen = vec![false; n];
        let is_sequence = entries
            .iter()
            .all(|(key, _)| match sequence_index(key, n) {
                Some(i) if !seen[i] => {
                    seen[i] = true;
                    true
                }
                _ => false,
            });
        if !is_sequence {
            return Value::Map(entries);
        }

        let mut slots: Vec<Option<Value>> = (0..n).map(|_| None).collect();
        for (key, value) in entries {
            if let Some(i) = sequence_index(&key, n) {
                slots[i] = Some(value);
            }
        }
        Value::Array(slots.into_iter().flatten().collect())
    }
}

/// Zero-based slot for a 1-based sequence key, if it is in `1..=n`.
fn sequence_index(key: &Value, n: usize) -> Option<usize> {
    let k = key.as_u64()?;
    if k >= 1 && k <= n as u64 {
        Some((k - 1) as usize)
    } else {
        None
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UnsignedInteger(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Bytes(v.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(v: Vec<(Value, Value)>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
