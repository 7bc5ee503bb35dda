/// Default ceiling for a single encoded value: 1 MiB.
pub const DEFAULT_MAX_ENCODED_SIZE: usize = 1024 * 1024;

/// Default maximum nesting depth of arrays/maps.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Limits applied by the encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum encoded size in bytes. Default: 1 MiB.
    pub max_encoded_size: usize,
    /// Maximum array/map nesting depth. A top-level scalar is depth 0,
    /// the elements of a top-level array are depth 1. Default: 512.
    pub max_depth: usize,
}

impl CodecConfig {
    /// Config with no output ceiling; the sink grows as needed.
    pub fn unbounded() -> Self {
        Self {
            max_encoded_size: usize::MAX,
            ..Self::default()
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_encoded_size: DEFAULT_MAX_ENCODED_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
