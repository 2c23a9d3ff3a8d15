//! Writer configuration.

/// Marker emitted for every bit-set in [`BitSetEncoding::Placeholder`] mode.
pub const BIT_SET_PLACEHOLDER: &str = "TODO: JSON BitVector";

/// Configuration for document output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Indent the serialized text.
    /// Defaults to `false` (one line).
    pub pretty: bool,

    /// How sparse bit-sets are written.
    /// Defaults to `Expand`.
    pub bit_sets: BitSetEncoding,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            bit_sets: BitSetEncoding::Expand,
        }
    }
}

impl WriterConfig {
    /// Create a new config that pretty-prints.
    pub fn with_pretty(pretty: bool) -> Self {
        Self {
            pretty,
            ..Default::default()
        }
    }

    /// Create a new config with the specified bit-set encoding.
    pub fn with_bit_sets(bit_sets: BitSetEncoding) -> Self {
        Self {
            bit_sets,
            ..Default::default()
        }
    }
}

/// Bit-set output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BitSetEncoding {
    /// Ascending array of members.
    #[default]
    Expand,
    /// The opaque [`BIT_SET_PLACEHOLDER`] string, for consumers of the
    /// older document layout.
    Placeholder,
}
