//! Decoder configuration: the ceilings a hostile or malformed input cannot exceed.
//!
//! Each ceiling is a field on a small config record rather than a crate-wide
//! constant, since a single codec instance may be configured per caller.
//! The enforcement discipline is always the same: a declared length is read,
//! validated against its limit, and only then is storage reserved for it.

/// Ceilings enforced by [`crate::Decoder`] while parsing untrusted input.
///
/// A `Decoder` is constructed with exactly one `ParseLimits`; it is checked
/// before allocating the buffer or container the corresponding limit guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum nesting depth of arrays/maps. Exceeding it fails with
    /// [`crate::Error::MaxDepthExceeded`].
    pub max_depth: usize,
    /// Maximum element count of a single array. Exceeding it fails with
    /// [`crate::Error::ArrayTooLarge`].
    pub max_array_length: u32,
    /// Maximum entry count of a single map. Exceeding it fails with
    /// [`crate::Error::MapTooLarge`].
    pub max_map_size: u32,
    /// Maximum byte length of a single str. Exceeding it fails with
    /// [`crate::Error::StringTooLong`].
    pub max_string_length: u32,
    /// Maximum byte length of a single bin. Exceeding it fails with
    /// [`crate::Error::BinDataLengthTooLong`].
    pub max_bin_length: u32,
    /// Maximum byte length of a single ext payload. Exceeding it fails with
    /// [`crate::Error::ExtDataTooLarge`].
    pub max_ext_length: u32,
}

/// Default nesting depth: generous enough for any realistic document, too
/// shallow to let adversarial input grow the decoder's work stack unbounded.
pub const DEFAULT_MAX_DEPTH: usize = 1000;
pub const DEFAULT_MAX_ARRAY_LENGTH: u32 = 1_000_000;
pub const DEFAULT_MAX_MAP_SIZE: u32 = 1_000_000;
pub const DEFAULT_MAX_BYTE_LENGTH: u32 = 100 * 1024 * 1024; // 100 MiB

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_map_size: DEFAULT_MAX_MAP_SIZE,
            max_string_length: DEFAULT_MAX_BYTE_LENGTH,
            max_bin_length: DEFAULT_MAX_BYTE_LENGTH,
            max_ext_length: DEFAULT_MAX_BYTE_LENGTH,
        }
    }
}

impl ParseLimits {
    /// Limits with every ceiling set to `n`; convenient for tests that only
    /// care about one dimension at a time.
    pub const fn uniform(n: u32, depth: usize) -> Self {
        Self {
            max_depth: depth,
            max_array_length: n,
            max_map_size: n,
            max_string_length: n,
            max_bin_length: n,
            max_ext_length: n,
        }
    }
}
