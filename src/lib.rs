#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

// Needed for Vec
extern crate alloc;

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod io;
pub mod limits;
pub mod marker;
pub mod payload;
pub mod timestamp;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::Error;
pub use limits::ParseLimits;
pub use payload::{Ext, Payload};
pub use timestamp::Timestamp;

use alloc::vec::Vec;

use crate::io::{SliceSource, VecSink};

/// Encodes `value` into a freshly allocated byte buffer.
///
/// Convenience wrapper around [`Encoder`] for the common all-in-memory case.
pub fn encode_to_vec(value: &Payload) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut encoder = Encoder::new(VecSink::new(&mut out));
    encoder.encode(value)?;
    Ok(out)
}

/// Decodes exactly one MessagePack value from `bytes`, using the default
/// [`ParseLimits`].
pub fn decode_from_slice(bytes: &[u8]) -> Result<Payload, Error> {
    decode_from_slice_with_limits(bytes, ParseLimits::default())
}

/// As [`decode_from_slice`], but with caller-supplied [`ParseLimits`].
pub fn decode_from_slice_with_limits(bytes: &[u8], limits: ParseLimits) -> Result<Payload, Error> {
    let mut decoder = Decoder::with_limits(SliceSource::new(bytes), limits);
    decoder.decode()
}
