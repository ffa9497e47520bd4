//! The MessagePack timestamp extension (type -1), overlaid on the generic
//! ext machinery with three selectable wire widths.
//!
//! The "variant byte" here is the ext type (`-1` selects timestamp, anything
//! else is a generic ext), and the format-selection logic lives in
//! `Timestamp::wire_format`.

use crate::error::Error;

/// A MessagePack timestamp: seconds since the Unix epoch plus a nanosecond
/// remainder in `[0, 999_999_999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

/// The three physical shapes a timestamp may take on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `fixext4`: u32 seconds, nanoseconds implicitly zero.
    Timestamp32,
    /// `fixext8`: `(ns << 34) | seconds` packed into a u64.
    Timestamp64,
    /// `ext8` with length 12: u32 nanoseconds then i64 seconds.
    Timestamp96,
}

/// 2^34 - 1, the largest second value representable by the 64-bit format
/// (34 bits of seconds packed alongside 30 bits of nanoseconds).
const MAX_SECONDS_34_BIT: i64 = (1i64 << 34) - 1;
const MAX_NANOSECONDS: u32 = 999_999_999;

impl Timestamp {
    /// Constructs a timestamp from seconds and nanoseconds.
    ///
    /// Fails with `Error::InputValueTooLarge` if `nanoseconds` is not in
    /// `[0, 999_999_999]`.
    pub fn new(seconds: i64, nanoseconds: u32) -> Result<Self, Error> {
        if nanoseconds > MAX_NANOSECONDS {
            return Err(Error::InputValueTooLarge);
        }
        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Constructs a timestamp with zero nanoseconds.
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds: 0,
        }
    }

    /// Chooses the narrowest wire format that can losslessly represent this
    /// timestamp.
    pub fn wire_format(&self) -> Result<TimestampFormat, Error> {
        if self.nanoseconds == 0 && (0..=u32::MAX as i64).contains(&self.seconds) {
            return Ok(TimestampFormat::Timestamp32);
        }
        if self.seconds >= 0 && self.seconds <= MAX_SECONDS_34_BIT {
            return Ok(TimestampFormat::Timestamp64);
        }
        // nanoseconds is always <= 999_999_999 by construction (see `new`); any
        // (seconds, nanoseconds) pair that reaches here fits the 96-bit format.
        Ok(TimestampFormat::Timestamp96)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_nanoseconds() {
        assert_eq!(
            Timestamp::new(0, 1_000_000_000),
            Err(Error::InputValueTooLarge)
        );
        assert!(Timestamp::new(0, 999_999_999).is_ok());
    }

    #[test]
    fn picks_32_bit_format() {
        let ts = Timestamp::new(1234567890, 0).unwrap();
        assert_eq!(ts.wire_format().unwrap(), TimestampFormat::Timestamp32);
    }

    #[test]
    fn picks_96_bit_format_for_negative_seconds() {
        let ts = Timestamp::new(-1_000_000_000, 123_456_789).unwrap();
        assert_eq!(ts.wire_format().unwrap(), TimestampFormat::Timestamp96);
    }

    #[test]
    fn picks_64_bit_format_for_nonzero_nanoseconds_in_range() {
        let ts = Timestamp::new(1_000, 500).unwrap();
        assert_eq!(ts.wire_format().unwrap(), TimestampFormat::Timestamp64);
    }
}
