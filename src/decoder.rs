//! The bounded decoder.
//!
//! This follows two load-bearing habits: validate a declared length
//! against a ceiling *before* allocating anything for it, and advance a
//! cursor rather than recursing through a parser combinator. Because the
//! input is untrusted, nesting depth is bounded by an explicit
//! heap-allocated work stack of open containers rather than the host call
//! stack: a hostile 64KB input with one array marker every two bytes can
//! still only nest as deep as `ParseLimits::max_depth` allows, never as deep
//! as the input is long.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder};

use crate::error::Error;
use crate::io::Source;
use crate::limits::ParseLimits;
use crate::marker::{self, Marker};
use crate::payload::{Ext, Payload};
use crate::timestamp::Timestamp;

/// One value read off the wire before its container (if any) is resolved: a
/// complete scalar, or the opening marker of an array/map whose elements
/// still need to be read.
enum Next {
    Scalar(Payload),
    StartArray(usize),
    StartMap(usize),
}

/// One level of in-progress container on the decoder's explicit work stack.
enum Frame {
    Array {
        items: Vec<Payload>,
        len: usize,
    },
    Map {
        entries: BTreeMap<Vec<u8>, Payload>,
        /// Pairs still to be read off the wire. Tracked separately from
        /// `entries.len()`: a wire map may repeat a key, in which case
        /// `BTreeMap::insert` collapses it into an existing slot and
        /// `entries.len()` no longer equals the number of pairs consumed.
        remaining_pairs: usize,
        /// `Some(key)` once a key has been read and its value is pending.
        pending_key: Option<Vec<u8>>,
    },
}

/// Decodes [`Payload`] values from a [`Source`], enforcing [`ParseLimits`].
///
/// Generic over the source type, matching [`crate::Encoder`]'s no-dynamic-
/// dispatch design.
pub struct Decoder<R> {
    source: R,
    limits: ParseLimits,
}

impl<R: Source> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self::with_limits(source, ParseLimits::default())
    }

    pub fn with_limits(source: R, limits: ParseLimits) -> Self {
        Self { source, limits }
    }

    /// Decodes exactly one MessagePack value. Leaves any following bytes in
    /// the source untouched, so callers may decode a sequence of values back
    /// to back from the same stream.
    pub fn decode(&mut self) -> Result<Payload, Error> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut pending = self.read_next()?;

        loop {
            let mut value = match pending {
                Next::Scalar(v) => v,
                Next::StartArray(len) => {
                    if len == 0 {
                        Payload::Array(Vec::new())
                    } else {
                        self.push_array_frame(&mut stack, len)?;
                        pending = self.read_next()?;
                        continue;
                    }
                }
                Next::StartMap(len) => {
                    if len == 0 {
                        Payload::Map(BTreeMap::new())
                    } else {
                        self.push_map_frame(&mut stack, len)?;
                        pending = self.read_next()?;
                        continue;
                    }
                }
            };

            // Fold `value` upward into whatever containers it completes,
            // without recursing: each iteration pops at most one frame.
            loop {
                match stack.pop() {
                    None => return Ok(value),
                    Some(Frame::Array { mut items, len }) => {
                        debug_assert!(items.len() < len, "array frame popped after it was already full");
                        items.push(value);
                        if items.len() == len {
                            value = Payload::Array(items);
                            continue;
                        } else {
                            stack.push(Frame::Array { items, len });
                            break;
                        }
                    }
                    Some(Frame::Map {
                        mut entries,
                        remaining_pairs,
                        pending_key,
                    }) => match pending_key {
                        None => {
                            let key = match value {
                                Payload::Str(bytes) => bytes,
                                _ => return Err(Error::InvalidType),
                            };
                            stack.push(Frame::Map {
                                entries,
                                remaining_pairs,
                                pending_key: Some(key),
                            });
                            break;
                        }
                        Some(key) => {
                            debug_assert!(remaining_pairs > 0, "map frame popped after all pairs were read");
                            entries.insert(key, value);
                            let remaining_pairs = remaining_pairs - 1;
                            if remaining_pairs == 0 {
                                value = Payload::Map(entries);
                                continue;
                            } else {
                                stack.push(Frame::Map {
                                    entries,
                                    remaining_pairs,
                                    pending_key: None,
                                });
                                break;
                            }
                        }
                    },
                }
            }

            pending = self.read_next()?;
        }
    }

    fn push_array_frame(&self, stack: &mut Vec<Frame>, len: usize) -> Result<(), Error> {
        if stack.len() >= self.limits.max_depth {
            return Err(Error::MaxDepthExceeded);
        }
        stack.push(Frame::Array {
            items: Vec::with_capacity(len),
            len,
        });
        Ok(())
    }

    fn push_map_frame(&self, stack: &mut Vec<Frame>, len: usize) -> Result<(), Error> {
        if stack.len() >= self.limits.max_depth {
            return Err(Error::MaxDepthExceeded);
        }
        stack.push(Frame::Map {
            entries: BTreeMap::new(),
            remaining_pairs: len,
            pending_key: None,
        });
        Ok(())
    }

    /// Reads one marker and, for scalars, its full payload; for arrays/maps,
    /// only the declared length (the elements themselves come from later
    /// calls, driven by the work stack in [`Self::decode`]).
    fn read_next(&mut self) -> Result<Next, Error> {
        let byte = self.source.read_u8().map_err(|_| Error::TypeMarkerReading)?;
        match marker::marker_for(byte) {
            Marker::PositiveFixInt(v) => Ok(Next::Scalar(Payload::Uint(v as u64))),
            Marker::NegativeFixInt(v) => Ok(Next::Scalar(Payload::Int(v as i64))),
            // 0xc1 is reserved and never produced by a conforming encoder;
            // this codec treats it leniently as nil on decode (see `Marker::Reserved`).
            Marker::Nil | Marker::Reserved => Ok(Next::Scalar(Payload::Nil)),
            Marker::False => Ok(Next::Scalar(Payload::Bool(false))),
            Marker::True => Ok(Next::Scalar(Payload::Bool(true))),

            Marker::U8 => Ok(Next::Scalar(Payload::Uint(self.read_u8_payload()? as u64))),
            Marker::U16 => Ok(Next::Scalar(Payload::Uint(self.read_u16_be()? as u64))),
            Marker::U32 => Ok(Next::Scalar(Payload::Uint(self.read_u32_be()? as u64))),
            Marker::U64 => Ok(Next::Scalar(Payload::Uint(self.read_u64_be()?))),

            Marker::I8 => Ok(Next::Scalar(Payload::Int(self.read_u8_payload()? as i8 as i64))),
            Marker::I16 => Ok(Next::Scalar(Payload::Int(self.read_u16_be()? as i16 as i64))),
            Marker::I32 => Ok(Next::Scalar(Payload::Int(self.read_u32_be()? as i32 as i64))),
            Marker::I64 => Ok(Next::Scalar(Payload::Int(self.read_u64_be()? as i64))),

            Marker::F32 => {
                let mut buf = [0u8; 4];
                self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
                Ok(Next::Scalar(Payload::Float(BigEndian::read_f32(&buf) as f64)))
            }
            Marker::F64 => {
                let mut buf = [0u8; 8];
                self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
                Ok(Next::Scalar(Payload::Float(BigEndian::read_f64(&buf))))
            }

            Marker::FixStr(len) => self.read_str(len as usize),
            Marker::Str8 => {
                let len = self.read_len_u8()?;
                self.read_str(len)
            }
            Marker::Str16 => {
                let len = self.read_len_u16()?;
                self.read_str(len)
            }
            Marker::Str32 => {
                let len = self.read_len_u32()?;
                self.read_str(len)
            }

            Marker::Bin8 => {
                let len = self.read_len_u8()?;
                self.read_bin(len)
            }
            Marker::Bin16 => {
                let len = self.read_len_u16()?;
                self.read_bin(len)
            }
            Marker::Bin32 => {
                let len = self.read_len_u32()?;
                self.read_bin(len)
            }

            Marker::FixArray(len) => {
                self.check_array_len(len as usize)?;
                Ok(Next::StartArray(len as usize))
            }
            Marker::Array16 => {
                let len = self.read_len_u16()?;
                self.check_array_len(len)?;
                Ok(Next::StartArray(len))
            }
            Marker::Array32 => {
                let len = self.read_len_u32()?;
                self.check_array_len(len)?;
                Ok(Next::StartArray(len))
            }

            Marker::FixMap(len) => {
                self.check_map_len(len as usize)?;
                Ok(Next::StartMap(len as usize))
            }
            Marker::Map16 => {
                let len = self.read_len_u16()?;
                self.check_map_len(len)?;
                Ok(Next::StartMap(len))
            }
            Marker::Map32 => {
                let len = self.read_len_u32()?;
                self.check_map_len(len)?;
                Ok(Next::StartMap(len))
            }

            Marker::FixExt1 => self.read_ext(1),
            Marker::FixExt2 => self.read_ext(2),
            Marker::FixExt4 => self.read_ext(4),
            Marker::FixExt8 => self.read_ext(8),
            Marker::FixExt16 => self.read_ext(16),
            Marker::Ext8 => {
                let len = self.read_len_u8()?;
                self.read_ext(len)
            }
            Marker::Ext16 => {
                let len = self.read_len_u16()?;
                self.read_ext(len)
            }
            Marker::Ext32 => {
                let len = self.read_len_u32()?;
                self.read_ext(len)
            }
        }
    }

    fn read_u8_payload(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
        Ok(buf[0])
    }

    fn read_u16_be(&mut self) -> Result<u16, Error> {
        let mut buf = [0u8; 2];
        self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
        Ok(BigEndian::read_u16(&buf))
    }

    fn read_u32_be(&mut self) -> Result<u32, Error> {
        let mut buf = [0u8; 4];
        self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
        Ok(BigEndian::read_u32(&buf))
    }

    fn read_u64_be(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
        Ok(BigEndian::read_u64(&buf))
    }

    fn read_len_u8(&mut self) -> Result<usize, Error> {
        let mut buf = [0u8; 1];
        self.source.read_exact(&mut buf).map_err(|_| Error::LengthReading)?;
        Ok(buf[0] as usize)
    }

    fn read_len_u16(&mut self) -> Result<usize, Error> {
        let mut buf = [0u8; 2];
        self.source.read_exact(&mut buf).map_err(|_| Error::LengthReading)?;
        Ok(BigEndian::read_u16(&buf) as usize)
    }

    fn read_len_u32(&mut self) -> Result<usize, Error> {
        let mut buf = [0u8; 4];
        self.source.read_exact(&mut buf).map_err(|_| Error::LengthReading)?;
        Ok(BigEndian::read_u32(&buf) as usize)
    }

    fn check_array_len(&self, len: usize) -> Result<(), Error> {
        if len as u64 > self.limits.max_array_length as u64 {
            return Err(Error::ArrayTooLarge);
        }
        Ok(())
    }

    fn check_map_len(&self, len: usize) -> Result<(), Error> {
        if len as u64 > self.limits.max_map_size as u64 {
            return Err(Error::MapTooLarge);
        }
        Ok(())
    }

    /// Reads `len` bytes of str payload data. `len` must already have been
    /// validated against the relevant `ParseLimits` ceiling by the caller's
    /// marker branch before any allocation happens here.
    fn read_str(&mut self, len: usize) -> Result<Next, Error> {
        if len as u64 > self.limits.max_string_length as u64 {
            return Err(Error::StringTooLong);
        }
        Ok(Next::Scalar(Payload::Str(self.read_exact_bytes(len)?)))
    }

    fn read_bin(&mut self, len: usize) -> Result<Next, Error> {
        if len as u64 > self.limits.max_bin_length as u64 {
            return Err(Error::BinDataLengthTooLong);
        }
        Ok(Next::Scalar(Payload::Bin(self.read_exact_bytes(len)?)))
    }

    fn read_ext(&mut self, len: usize) -> Result<Next, Error> {
        if len as u64 > self.limits.max_ext_length as u64 {
            return Err(Error::ExtDataTooLarge);
        }
        let ext_type = self.read_u8_payload().map_err(|_| Error::ExtTypeReading)? as i8;
        let data = self.read_exact_bytes(len)?;
        Ok(Next::Scalar(ext_to_payload(ext_type, data)?))
    }

    fn read_exact_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; len];
        self.source.read_exact(&mut buf).map_err(|_| Error::DataReading)?;
        Ok(buf)
    }
}

/// Resolves a decoded `(type, data)` ext pair into either a [`Timestamp`] or
/// a generic [`Ext`], per the three recognized timestamp wire shapes
/// (fixext4, fixext8, ext8 of length 12). Any other length under
/// type `-1` is not a recognized timestamp encoding and is kept as a plain
/// `Ext` value.
fn ext_to_payload(ext_type: i8, data: Vec<u8>) -> Result<Payload, Error> {
    if ext_type == marker::EXT_TYPE_TIMESTAMP {
        match data.len() {
            4 => {
                let seconds = BigEndian::read_u32(&data) as i64;
                return Ok(Payload::Timestamp(Timestamp::from_seconds(seconds)));
            }
            8 => {
                let packed = BigEndian::read_u64(&data);
                let nanoseconds = (packed >> 34) as u32;
                let seconds = (packed & 0x3_ffff_ffff) as i64;
                return Ok(Payload::Timestamp(Timestamp::new(seconds, nanoseconds)?));
            }
            12 => {
                let nanoseconds = BigEndian::read_u32(&data[0..4]);
                let seconds = BigEndian::read_i64(&data[4..12]);
                return Ok(Payload::Timestamp(Timestamp::new(seconds, nanoseconds)?));
            }
            _ => {}
        }
    }
    Ok(Payload::Ext(Ext {
        r#type: ext_type,
        data,
    }))
}
