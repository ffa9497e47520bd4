//! The compact-encoding encoder.
//!
//! A straight per-arm walk over the dynamic `Payload` tree: each value
//! recurses only into its own direct children, naturally bounded by the
//! Rust call stack for nested containers, since encoding — unlike decoding
//! untrusted input — only ever recurses as deep as the caller's own
//! `Payload` tree, which the caller already built within its own stack
//! budget.

use byteorder::{BigEndian, ByteOrder};

use crate::error::Error;
use crate::io::Sink;
use crate::marker;
use crate::payload::{Ext, Payload};
use crate::timestamp::{Timestamp, TimestampFormat};

/// Encodes [`Payload`] values into a [`Sink`].
///
/// Generic over the sink type (no dynamic dispatch on the hot path), mirroring
/// no dynamic dispatch on the hot path. One `encode` call emits exactly one
/// top-level MessagePack value; there is no framing around it.
pub struct Encoder<S> {
    sink: S,
}

impl<S: Sink> Encoder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Consumes the encoder, returning the underlying sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn encode(&mut self, value: &Payload) -> Result<(), Error> {
        match value {
            Payload::Nil => self.write_u8(marker::NIL),
            Payload::Bool(b) => self.write_u8(if *b { marker::TRUE } else { marker::FALSE }),
            Payload::Uint(v) => self.encode_uint(*v),
            Payload::Int(v) => self.encode_int(*v),
            Payload::Float(v) => self.encode_float(*v),
            Payload::Str(bytes) => self.encode_str(bytes),
            Payload::Bin(bytes) => self.encode_bin(bytes),
            Payload::Array(items) => self.encode_array(items),
            Payload::Map(entries) => self.encode_map(entries),
            Payload::Ext(ext) => self.encode_ext(ext),
            Payload::Timestamp(ts) => self.encode_timestamp(ts),
        }
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), Error> {
        self.sink.write_all(&[byte]).map_err(|_| Error::TypeMarkerWriting)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.sink.write_all(bytes).map_err(|_| Error::DataWriting)
    }

    fn encode_uint(&mut self, v: u64) -> Result<(), Error> {
        if v <= 0x7f {
            self.write_u8(v as u8)
        } else if v <= 0xff {
            self.write_u8(marker::U8)?;
            self.write_bytes(&[v as u8])
        } else if v <= 0xffff {
            self.write_u8(marker::U16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, v as u16);
            self.write_bytes(&buf)
        } else if v <= 0xffff_ffff {
            self.write_u8(marker::U32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_u32(&mut buf, v as u32);
            self.write_bytes(&buf)
        } else {
            self.write_u8(marker::U64)?;
            let mut buf = [0u8; 8];
            BigEndian::write_u64(&mut buf, v);
            self.write_bytes(&buf)
        }
    }

    fn encode_int(&mut self, v: i64) -> Result<(), Error> {
        if v >= 0 {
            return self.encode_uint(v as u64);
        }
        if v >= -32 {
            self.write_u8(v as i8 as u8)
        } else if v >= -128 {
            self.write_u8(marker::I8)?;
            self.write_bytes(&[v as i8 as u8])
        } else if v >= -32768 {
            self.write_u8(marker::I16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_i16(&mut buf, v as i16);
            self.write_bytes(&buf)
        } else if v >= -2_147_483_648 {
            self.write_u8(marker::I32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_i32(&mut buf, v as i32);
            self.write_bytes(&buf)
        } else {
            self.write_u8(marker::I64)?;
            let mut buf = [0u8; 8];
            BigEndian::write_i64(&mut buf, v);
            self.write_bytes(&buf)
        }
    }

    fn encode_float(&mut self, v: f64) -> Result<(), Error> {
        if fits_f32(v) {
            self.write_u8(marker::F32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_f32(&mut buf, v as f32);
            self.write_bytes(&buf)
        } else {
            self.write_u8(marker::F64)?;
            let mut buf = [0u8; 8];
            BigEndian::write_f64(&mut buf, v);
            self.write_bytes(&buf)
        }
    }

    fn encode_str(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let len = bytes.len();
        if len <= marker::FIXSTR_MAX_LEN {
            self.write_u8(marker::FIXSTR_BASE | len as u8)?;
        } else if len <= 0xff {
            self.write_u8(marker::STR8)?;
            self.write_bytes(&[len as u8])?;
        } else if len <= 0xffff {
            self.write_u8(marker::STR16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, len as u16);
            self.write_bytes(&buf)?;
        } else if len as u64 <= 0xffff_ffff {
            self.write_u8(marker::STR32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_u32(&mut buf, len as u32);
            self.write_bytes(&buf)?;
        } else {
            return Err(Error::StrDataLengthTooLong);
        }
        self.write_bytes(bytes)
    }

    fn encode_bin(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let len = bytes.len();
        if len <= 0xff {
            self.write_u8(marker::BIN8)?;
            self.write_bytes(&[len as u8])?;
        } else if len <= 0xffff {
            self.write_u8(marker::BIN16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, len as u16);
            self.write_bytes(&buf)?;
        } else if len as u64 <= 0xffff_ffff {
            self.write_u8(marker::BIN32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_u32(&mut buf, len as u32);
            self.write_bytes(&buf)?;
        } else {
            return Err(Error::BinDataLengthTooLong);
        }
        self.write_bytes(bytes)
    }

    fn encode_array(&mut self, items: &[Payload]) -> Result<(), Error> {
        let len = items.len();
        if len <= marker::FIXARRAY_MAX_LEN {
            self.write_u8(marker::FIXARRAY_BASE | len as u8)?;
        } else if len <= 0xffff {
            self.write_u8(marker::ARRAY16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, len as u16);
            self.write_bytes(&buf)?;
        } else if len as u64 <= 0xffff_ffff {
            self.write_u8(marker::ARRAY32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_u32(&mut buf, len as u32);
            self.write_bytes(&buf)?;
        } else {
            return Err(Error::ArrayLengthTooLong);
        }
        for item in items {
            self.encode(item)?;
        }
        Ok(())
    }

    fn encode_map(
        &mut self,
        entries: &alloc::collections::BTreeMap<alloc::vec::Vec<u8>, Payload>,
    ) -> Result<(), Error> {
        let len = entries.len();
        if len <= marker::FIXMAP_MAX_LEN {
            self.write_u8(marker::FIXMAP_BASE | len as u8)?;
        } else if len <= 0xffff {
            self.write_u8(marker::MAP16)?;
            let mut buf = [0u8; 2];
            BigEndian::write_u16(&mut buf, len as u16);
            self.write_bytes(&buf)?;
        } else if len as u64 <= 0xffff_ffff {
            self.write_u8(marker::MAP32)?;
            let mut buf = [0u8; 4];
            BigEndian::write_u32(&mut buf, len as u32);
            self.write_bytes(&buf)?;
        } else {
            return Err(Error::MapLengthTooLong);
        }
        for (key, value) in entries {
            self.encode_str(key)?;
            self.encode(value)?;
        }
        Ok(())
    }

    fn encode_ext(&mut self, ext: &Ext) -> Result<(), Error> {
        let len = ext.data.len();
        match len {
            1 => self.write_u8(marker::FIXEXT1)?,
            2 => self.write_u8(marker::FIXEXT2)?,
            4 => self.write_u8(marker::FIXEXT4)?,
            8 => self.write_u8(marker::FIXEXT8)?,
            16 => self.write_u8(marker::FIXEXT16)?,
            _ if len <= 0xff => {
                self.write_u8(marker::EXT8)?;
                self.write_bytes(&[len as u8])?;
            }
            _ if len <= 0xffff => {
                self.write_u8(marker::EXT16)?;
                let mut buf = [0u8; 2];
                BigEndian::write_u16(&mut buf, len as u16);
                self.write_bytes(&buf)?;
            }
            _ if len as u64 <= 0xffff_ffff => {
                self.write_u8(marker::EXT32)?;
                let mut buf = [0u8; 4];
                BigEndian::write_u32(&mut buf, len as u32);
                self.write_bytes(&buf)?;
            }
            _ => return Err(Error::ExtTypeLength),
        }
        self.write_bytes(&[ext.r#type as u8])?;
        self.write_bytes(&ext.data)
    }

    fn encode_timestamp(&mut self, ts: &Timestamp) -> Result<(), Error> {
        match ts.wire_format()? {
            TimestampFormat::Timestamp32 => {
                self.write_u8(marker::FIXEXT4)?;
                self.write_bytes(&[marker::EXT_TYPE_TIMESTAMP as u8])?;
                let mut buf = [0u8; 4];
                BigEndian::write_u32(&mut buf, ts.seconds as u32);
                self.write_bytes(&buf)
            }
            TimestampFormat::Timestamp64 => {
                self.write_u8(marker::FIXEXT8)?;
                self.write_bytes(&[marker::EXT_TYPE_TIMESTAMP as u8])?;
                let packed = ((ts.nanoseconds as u64) << 34) | (ts.seconds as u64);
                let mut buf = [0u8; 8];
                BigEndian::write_u64(&mut buf, packed);
                self.write_bytes(&buf)
            }
            TimestampFormat::Timestamp96 => {
                self.write_u8(marker::EXT8)?;
                self.write_bytes(&[12u8])?;
                self.write_bytes(&[marker::EXT_TYPE_TIMESTAMP as u8])?;
                let mut ns_buf = [0u8; 4];
                BigEndian::write_u32(&mut ns_buf, ts.nanoseconds);
                self.write_bytes(&ns_buf)?;
                let mut s_buf = [0u8; 8];
                BigEndian::write_i64(&mut s_buf, ts.seconds);
                self.write_bytes(&s_buf)
            }
        }
    }
}

/// True if `v`'s magnitude lies within `f32`'s representable interval: zero,
/// or between `f32::MIN_POSITIVE` and `f32::MAX` (spec.md §4.4). This is a
/// magnitude check, not a round-trip check: `3.14_f64` narrows to `f32` and
/// back as `3.140000104904175`, losing precision, but its magnitude still
/// fits, so the encoder still picks the narrower FLOAT32 form.
fn fits_f32(v: f64) -> bool {
    let magnitude = v.abs();
    magnitude == 0.0 || (f32::MIN_POSITIVE as f64..=f32::MAX as f64).contains(&magnitude)
}
