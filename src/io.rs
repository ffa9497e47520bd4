//! The byte I/O adapter the codec is generic over.
//!
//! `Source`/`Sink` are plain traits monomorphized by the caller rather than
//! trait objects — there is no dynamic dispatch on the encode/decode hot
//! path. The concrete slice/`Vec`
//! adapters below are a cursor-advancing `&[u8]` walk for reading (a
//! blocking "read exactly N bytes" op) and a `Vec<u8>`-appending builder for
//! writing (a blocking "write all bytes" op).

use alloc::vec::Vec;

use crate::error::Error;

/// A blocking byte source: fill `buf` completely or fail.
///
/// Partial reads are a framing error (`Error::Reader`) — there is no
/// partial-progress API.
pub trait Source {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    /// Consumes exactly one byte.
    fn read_u8(&mut self) -> Result<u8, Error> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }
}

/// A blocking byte sink: accept all of `bytes` or fail.
pub trait Sink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

/// A `Source` reading from a borrowed, in-memory byte slice.
///
/// This is the concrete adapter `decode_from_slice` uses: an advancing
/// cursor over a `&[u8]`, behind the `Source` trait.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining, unconsumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl<'a> Source for SliceSource<'a> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let end = self.pos.checked_add(buf.len()).ok_or(Error::Reader)?;
        if end > self.data.len() {
            return Err(Error::Reader);
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// A `Sink` appending to an owned, growable byte buffer.
///
/// This is the concrete adapter `encode_to_vec` uses: a local `Vec<u8>`
/// builder behind the `Sink` trait.
pub struct VecSink<'a> {
    out: &'a mut Vec<u8>,
}

impl<'a> VecSink<'a> {
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out }
    }
}

impl<'a> Sink for VecSink<'a> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.out.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(feature = "std")]
mod std_adapters {
    use super::*;

    /// Adapts any `std::io::Read` into a [`Source`]; short reads surface as
    /// `Error::Reader`.
    pub struct IoSource<R> {
        inner: R,
    }

    impl<R: std::io::Read> IoSource<R> {
        pub fn new(inner: R) -> Self {
            Self { inner }
        }
    }

    impl<R: std::io::Read> Source for IoSource<R> {
        fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
            std::io::Read::read_exact(&mut self.inner, buf).map_err(|_| Error::Reader)
        }
    }

    /// Adapts any `std::io::Write` into a [`Sink`]; partial writes surface as
    /// `Error::Writer`.
    pub struct IoSink<W> {
        inner: W,
    }

    impl<W: std::io::Write> IoSink<W> {
        pub fn new(inner: W) -> Self {
            Self { inner }
        }
    }

    impl<W: std::io::Write> Sink for IoSink<W> {
        fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
            std::io::Write::write_all(&mut self.inner, bytes).map_err(|_| Error::Writer)
        }
    }
}

#[cfg(feature = "std")]
pub use std_adapters::{IoSink, IoSource};
