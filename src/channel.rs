//! Byte sources feeding the decoder.

use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, Bytes};

use crate::error::MsgPackError;

/// A blocking byte source delivering sized big-endian reads.
///
/// Multi-byte integers and floats are big-endian, per the MessagePack
/// format. A sized read that hits the end of the source fails with
/// [`MsgPackError::UnexpectedEof`]; other I/O failures pass through
/// unchanged.
pub trait Channel {
    fn read_byte(&mut self) -> Result<u8, MsgPackError>;
    fn read_short(&mut self) -> Result<i16, MsgPackError>;
    fn read_int(&mut self) -> Result<i32, MsgPackError>;
    fn read_long(&mut self) -> Result<i64, MsgPackError>;
    fn read_float(&mut self) -> Result<f32, MsgPackError>;
    fn read_double(&mut self) -> Result<f64, MsgPackError>;

    /// Fills as much of `dst` as is available, returning the number of
    /// bytes written. Zero means the source is exhausted.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize, MsgPackError>;

    /// Releases the underlying source.
    fn close(&mut self) -> Result<(), MsgPackError>;
}

/// Adapts any blocking [`std::io::Read`] source (file, socket, ...).
pub struct ReadChannel<R> {
    inner: R,
}

impl<R: Read> ReadChannel<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

fn map_read_err(e: io::Error) -> MsgPackError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        MsgPackError::UnexpectedEof
    } else {
        MsgPackError::Io(e)
    }
}

impl<R: Read> Channel for ReadChannel<R> {
    fn read_byte(&mut self) -> Result<u8, MsgPackError> {
        self.inner.read_u8().map_err(map_read_err)
    }

    fn read_short(&mut self) -> Result<i16, MsgPackError> {
        self.inner.read_i16::<BigEndian>().map_err(map_read_err)
    }

    fn read_int(&mut self) -> Result<i32, MsgPackError> {
        self.inner.read_i32::<BigEndian>().map_err(map_read_err)
    }

    fn read_long(&mut self) -> Result<i64, MsgPackError> {
        self.inner.read_i64::<BigEndian>().map_err(map_read_err)
    }

    fn read_float(&mut self) -> Result<f32, MsgPackError> {
        self.inner.read_f32::<BigEndian>().map_err(map_read_err)
    }

    fn read_double(&mut self) -> Result<f64, MsgPackError> {
        self.inner.read_f64::<BigEndian>().map_err(map_read_err)
    }

    fn read(&mut self, dst: &mut [u8]) -> Result<usize, MsgPackError> {
        loop {
            match self.inner.read(dst) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MsgPackError::Io(e)),
            }
        }
    }

    fn close(&mut self) -> Result<(), MsgPackError> {
        Ok(())
    }
}

/// Serves a fully buffered message from memory.
pub struct BytesChannel {
    buf: Bytes,
}

impl BytesChannel {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    fn ensure_remaining(&self, needed: usize) -> Result<(), MsgPackError> {
        if self.buf.remaining() < needed {
            Err(MsgPackError::UnexpectedEof)
        } else {
            Ok(())
        }
    }
}

impl Channel for BytesChannel {
    fn read_byte(&mut self) -> Result<u8, MsgPackError> {
        self.ensure_remaining(1)?;
        Ok(self.buf.get_u8())
    }

    fn read_short(&mut self) -> Result<i16, MsgPackError> {
        self.ensure_remaining(2)?;
        Ok(self.buf.get_i16())
    }

    fn read_int(&mut self) -> Result<i32, MsgPackError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_i32())
    }

    fn read_long(&mut self) -> Result<i64, MsgPackError> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_i64())
    }

    fn read_float(&mut self) -> Result<f32, MsgPackError> {
        self.ensure_remaining(4)?;
        Ok(self.buf.get_f32())
    }

    fn read_double(&mut self) -> Result<f64, MsgPackError> {
        self.ensure_remaining(8)?;
        Ok(self.buf.get_f64())
    }

    fn read(&mut self, dst: &mut [u8]) -> Result<usize, MsgPackError> {
        let n = dst.len().min(self.buf.remaining());
        self.buf.copy_to_slice(&mut dst[..n]);
        Ok(n)
    }

    fn close(&mut self) -> Result<(), MsgPackError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_channel_big_endian() {
        let data: Vec<u8> = vec![
            0x12, // byte
            0x01, 0x02, // short
            0x00, 0x00, 0x00, 0x2A, // int
        ];
        let mut ch = ReadChannel::new(Cursor::new(data));
        assert_eq!(ch.read_byte().unwrap(), 0x12);
        assert_eq!(ch.read_short().unwrap(), 0x0102);
        assert_eq!(ch.read_int().unwrap(), 42);
    }

    #[test]
    fn read_channel_long_and_floats() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-5i64).to_be_bytes());
        data.extend_from_slice(&1.5f32.to_be_bytes());
        data.extend_from_slice(&2.25f64.to_be_bytes());
        let mut ch = ReadChannel::new(Cursor::new(data));
        assert_eq!(ch.read_long().unwrap(), -5);
        assert_eq!(ch.read_float().unwrap(), 1.5);
        assert_eq!(ch.read_double().unwrap(), 2.25);
    }

    #[test]
    fn read_channel_eof_is_distinct() {
        let mut ch = ReadChannel::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(ch.read_byte(), Err(MsgPackError::UnexpectedEof)));

        // A sized read with only part of the value available.
        let mut ch = ReadChannel::new(Cursor::new(vec![0x01]));
        assert!(matches!(ch.read_int(), Err(MsgPackError::UnexpectedEof)));
    }

    #[test]
    fn bytes_channel_sized_reads() {
        let mut data = vec![0x07];
        data.extend_from_slice(&300i16.to_be_bytes());
        data.extend_from_slice(&(-1i32).to_be_bytes());
        data.extend_from_slice(&i64::MAX.to_be_bytes());
        let mut ch = BytesChannel::new(data);
        assert_eq!(ch.read_byte().unwrap(), 7);
        assert_eq!(ch.read_short().unwrap(), 300);
        assert_eq!(ch.read_int().unwrap(), -1);
        assert_eq!(ch.read_long().unwrap(), i64::MAX);
        assert!(matches!(ch.read_byte(), Err(MsgPackError::UnexpectedEof)));
    }

    #[test]
    fn bytes_channel_bulk_read_is_bounded() {
        let mut ch = BytesChannel::new(vec![1u8, 2, 3]);
        let mut dst = [0u8; 8];
        assert_eq!(ch.read(&mut dst).unwrap(), 3);
        assert_eq!(&dst[..3], &[1, 2, 3]);
        // Exhausted source reports zero.
        assert_eq!(ch.read(&mut dst).unwrap(), 0);
    }
}
