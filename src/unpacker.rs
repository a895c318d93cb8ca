//! Streaming decoder: head-byte cache, token dispatch, typed reads.

use num_bigint::BigInt;

use crate::accept::{
    Accept, ArrayAccept, BigIntAccept, BooleanAccept, ByteArrayAccept, DoubleAccept, IntAccept,
    LongAccept, MapAccept, NilAccept, StringAccept,
};
use crate::channel::Channel;
use crate::error::MsgPackError;
use crate::marker;
use crate::types::ValueType;

/// Defensive limits on announced sizes, checked before any allocation.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    /// Maximum raw (byte string) length in bytes.
    pub raw: usize,
    /// Maximum number of array elements.
    pub array: usize,
    /// Maximum number of map entries.
    pub map: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            raw: 1 << 27,
            array: 1 << 22,
            map: 1 << 21,
        }
    }
}

/// An in-progress raw body, carried across calls when a fill was
/// interrupted.
struct RawScratch {
    buf: Vec<u8>,
    filled: usize,
}

/// Streaming MessagePack decoder over a [`Channel`].
///
/// Each public read consumes exactly one value from the stream (or only
/// peeks, for [`next_type`](Self::next_type) and
/// [`try_skip_nil`](Self::try_skip_nil)). Container headers count as one
/// value; the contained elements are read by subsequent calls. One
/// decoder owns one stream; after an error other than an interrupted raw
/// fill, the decoder should be discarded.
pub struct Unpacker<C> {
    ch: C,
    limits: SizeLimits,
    head: Option<u8>,
    raw: Option<RawScratch>,
}

impl<C: Channel> Unpacker<C> {
    pub fn new(ch: C) -> Self {
        Self::with_limits(ch, SizeLimits::default())
    }

    pub fn with_limits(ch: C, limits: SizeLimits) -> Self {
        Self {
            ch,
            limits,
            head: None,
            raw: None,
        }
    }

    /// Returns the cached head byte, fetching one from the channel if the
    /// cache is empty. Idempotent until [`reset_head`](Self::reset_head).
    fn head_byte(&mut self) -> Result<u8, MsgPackError> {
        match self.head {
            Some(b) => Ok(b),
            None => {
                let b = self.ch.read_byte()?;
                self.head = Some(b);
                Ok(b)
            }
        }
    }

    fn reset_head(&mut self) {
        self.head = None;
    }

    /// Decodes the next value, delivering exactly one event to `a`.
    ///
    /// This is the low-level escape hatch under the typed reads; a custom
    /// [`Accept`] can capture whichever token kinds it wants.
    pub fn read_token(&mut self, a: &mut impl Accept) -> Result<(), MsgPackError> {
        // A raw body interrupted by a channel failure is resumed before
        // any new tag is dispatched.
        if let Some(mut scratch) = self.raw.take() {
            match Self::fill_raw(&mut self.ch, &mut scratch) {
                Ok(()) => {
                    a.accept_byte_array(scratch.buf)?;
                    self.reset_head();
                    return Ok(());
                }
                Err(e) => {
                    self.raw = Some(scratch);
                    return Err(e);
                }
            }
        }

        let b = self.head_byte()?;

        if b & 0x80 == 0 {
            // positive fixnum
            a.accept_int(i32::from(b))?;
            self.reset_head();
            return Ok(());
        }

        if b & 0xE0 == 0xE0 {
            // negative fixnum
            a.accept_int(i32::from(b as i8))?;
            self.reset_head();
            return Ok(());
        }

        if b & 0xE0 == 0xA0 {
            // fixraw, length in the low five bits
            let size = i64::from(b & 0x1F);
            if size == 0 {
                a.accept_empty_byte_array()?;
            } else {
                let body = self.read_raw_body(size)?;
                a.accept_byte_array(body)?;
            }
            self.reset_head();
            return Ok(());
        }

        if b & 0xF0 == 0x90 {
            // fixarray, count in the low nibble
            let size = self.check_array_size(i64::from(b & 0x0F))?;
            a.accept_array_header(size)?;
            self.reset_head();
            return Ok(());
        }

        if b & 0xF0 == 0x80 {
            // fixmap, count in the low nibble
            let size = self.check_map_size(i64::from(b & 0x0F))?;
            a.accept_map_header(size)?;
            self.reset_head();
            return Ok(());
        }

        self.read_token_switch(a, b)
    }

    fn read_token_switch(&mut self, a: &mut impl Accept, b: u8) -> Result<(), MsgPackError> {
        match b {
            marker::NIL => a.accept_nil()?,
            marker::FALSE => a.accept_boolean(false)?,
            marker::TRUE => a.accept_boolean(true)?,
            marker::FLOAT_32 => {
                let v = self.ch.read_float()?;
                a.accept_float(v)?;
            }
            marker::FLOAT_64 => {
                let v = self.ch.read_double()?;
                a.accept_double(v)?;
            }
            marker::UINT_8 => {
                let v = self.ch.read_byte()?;
                a.accept_int(i32::from(v))?;
            }
            marker::UINT_16 => {
                let v = self.ch.read_short()? as u16;
                a.accept_int(i32::from(v))?;
            }
            marker::UINT_32 => {
                let v = self.ch.read_int()?;
                if v < 0 {
                    // Does not fit i32; reinterpret as unsigned and widen.
                    a.accept_long(i64::from(v as u32))?;
                } else {
                    a.accept_int(v)?;
                }
            }
            marker::UINT_64 => {
                let v = self.ch.read_long()?;
                if v < 0 {
                    // Top bit set: beyond the signed 64-bit range.
                    a.accept_unsigned_long(v as u64)?;
                } else {
                    a.accept_long(v)?;
                }
            }
            marker::INT_8 => {
                let v = self.ch.read_byte()? as i8;
                a.accept_int(i32::from(v))?;
            }
            marker::INT_16 => {
                let v = self.ch.read_short()?;
                a.accept_int(i32::from(v))?;
            }
            marker::INT_32 => {
                let v = self.ch.read_int()?;
                a.accept_int(v)?;
            }
            marker::INT_64 => {
                let v = self.ch.read_long()?;
                a.accept_long(v)?;
            }
            marker::RAW_16 => {
                let size = self.ch.read_short()? as u16;
                if size == 0 {
                    a.accept_empty_byte_array()?;
                } else {
                    let body = self.read_raw_body(i64::from(size))?;
                    a.accept_byte_array(body)?;
                }
            }
            marker::RAW_32 => {
                let size = self.ch.read_int()?;
                if size == 0 {
                    a.accept_empty_byte_array()?;
                } else {
                    let body = self.read_raw_body(i64::from(size))?;
                    a.accept_byte_array(body)?;
                }
            }
            marker::ARRAY_16 => {
                let size = self.ch.read_short()? as u16;
                let size = self.check_array_size(i64::from(size))?;
                a.accept_array_header(size)?;
            }
            marker::ARRAY_32 => {
                let size = self.ch.read_int()?;
                let size = self.check_array_size(i64::from(size))?;
                a.accept_array_header(size)?;
            }
            marker::MAP_16 => {
                let size = self.ch.read_short()? as u16;
                let size = self.check_map_size(i64::from(size))?;
                a.accept_map_header(size)?;
            }
            marker::MAP_32 => {
                let size = self.ch.read_int()?;
                let size = self.check_map_size(i64::from(size))?;
                a.accept_map_header(size)?;
            }
            other => {
                return Err(MsgPackError::Format(format!(
                    "unknown MessagePack tag: 0x{other:02X}"
                )));
            }
        }
        self.reset_head();
        Ok(())
    }

    /// Validates an announced raw size, allocates the scratch buffer and
    /// fills it from the channel. On an interrupted fill the partial
    /// scratch is kept so that the next call can resume it.
    fn read_raw_body(&mut self, announced: i64) -> Result<Vec<u8>, MsgPackError> {
        let size = self.check_raw_size(announced)?;
        let mut scratch = RawScratch {
            buf: vec![0u8; size],
            filled: 0,
        };
        match Self::fill_raw(&mut self.ch, &mut scratch) {
            Ok(()) => Ok(scratch.buf),
            Err(e) => {
                self.raw = Some(scratch);
                Err(e)
            }
        }
    }

    fn fill_raw(ch: &mut C, scratch: &mut RawScratch) -> Result<(), MsgPackError> {
        while scratch.filled < scratch.buf.len() {
            let n = ch.read(&mut scratch.buf[scratch.filled..])?;
            if n == 0 {
                return Err(MsgPackError::UnexpectedEof);
            }
            scratch.filled += n;
        }
        Ok(())
    }

    fn check_raw_size(&self, size: i64) -> Result<usize, MsgPackError> {
        Self::check_size("raw", size, self.limits.raw)
    }

    fn check_array_size(&self, size: i64) -> Result<usize, MsgPackError> {
        Self::check_size("array", size, self.limits.array)
    }

    fn check_map_size(&self, size: i64) -> Result<usize, MsgPackError> {
        Self::check_size("map", size, self.limits.map)
    }

    fn check_size(kind: &'static str, size: i64, limit: usize) -> Result<usize, MsgPackError> {
        if size < 0 || size as u64 >= limit as u64 {
            tracing::debug!(kind, size, limit, "announced size rejected");
            return Err(MsgPackError::SizeLimit { kind, size, limit });
        }
        Ok(size as usize)
    }

    /// Consumes the next value iff it is nil. Supports optional fields
    /// without committing to a full read: on `false` the head byte stays
    /// cached for the next call, whatever it is.
    pub fn try_skip_nil(&mut self) -> Result<bool, MsgPackError> {
        if self.head_byte()? == marker::NIL {
            self.reset_head();
            return Ok(true);
        }
        Ok(false)
    }

    /// Classifies the next value without consuming it. Repeated calls
    /// return the same answer until a read consumes the value.
    pub fn next_type(&mut self) -> Result<ValueType, MsgPackError> {
        let b = self.head_byte()?;
        if b & 0x80 == 0 || b & 0xE0 == 0xE0 {
            return Ok(ValueType::Integer);
        }
        if b & 0xE0 == 0xA0 {
            return Ok(ValueType::Raw);
        }
        if b & 0xF0 == 0x90 {
            return Ok(ValueType::Array);
        }
        if b & 0xF0 == 0x80 {
            return Ok(ValueType::Map);
        }
        match b {
            marker::NIL => Ok(ValueType::Nil),
            marker::FALSE | marker::TRUE => Ok(ValueType::Boolean),
            marker::FLOAT_32 | marker::FLOAT_64 => Ok(ValueType::Float),
            marker::UINT_8..=marker::UINT_64 | marker::INT_8..=marker::INT_64 => {
                Ok(ValueType::Integer)
            }
            marker::RAW_16 | marker::RAW_32 => Ok(ValueType::Raw),
            marker::ARRAY_16 | marker::ARRAY_32 => Ok(ValueType::Array),
            marker::MAP_16 | marker::MAP_32 => Ok(ValueType::Map),
            other => Err(MsgPackError::Format(format!(
                "unknown MessagePack tag: 0x{other:02X}"
            ))),
        }
    }

    pub fn read_int(&mut self) -> Result<i32, MsgPackError> {
        let mut a = IntAccept::default();
        self.read_token(&mut a)?;
        Ok(a.value())
    }

    pub fn read_long(&mut self) -> Result<i64, MsgPackError> {
        let mut a = LongAccept::default();
        self.read_token(&mut a)?;
        Ok(a.value())
    }

    pub fn read_big_integer(&mut self) -> Result<BigInt, MsgPackError> {
        let mut a = BigIntAccept::default();
        self.read_token(&mut a)?;
        Ok(a.into_value())
    }

    pub fn read_double(&mut self) -> Result<f64, MsgPackError> {
        let mut a = DoubleAccept::default();
        self.read_token(&mut a)?;
        Ok(a.value())
    }

    pub fn read_boolean(&mut self) -> Result<bool, MsgPackError> {
        let mut a = BooleanAccept::default();
        self.read_token(&mut a)?;
        Ok(a.value())
    }

    pub fn read_nil(&mut self) -> Result<(), MsgPackError> {
        let mut a = NilAccept;
        self.read_token(&mut a)
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>, MsgPackError> {
        let mut a = ByteArrayAccept::default();
        self.read_token(&mut a)?;
        Ok(a.into_value())
    }

    pub fn read_string(&mut self) -> Result<String, MsgPackError> {
        let mut a = StringAccept::default();
        self.read_token(&mut a)?;
        Ok(a.into_value())
    }

    pub fn read_array_header(&mut self) -> Result<usize, MsgPackError> {
        let mut a = ArrayAccept::default();
        self.read_token(&mut a)?;
        Ok(a.size())
    }

    pub fn read_map_header(&mut self) -> Result<usize, MsgPackError> {
        let mut a = MapAccept::default();
        self.read_token(&mut a)?;
        Ok(a.size())
    }

    /// Closes the decoder and the underlying byte source.
    pub fn close(mut self) -> Result<(), MsgPackError> {
        self.ch.close()
    }
}
