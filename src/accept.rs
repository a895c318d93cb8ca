//! Token sinks driven by the dispatcher.
//!
//! Each typed read on the unpacker allocates the acceptor matching the
//! type it wants, hands it to `read_token`, and takes the captured value
//! back out. Every token kind an acceptor does not override is rejected
//! with a type error.

use num_bigint::BigInt;

use crate::error::MsgPackError;

/// Receives exactly one semantic event per decoded value.
///
/// Integer events arrive pre-promoted: the dispatcher delivers the
/// narrowest of `accept_int`, `accept_long` and `accept_unsigned_long`
/// that can losslessly hold the decoded bits.
pub trait Accept {
    fn accept_int(&mut self, _v: i32) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected integer value".into()))
    }

    fn accept_long(&mut self, _v: i64) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected 64-bit integer value".into()))
    }

    fn accept_unsigned_long(&mut self, _v: u64) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type(
            "unexpected unsigned 64-bit integer value".into(),
        ))
    }

    fn accept_float(&mut self, _v: f32) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected float value".into()))
    }

    fn accept_double(&mut self, _v: f64) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected double value".into()))
    }

    fn accept_boolean(&mut self, _v: bool) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected boolean value".into()))
    }

    fn accept_nil(&mut self) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected nil value".into()))
    }

    fn accept_byte_array(&mut self, _v: Vec<u8>) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected raw value".into()))
    }

    fn accept_empty_byte_array(&mut self) -> Result<(), MsgPackError> {
        self.accept_byte_array(Vec::new())
    }

    fn accept_array_header(&mut self, _size: usize) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected array header".into()))
    }

    fn accept_map_header(&mut self, _size: usize) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("unexpected map header".into()))
    }
}

/// Captures a signed 32-bit integer. Tokens already promoted to 64 bits
/// are rejected.
#[derive(Default)]
pub struct IntAccept {
    value: i32,
}

impl IntAccept {
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Accept for IntAccept {
    fn accept_int(&mut self, v: i32) -> Result<(), MsgPackError> {
        self.value = v;
        Ok(())
    }

    fn accept_long(&mut self, _v: i64) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("integer value out of range of i32".into()))
    }
}

/// Captures a signed 64-bit integer, widening 32-bit tokens.
#[derive(Default)]
pub struct LongAccept {
    value: i64,
}

impl LongAccept {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Accept for LongAccept {
    fn accept_int(&mut self, v: i32) -> Result<(), MsgPackError> {
        self.value = i64::from(v);
        Ok(())
    }

    fn accept_long(&mut self, v: i64) -> Result<(), MsgPackError> {
        self.value = v;
        Ok(())
    }

    fn accept_unsigned_long(&mut self, _v: u64) -> Result<(), MsgPackError> {
        Err(MsgPackError::Type("integer value out of range of i64".into()))
    }
}

/// Captures any integer token, including unsigned 64-bit values beyond
/// the signed range.
#[derive(Default)]
pub struct BigIntAccept {
    value: BigInt,
}

impl BigIntAccept {
    pub fn into_value(self) -> BigInt {
        self.value
    }
}

impl Accept for BigIntAccept {
    fn accept_int(&mut self, v: i32) -> Result<(), MsgPackError> {
        self.value = BigInt::from(v);
        Ok(())
    }

    fn accept_long(&mut self, v: i64) -> Result<(), MsgPackError> {
        self.value = BigInt::from(v);
        Ok(())
    }

    fn accept_unsigned_long(&mut self, v: u64) -> Result<(), MsgPackError> {
        self.value = BigInt::from(v);
        Ok(())
    }
}

/// Captures a double, widening 32-bit floats.
#[derive(Default)]
pub struct DoubleAccept {
    value: f64,
}

impl DoubleAccept {
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Accept for DoubleAccept {
    fn accept_float(&mut self, v: f32) -> Result<(), MsgPackError> {
        self.value = f64::from(v);
        Ok(())
    }

    fn accept_double(&mut self, v: f64) -> Result<(), MsgPackError> {
        self.value = v;
        Ok(())
    }
}

#[derive(Default)]
pub struct BooleanAccept {
    value: bool,
}

impl BooleanAccept {
    pub fn value(&self) -> bool {
        self.value
    }
}

impl Accept for BooleanAccept {
    fn accept_boolean(&mut self, v: bool) -> Result<(), MsgPackError> {
        self.value = v;
        Ok(())
    }
}

#[derive(Default)]
pub struct NilAccept;

impl Accept for NilAccept {
    fn accept_nil(&mut self) -> Result<(), MsgPackError> {
        Ok(())
    }
}

/// Takes ownership of the delivered raw body.
#[derive(Default)]
pub struct ByteArrayAccept {
    value: Vec<u8>,
}

impl ByteArrayAccept {
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}

impl Accept for ByteArrayAccept {
    fn accept_byte_array(&mut self, v: Vec<u8>) -> Result<(), MsgPackError> {
        self.value = v;
        Ok(())
    }
}

/// Decodes the delivered raw body as UTF-8 text.
#[derive(Default)]
pub struct StringAccept {
    value: String,
}

impl StringAccept {
    pub fn into_value(self) -> String {
        self.value
    }
}

impl Accept for StringAccept {
    fn accept_byte_array(&mut self, v: Vec<u8>) -> Result<(), MsgPackError> {
        self.value = String::from_utf8(v)
            .map_err(|e| MsgPackError::Format(format!("invalid UTF-8 string: {e}")))?;
        Ok(())
    }
}

/// Captures an array header; the elements are read by subsequent calls.
#[derive(Default)]
pub struct ArrayAccept {
    size: usize,
}

impl ArrayAccept {
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Accept for ArrayAccept {
    fn accept_array_header(&mut self, size: usize) -> Result<(), MsgPackError> {
        self.size = size;
        Ok(())
    }
}

/// Captures a map header; the entries are read by subsequent calls.
#[derive(Default)]
pub struct MapAccept {
    size: usize,
}

impl MapAccept {
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Accept for MapAccept {
    fn accept_map_header(&mut self, size: usize) -> Result<(), MsgPackError> {
        self.size = size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_accept_rejects_long_tokens() {
        let mut a = IntAccept::default();
        a.accept_int(42).unwrap();
        assert_eq!(a.value(), 42);
        assert!(matches!(a.accept_long(42), Err(MsgPackError::Type(_))));
    }

    #[test]
    fn long_accept_widens_int() {
        let mut a = LongAccept::default();
        a.accept_int(-7).unwrap();
        assert_eq!(a.value(), -7);
        a.accept_long(1 << 40).unwrap();
        assert_eq!(a.value(), 1 << 40);
        assert!(matches!(
            a.accept_unsigned_long(u64::MAX),
            Err(MsgPackError::Type(_))
        ));
    }

    #[test]
    fn big_int_accept_takes_unsigned_overflow() {
        let mut a = BigIntAccept::default();
        a.accept_unsigned_long(u64::MAX).unwrap();
        assert_eq!(a.into_value(), BigInt::from(u64::MAX));
    }

    #[test]
    fn double_accept_widens_float() {
        let mut a = DoubleAccept::default();
        a.accept_float(1.5).unwrap();
        assert_eq!(a.value(), 1.5);
        assert!(matches!(a.accept_int(1), Err(MsgPackError::Type(_))));
    }

    #[test]
    fn string_accept_validates_utf8() {
        let mut a = StringAccept::default();
        a.accept_byte_array(b"foo".to_vec()).unwrap();
        assert_eq!(a.into_value(), "foo");

        let mut a = StringAccept::default();
        assert!(matches!(
            a.accept_byte_array(vec![0xFF]),
            Err(MsgPackError::Format(_))
        ));
    }

    #[test]
    fn empty_byte_array_delegates() {
        let mut a = ByteArrayAccept::default();
        a.accept_empty_byte_array().unwrap();
        assert!(a.into_value().is_empty());

        // Acceptors that do not take raws reject the empty event too.
        let mut a = IntAccept::default();
        assert!(matches!(
            a.accept_empty_byte_array(),
            Err(MsgPackError::Type(_))
        ));
    }
}
