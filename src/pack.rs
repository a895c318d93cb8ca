//! Classic MessagePack encoding: values → bytes.

use bytes::{BufMut, BytesMut};

use crate::marker;

/// Appends a nil value.
pub fn pack_nil(buf: &mut BytesMut) {
    buf.put_u8(marker::NIL);
}

pub fn pack_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
}

/// Appends a signed integer using the smallest classic encoding.
/// Non-negative values take the unsigned tags, as the format prescribes.
pub fn pack_int(buf: &mut BytesMut, value: i64) {
    if value >= 0 {
        pack_uint(buf, value as u64);
    } else if value >= -32 {
        // negative fixnum
        buf.put_u8(value as u8);
    } else if value >= i64::from(i8::MIN) {
        buf.put_u8(marker::INT_8);
        buf.put_i8(value as i8);
    } else if value >= i64::from(i16::MIN) {
        buf.put_u8(marker::INT_16);
        buf.put_i16(value as i16);
    } else if value >= i64::from(i32::MIN) {
        buf.put_u8(marker::INT_32);
        buf.put_i32(value as i32);
    } else {
        buf.put_u8(marker::INT_64);
        buf.put_i64(value);
    }
}

/// Appends an unsigned integer using the smallest classic encoding.
pub fn pack_uint(buf: &mut BytesMut, value: u64) {
    if value <= 0x7F {
        // positive fixnum
        buf.put_u8(value as u8);
    } else if value <= u64::from(u8::MAX) {
        buf.put_u8(marker::UINT_8);
        buf.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        buf.put_u8(marker::UINT_16);
        buf.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        buf.put_u8(marker::UINT_32);
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(marker::UINT_64);
        buf.put_u64(value);
    }
}

pub fn pack_float(buf: &mut BytesMut, value: f32) {
    buf.put_u8(marker::FLOAT_32);
    buf.put_f32(value);
}

pub fn pack_double(buf: &mut BytesMut, value: f64) {
    buf.put_u8(marker::FLOAT_64);
    buf.put_f64(value);
}

/// Appends a raw byte string, header and body.
pub fn pack_raw(buf: &mut BytesMut, value: &[u8]) {
    pack_raw_header(buf, value.len());
    buf.put_slice(value);
}

/// Appends a string as a UTF-8 raw (size = byte length, not char count).
pub fn pack_str(buf: &mut BytesMut, value: &str) {
    pack_raw(buf, value.as_bytes());
}

fn pack_raw_header(buf: &mut BytesMut, len: usize) {
    if len <= 31 {
        buf.put_u8(marker::FIXRAW_PREFIX | len as u8);
    } else if len <= 65535 {
        buf.put_u8(marker::RAW_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::RAW_32);
        buf.put_u32(len as u32);
    }
}

/// Appends an array header; the caller packs `len` elements after it.
pub fn pack_array_header(buf: &mut BytesMut, len: usize) {
    if len <= 15 {
        buf.put_u8(marker::FIXARRAY_PREFIX | len as u8);
    } else if len <= 65535 {
        buf.put_u8(marker::ARRAY_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::ARRAY_32);
        buf.put_u32(len as u32);
    }
}

/// Appends a map header; the caller packs `len` key/value pairs after it.
pub fn pack_map_header(buf: &mut BytesMut, len: usize) {
    if len <= 15 {
        buf.put_u8(marker::FIXMAP_PREFIX | len as u8);
    } else if len <= 65535 {
        buf.put_u8(marker::MAP_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::MAP_32);
        buf.put_u32(len as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_nil_marker() {
        let mut buf = BytesMut::new();
        pack_nil(&mut buf);
        assert_eq!(&buf[..], &[0xC0]);
    }

    #[test]
    fn pack_booleans() {
        let mut buf = BytesMut::new();
        pack_bool(&mut buf, true);
        pack_bool(&mut buf, false);
        assert_eq!(&buf[..], &[0xC3, 0xC2]);
    }

    #[test]
    fn pack_fixnums() {
        let mut buf = BytesMut::new();
        pack_int(&mut buf, 0);
        assert_eq!(&buf[..], &[0x00]);

        buf.clear();
        pack_int(&mut buf, 127);
        assert_eq!(&buf[..], &[0x7F]);

        buf.clear();
        pack_int(&mut buf, -1);
        assert_eq!(&buf[..], &[0xFF]);

        buf.clear();
        pack_int(&mut buf, -32);
        assert_eq!(&buf[..], &[0xE0]);
    }

    #[test]
    fn pack_signed_widths() {
        let mut buf = BytesMut::new();
        pack_int(&mut buf, -33);
        assert_eq!(&buf[..], &[marker::INT_8, (-33i8) as u8]);

        buf.clear();
        pack_int(&mut buf, -129);
        let expected = (-129i16).to_be_bytes();
        assert_eq!(&buf[..], &[marker::INT_16, expected[0], expected[1]]);

        buf.clear();
        pack_int(&mut buf, -32769);
        assert_eq!(buf[0], marker::INT_32);
        assert_eq!(&buf[1..], &(-32769i32).to_be_bytes());

        buf.clear();
        pack_int(&mut buf, i64::MIN);
        assert_eq!(buf[0], marker::INT_64);
        assert_eq!(&buf[1..], &i64::MIN.to_be_bytes());
    }

    #[test]
    fn pack_unsigned_widths() {
        let mut buf = BytesMut::new();
        pack_uint(&mut buf, 128);
        assert_eq!(&buf[..], &[marker::UINT_8, 0x80]);

        buf.clear();
        pack_uint(&mut buf, 256);
        assert_eq!(&buf[..], &[marker::UINT_16, 0x01, 0x00]);

        buf.clear();
        pack_uint(&mut buf, 65536);
        assert_eq!(&buf[..], &[marker::UINT_32, 0x00, 0x01, 0x00, 0x00]);

        buf.clear();
        pack_uint(&mut buf, u64::from(u32::MAX) + 1);
        assert_eq!(buf[0], marker::UINT_64);
        assert_eq!(&buf[1..], &(u64::from(u32::MAX) + 1).to_be_bytes());
    }

    #[test]
    fn positive_values_use_unsigned_tags() {
        let mut buf = BytesMut::new();
        pack_int(&mut buf, 255);
        assert_eq!(&buf[..], &[marker::UINT_8, 0xFF]);
    }

    #[test]
    fn pack_floats() {
        let mut buf = BytesMut::new();
        pack_float(&mut buf, 1.5);
        assert_eq!(buf[0], marker::FLOAT_32);
        assert_eq!(&buf[1..], &1.5f32.to_be_bytes());

        buf.clear();
        pack_double(&mut buf, 1.23);
        assert_eq!(buf[0], marker::FLOAT_64);
        assert_eq!(&buf[1..], &1.23f64.to_be_bytes());
    }

    #[test]
    fn pack_raw_headers() {
        let mut buf = BytesMut::new();
        pack_str(&mut buf, "foo");
        assert_eq!(&buf[..], &[0xA3, 0x66, 0x6F, 0x6F]);

        buf.clear();
        pack_raw(&mut buf, &[0u8; 31]);
        assert_eq!(buf[0], 0xBF); // largest fixraw

        buf.clear();
        pack_raw(&mut buf, &[0u8; 32]);
        assert_eq!(&buf[..3], &[marker::RAW_16, 0x00, 0x20]);

        buf.clear();
        pack_raw(&mut buf, &vec![0u8; 65536]);
        assert_eq!(&buf[..5], &[marker::RAW_32, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn pack_container_headers() {
        let mut buf = BytesMut::new();
        pack_array_header(&mut buf, 0);
        assert_eq!(&buf[..], &[0x90]);

        buf.clear();
        pack_array_header(&mut buf, 15);
        assert_eq!(&buf[..], &[0x9F]);

        buf.clear();
        pack_array_header(&mut buf, 16);
        assert_eq!(&buf[..], &[marker::ARRAY_16, 0x00, 0x10]);

        buf.clear();
        pack_array_header(&mut buf, 65536);
        assert_eq!(&buf[..], &[marker::ARRAY_32, 0x00, 0x01, 0x00, 0x00]);

        buf.clear();
        pack_map_header(&mut buf, 3);
        assert_eq!(&buf[..], &[0x83]);

        buf.clear();
        pack_map_header(&mut buf, 16);
        assert_eq!(&buf[..], &[marker::MAP_16, 0x00, 0x10]);

        buf.clear();
        pack_map_header(&mut buf, 65536);
        assert_eq!(&buf[..], &[marker::MAP_32, 0x00, 0x01, 0x00, 0x00]);
    }
}
