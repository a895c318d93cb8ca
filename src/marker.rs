//! MessagePack format tag byte constants (classic tag set).

// Nil
pub const NIL: u8 = 0xC0;

// Boolean
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Float (IEEE 754, big-endian)
pub const FLOAT_32: u8 = 0xCA;
pub const FLOAT_64: u8 = 0xCB;

// Unsigned integer
pub const UINT_8: u8 = 0xCC;
pub const UINT_16: u8 = 0xCD;
pub const UINT_32: u8 = 0xCE;
pub const UINT_64: u8 = 0xCF;

// Signed integer
pub const INT_8: u8 = 0xD0;
pub const INT_16: u8 = 0xD1;
pub const INT_32: u8 = 0xD2;
pub const INT_64: u8 = 0xD3;

// Raw byte string (classic format: used for both binary and UTF-8 text)
// FixRaw: 0xA0..=0xBF (low 5 bits = byte length 0..31)
pub const RAW_16: u8 = 0xDA;
pub const RAW_32: u8 = 0xDB;

// Array
// FixArray: 0x90..=0x9F (low 4 bits = element count 0..15)
pub const ARRAY_16: u8 = 0xDC;
pub const ARRAY_32: u8 = 0xDD;

// Map
// FixMap: 0x80..=0x8F (low 4 bits = entry count 0..15)
pub const MAP_16: u8 = 0xDE;
pub const MAP_32: u8 = 0xDF;

// Fixnum: positive 0x00..=0x7F (value in the byte),
// negative 0xE0..=0xFF (low 5 bits, sign-extended to -32..=-1).

// 0xC1, 0xC4..=0xC9 and 0xD4..=0xD9 are unused in the classic tag set
// and are rejected as invalid.

// High-bit prefixes for the fix families.
pub const FIXMAP_PREFIX: u8 = 0x80;
pub const FIXARRAY_PREFIX: u8 = 0x90;
pub const FIXRAW_PREFIX: u8 = 0xA0;
