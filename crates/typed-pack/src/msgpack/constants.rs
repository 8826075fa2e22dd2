//! MessagePack marker bytes and wire-type classification.

/// One-byte markers with fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgPackMarker {
    Null = 0xc0,
    NeverUsed = 0xc1,
    False = 0xc2,
    True = 0xc3,
}

pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Family a leading byte belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Nil,
    Boolean,
    Integer,
    Float,
    String,
    Binary,
    Extension,
    Array,
    Map,
    Unknown,
}

impl WireType {
    pub fn of(code: u8) -> Self {
        match code {
            0x00..=0x7f | 0xe0..=0xff | UINT8..=INT64 => WireType::Integer,
            0x80..=0x8f | MAP16 | MAP32 => WireType::Map,
            0x90..=0x9f | ARRAY16 | ARRAY32 => WireType::Array,
            0xa0..=0xbf | STR8..=STR32 => WireType::String,
            0xc0 => WireType::Nil,
            0xc1 => WireType::Unknown,
            0xc2 | 0xc3 => WireType::Boolean,
            BIN8..=BIN32 => WireType::Binary,
            EXT8..=EXT32 | FIXEXT1..=FIXEXT16 => WireType::Extension,
            FLOAT32 | FLOAT64 => WireType::Float,
        }
    }
}
