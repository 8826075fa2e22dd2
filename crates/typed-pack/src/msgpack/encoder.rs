//! `MsgPackEncoder`: writes a [`Value`] tree as MessagePack.

use typed_pack_buffers::Writer;

use super::constants::*;
use super::error::EncodeError;
use crate::ext::{format_ext, ExtType};
use crate::{Int, Value};

pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn len32(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { kind, len })
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes `value` into a fresh byte vector.
    ///
    /// On error nothing written for this call is kept in the writer.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.reset();
                Err(err)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(i) => self.write_int(*i),
            Value::Float32(f) => self.write_f32(*f),
            Value::Float64(f) => self.write_f64(*f),
            Value::Str(s) => self.write_str(s)?,
            Value::Bytes(b) => self.write_bin(b)?,
            Value::Map(pairs) => self.write_map(pairs)?,
            Value::Array(items) => self.write_arr(items)?,
            Value::Decimal(_) | Value::Date(_) | Value::DateTime(_) | Value::Time(_) => {
                if let Some((ext, text)) = format_ext(value) {
                    self.write_ext(ext, text.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    pub fn write_null(&mut self) {
        self.writer.u8(MsgPackMarker::Null as u8);
    }

    pub fn write_boolean(&mut self, b: bool) {
        let marker = if b {
            MsgPackMarker::True
        } else {
            MsgPackMarker::False
        };
        self.writer.u8(marker as u8);
    }

    pub fn write_f32(&mut self, float: f32) {
        self.writer.u8f32(FLOAT32, float);
    }

    pub fn write_f64(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    pub fn write_int(&mut self, int: Int) {
        match int {
            Int::I8(v) => self.write_i8(v),
            Int::U8(v) => self.write_u8(v),
            Int::I16(v) => self.write_i16(v),
            Int::U16(v) => self.write_u16(v),
            Int::I32(v) => self.write_i32(v),
            Int::U32(v) => self.write_u32(v),
            Int::I64(v) => self.write_i64(v),
            Int::U64(v) => self.write_u64(v),
        }
    }

    pub fn write_i8(&mut self, v: i8) {
        self.write_i64(v as i64);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_u64(v as u64);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_i64(v as i64);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_u64(v as u64);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_i64(v as i64);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_u64(v as u64);
    }

    /// Narrowest form for a non-negative integer.
    pub fn write_u64(&mut self, num: u64) {
        let writer = &mut self.writer;
        if num <= 0x7f {
            writer.u8(num as u8);
        } else if num <= 0xff {
            writer.u16(((UINT8 as u16) << 8) | num as u16);
        } else if num <= 0xffff {
            writer.u8u16(UINT16, num as u16);
        } else if num <= 0xffff_ffff {
            writer.u8u32(UINT32, num as u32);
        } else {
            writer.u8u64(UINT64, num);
        }
    }

    /// Narrowest form for a signed integer; non-negative values use the
    /// unsigned encodings.
    pub fn write_i64(&mut self, num: i64) {
        if num >= 0 {
            return self.write_u64(num as u64);
        }
        let writer = &mut self.writer;
        if num >= -0x20 {
            // negative fixint: 0xe0..0xff
            writer.u8(num as i8 as u8);
        } else if num >= i8::MIN as i64 {
            writer.u16(((INT8 as u16) << 8) | (num as i8 as u8) as u16);
        } else if num >= i16::MIN as i64 {
            writer.u8u16(INT16, num as i16 as u16);
        } else if num >= i32::MIN as i64 {
            writer.u8u32(INT32, num as i32 as u32);
        } else {
            writer.u8u64(INT64, num as u64);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let length = len32("string", length)?;
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer.u16(((STR8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else {
            self.writer.u8u32(STR32, length);
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let length = len32("binary", length)?;
        if length <= 0xff {
            self.writer.u16(((BIN8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(BIN16, length as u16);
        } else {
            self.writer.u8u32(BIN32, length);
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let length = len32("array", length)?;
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            self.writer.u8u32(ARRAY32, length);
        }
        Ok(())
    }

    pub fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.write_arr_hdr(items.len())?;
        for item in items {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        let length = len32("map", length)?;
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            self.writer.u8u32(MAP32, length);
        }
        Ok(())
    }

    pub fn write_map(&mut self, pairs: &[(String, Value)]) -> Result<(), EncodeError> {
        self.write_map_hdr(pairs.len())?;
        for (key, value) in pairs {
            self.write_str(key)?;
            self.write_any(value)?;
        }
        Ok(())
    }

    /// Writes an ext header for a payload of `length` bytes.
    ///
    /// Payloads of exactly 1, 2, 4, 8 or 16 bytes use the fixext forms.
    pub fn write_ext_hdr(&mut self, ext: ExtType, length: usize) -> Result<(), EncodeError> {
        let length = len32("extension", length)?;
        let code = ext.code() as u8;
        match length {
            1 => self.writer.u16(((FIXEXT1 as u16) << 8) | code as u16),
            2 => self.writer.u16(((FIXEXT2 as u16) << 8) | code as u16),
            4 => self.writer.u16(((FIXEXT4 as u16) << 8) | code as u16),
            8 => self.writer.u16(((FIXEXT8 as u16) << 8) | code as u16),
            16 => self.writer.u16(((FIXEXT16 as u16) << 8) | code as u16),
            0..=0xff => {
                self.writer.u16(((EXT8 as u16) << 8) | length as u16);
                self.writer.u8(code);
            }
            0x100..=0xffff => {
                self.writer.u8u16(EXT16, length as u16);
                self.writer.u8(code);
            }
            _ => {
                self.writer.u8u32(EXT32, length);
                self.writer.u8(code);
            }
        }
        Ok(())
    }

    pub fn write_ext(&mut self, ext: ExtType, payload: &[u8]) -> Result<(), EncodeError> {
        self.write_ext_hdr(ext, payload.len())?;
        self.writer.buf(payload);
        Ok(())
    }
}
