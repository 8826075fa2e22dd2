//! `MsgPackDecoder`: reads MessagePack into an owned [`Value`] tree.

use std::collections::HashSet;

use typed_pack_buffers::Reader;

use super::constants::*;
use super::error::DecodeError;
use crate::ext::{parse_ext, ExtType};
use crate::{Int, Value};

/// What to do when a map repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Keep every pair in wire order.
    #[default]
    Append,
    /// Fail with [`DecodeError::DuplicateKey`].
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    /// Maximum container nesting. `Some(0)` rejects any map or array,
    /// `Some(1)` allows one level. `None` means unlimited.
    pub max_depth: Option<usize>,
    pub duplicate_keys: DuplicateKeys,
}

#[derive(Debug, Clone, Default)]
pub struct MsgPackDecoder {
    pub options: DecoderOptions,
}

impl MsgPackDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Decodes the first value in `input`; trailing bytes are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeError> {
        self.decode_with_consumed(input).map(|(value, _)| value)
    }

    /// Decodes the first value in `input` and reports how many bytes it
    /// occupied.
    pub fn decode_with_consumed(&self, input: &[u8]) -> Result<(Value, usize), DecodeError> {
        let mut reader = Reader::new(input);
        let value = self.read_any(&mut reader, 0)?;
        Ok((value, reader.x))
    }

    pub fn read_any(&self, reader: &mut Reader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let offset = reader.x;
        let code = reader.try_peek()?;
        match WireType::of(code) {
            WireType::Nil => {
                reader.try_u8()?;
                Ok(Value::Null)
            }
            WireType::Boolean => Ok(Value::Bool(reader.try_u8()? == MsgPackMarker::True as u8)),
            WireType::Integer => self.read_int(reader).map(Value::Int),
            WireType::Float => {
                if reader.try_u8()? == FLOAT32 {
                    Ok(Value::Float32(reader.try_f32()?))
                } else {
                    Ok(Value::Float64(reader.try_f64()?))
                }
            }
            WireType::String => {
                let size = self.read_str_hdr(reader)?;
                Ok(Value::Str(reader.try_utf8(size)?.to_owned()))
            }
            WireType::Binary => {
                let size = match reader.try_u8()? {
                    BIN8 => reader.try_u8()? as usize,
                    BIN16 => reader.try_u16()? as usize,
                    _ => reader.try_u32()? as usize,
                };
                Ok(Value::Bytes(reader.try_buf(size)?.to_vec()))
            }
            WireType::Extension => self.read_ext(reader),
            WireType::Array => {
                let size = match reader.try_u8()? {
                    ARRAY16 => reader.try_u16()? as usize,
                    ARRAY32 => reader.try_u32()? as usize,
                    fix => (fix & 0xf) as usize,
                };
                self.enter(depth)?;
                self.read_arr(reader, size, depth + 1)
            }
            WireType::Map => {
                let size = match reader.try_u8()? {
                    MAP16 => reader.try_u16()? as usize,
                    MAP32 => reader.try_u32()? as usize,
                    fix => (fix & 0xf) as usize,
                };
                self.enter(depth)?;
                self.read_map(reader, size, depth + 1)
            }
            WireType::Unknown => Err(DecodeError::MalformedWireTag { code, offset }),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), DecodeError> {
        match self.options.max_depth {
            Some(limit) if depth >= limit => Err(DecodeError::DepthLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn read_int(&self, reader: &mut Reader<'_>) -> Result<Int, DecodeError> {
        let offset = reader.x;
        let code = reader.try_u8()?;
        let int = match code {
            0x00..=0x7f => Int::U8(code),
            0xe0..=0xff => Int::I8(code as i8),
            UINT8 => Int::U8(reader.try_u8()?),
            UINT16 => Int::U16(reader.try_u16()?),
            UINT32 => Int::U32(reader.try_u32()?),
            UINT64 => Int::U64(reader.try_u64()?),
            INT8 => Int::I8(reader.try_i8()?),
            INT16 => Int::I16(reader.try_i16()?),
            INT32 => Int::I32(reader.try_i32()?),
            INT64 => Int::I64(reader.try_i64()?),
            _ => return Err(DecodeError::MalformedWireTag { code, offset }),
        };
        Ok(int)
    }

    fn read_str_hdr(&self, reader: &mut Reader<'_>) -> Result<usize, DecodeError> {
        let size = match reader.try_u8()? {
            STR8 => reader.try_u8()? as usize,
            STR16 => reader.try_u16()? as usize,
            STR32 => reader.try_u32()? as usize,
            fix => (fix & 0x1f) as usize,
        };
        Ok(size)
    }

    fn read_ext(&self, reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let size = match reader.try_u8()? {
            FIXEXT1 => 1,
            FIXEXT2 => 2,
            FIXEXT4 => 4,
            FIXEXT8 => 8,
            FIXEXT16 => 16,
            EXT8 => reader.try_u8()? as usize,
            EXT16 => reader.try_u16()? as usize,
            _ => reader.try_u32()? as usize,
        };
        let code = reader.try_i8()?;
        let ext = ExtType::from_code(code).ok_or(DecodeError::MalformedExtensionCode(code))?;
        let payload = reader.try_buf(size)?;
        parse_ext(ext, payload)
    }

    fn read_arr(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        // Each element takes at least one byte.
        let mut items = Vec::with_capacity(size.min(reader.size()));
        for _ in 0..size {
            items.push(self.read_any(reader, depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let capacity = size.min(reader.size() / 2);
        let mut pairs: Vec<(String, Value)> = Vec::with_capacity(capacity);
        let mut seen = match self.options.duplicate_keys {
            DuplicateKeys::Append => None,
            DuplicateKeys::Reject => Some(HashSet::with_capacity(capacity)),
        };
        for _ in 0..size {
            let key = match self.read_any(reader, depth)? {
                Value::Str(key) => key,
                other => return Err(DecodeError::InvalidMapKey { found: other.kind() }),
            };
            if let Some(seen) = seen.as_mut() {
                if !seen.insert(key.clone()) {
                    return Err(DecodeError::DuplicateKey(key));
                }
            }
            let value = self.read_any(reader, depth)?;
            pairs.push((key, value));
        }
        Ok(Value::Map(pairs))
    }
}
