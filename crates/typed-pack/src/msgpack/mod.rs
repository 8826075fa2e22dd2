//! MessagePack encoder/decoder for [`Value`](crate::Value) trees.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod util;

pub use constants::{MsgPackMarker, WireType};
pub use decoder::{DecoderOptions, DuplicateKeys, MsgPackDecoder};
pub use encoder::MsgPackEncoder;
pub use error::{DecodeError, EncodeError};
pub use util::{decode, decode_with_consumed, decode_with_options, encode};
