//! Encoder and decoder error types.

use thiserror::Error;
use typed_pack_buffers::BufferError;

use crate::ext::ExtType;

/// Error produced while turning a value into MessagePack bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unsupported type: {type_name}")]
    UnsupportedType { type_name: String },
    #[error("{kind} length {len} does not fit in 32 bits")]
    LengthOverflow { kind: &'static str, len: usize },
    #[error("{0}")]
    Custom(String),
}

/// Error produced while reading MessagePack bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed wire tag 0x{code:02x} at offset {offset}")]
    MalformedWireTag { code: u8, offset: usize },
    #[error("unknown extension type code {0}")]
    MalformedExtensionCode(i8),
    #[error("map key must be a string, found {found}")]
    InvalidMapKey { found: &'static str },
    #[error("invalid {ext} text {text:?}: {reason}")]
    TextParse {
        ext: ExtType,
        text: String,
        reason: String,
    },
    #[error(transparent)]
    Codec(#[from] BufferError),
    #[error("nesting exceeds depth limit {limit}")]
    DepthLimitExceeded { limit: usize },
    #[error("duplicate map key {0:?}")]
    DuplicateKey(String),
}
