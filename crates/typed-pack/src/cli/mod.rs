//! Core logic behind the `typed-pack` and `typed-unpack` binaries.
//!
//! - `typed-pack`: JSON on stdin → MessagePack on stdout
//! - `typed-unpack`: MessagePack on stdin → pretty JSON on stdout

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::msgpack::{decode_with_options, encode, DecodeError, DecoderOptions, EncodeError};
use crate::Value;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Installs a stderr `tracing` subscriber; `-v` count picks the level.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Encodes a JSON document as MessagePack.
pub fn pack(json: &str) -> Result<Vec<u8>, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let bytes = encode(&Value::from(value))?;
    info!(input = json.len(), output = bytes.len(), "packed");
    Ok(bytes)
}

/// Decodes one MessagePack value and renders it as pretty JSON.
pub fn unpack(bytes: &[u8], options: &DecoderOptions) -> Result<String, CliError> {
    let (value, consumed) = decode_with_options(bytes, options)?;
    if consumed < bytes.len() {
        info!(trailing = bytes.len() - consumed, "ignoring trailing bytes");
    }
    Ok(serde_json::to_string_pretty(&value.to_json())?)
}
