//! One-shot helpers over [`MsgPackEncoder`] and [`MsgPackDecoder`].

use tracing::{debug, trace};

use super::{DecodeError, DecoderOptions, EncodeError, MsgPackDecoder, MsgPackEncoder};
use crate::Value;

/// Encodes `value` to MessagePack.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = MsgPackEncoder::new();
    match encoder.encode(value) {
        Ok(bytes) => {
            trace!(kind = value.kind(), len = bytes.len(), "encoded value");
            Ok(bytes)
        }
        Err(err) => {
            debug!(kind = value.kind(), error = %err, "encode failed");
            Err(err)
        }
    }
}

/// Decodes the first value in `blob` with default options.
pub fn decode(blob: &[u8]) -> Result<Value, DecodeError> {
    decode_with_options(blob, &DecoderOptions::default()).map(|(value, _)| value)
}

/// Like [`decode`], also returning the number of bytes consumed.
pub fn decode_with_consumed(blob: &[u8]) -> Result<(Value, usize), DecodeError> {
    decode_with_options(blob, &DecoderOptions::default())
}

/// Decodes the first value in `blob` under `options`, returning the bytes consumed.
pub fn decode_with_options(
    blob: &[u8],
    options: &DecoderOptions,
) -> Result<(Value, usize), DecodeError> {
    let decoder = MsgPackDecoder::with_options(options.clone());
    match decoder.decode_with_consumed(blob) {
        Ok((value, consumed)) => {
            trace!(kind = value.kind(), consumed, len = blob.len(), "decoded value");
            Ok((value, consumed))
        }
        Err(err) => {
            debug!(len = blob.len(), error = %err, "decode failed");
            Err(err)
        }
    }
}
