//! MessagePack codec for dynamic [`Value`] trees, extended with four scalar
//! types carried as ext blocks with UTF-8 text payloads:
//!
//! | code | type | payload |
//! |---|---|---|
//! | 1 | [`Decimal`](rust_decimal::Decimal) | `-104231.00` |
//! | 2 | [`Date`] | `1972-11-30` |
//! | 3 | [`DateTime`] | `2015-02-07T13:28:17.239+02:00` |
//! | 4 | [`Time`] | `13:28:17` |
//!
//! # Example
//!
//! ```
//! use typed_pack::{decode, encode, Value};
//!
//! let value = Value::Map(vec![
//!     ("name".into(), "Ewout".into()),
//!     ("birthDate".into(), Value::Date("1972-11-30".parse().unwrap())),
//! ]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod element;
pub mod ext;
mod json;
pub mod msgpack;
pub mod ser;
pub mod temporal;
mod value;

pub use element::{element_to_value, ElementNode, TypedElement};
pub use ext::{format_ext, parse_ext, ExtType};
pub use msgpack::{
    decode, decode_with_consumed, decode_with_options, encode, DecodeError, DecoderOptions,
    DuplicateKeys, EncodeError, MsgPackDecoder, MsgPackEncoder,
};
pub use ser::{to_value, to_vec};
pub use temporal::{Date, DateTime, Time, TemporalError};
pub use value::{Int, Value};

pub use rust_decimal::Decimal;
pub use typed_pack_buffers::BufferError;
