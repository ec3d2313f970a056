//! rencode — a pure-Rust rencode binary serialization codec.
//!
//! rencode is a compact, self-describing extension of bencode: every value
//! starts with a type code byte, small integers and short containers embed
//! their value or length in that byte, and longer containers fall back to a
//! terminator byte.
//!
//! # Architecture
//!
//! - **`types`** — The value model (`Value`, `Integer`, `BigNumber`, `Dict`)
//! - **`codec`** — Type-code table, decoder, encoder and decoder options
//! - **`stream`** — Async reader/writer moving whole values over byte streams
//! - **`error`** — The `RencodeError` taxonomy
//!
//! ```
//! use bytes::BytesMut;
//! use rencode::codec::{encode_value, Decoder, DecodeOptions};
//! use rencode::types::Value;
//!
//! let mut buf = BytesMut::new();
//! encode_value(&mut buf, &Value::from("test0")).unwrap();
//! assert_eq!(&buf[..], b"\x85test0");
//!
//! let decoder = Decoder::new(DecodeOptions::builder().decode_as_text().build());
//! let value = decoder.decode_value(&mut &buf[..]).unwrap();
//! assert_eq!(value, Value::from("test0"));
//! ```

pub mod codec;
pub mod error;
pub mod stream;
pub mod types;

pub use error::RencodeError;
pub use types::Value;
