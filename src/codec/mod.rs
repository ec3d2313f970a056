//! Rencode binary encoding format.
//!
//! Each value starts with a one-byte type code (or an ASCII-digit length
//! prefix). Multi-byte numbers are big-endian. Values are self-delimiting and
//! written back to back with no framing between them.

pub mod decode;
pub mod encode;
pub mod options;
pub mod typecode;

pub use decode::{decode_value, Decoder};
pub use encode::encode_value;
pub use options::{DecodeOptions, DecodeOptionsBuilder, StringMode};
