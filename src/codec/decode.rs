//! Rencode decoding: bytes → `Value`.

use bytes::Buf;

use super::options::{DecodeOptions, StringMode};
use super::typecode::{self, TypeCode};
use crate::error::RencodeError;
use crate::types::{BigNumber, Dict, Integer, Value};

/// Decodes a single `Value` from the buffer using default options.
pub fn decode_value(buf: &mut impl Buf) -> Result<Value, RencodeError> {
    Decoder::default().decode_value(buf)
}

/// A rencode decoder.
///
/// Holds only its options; the byte source is passed to every call. After an
/// error the source position is unspecified and the source should not be
/// reused without resynchronizing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes one complete value, consuming exactly its bytes.
    pub fn decode_value(&self, buf: &mut impl Buf) -> Result<Value, RencodeError> {
        let tag = read_tag(buf)?;
        self.decode_tagged(buf, tag, 0)
    }

    fn decode_tagged(
        &self,
        buf: &mut impl Buf,
        tag: u8,
        depth: usize,
    ) -> Result<Value, RencodeError> {
        let Some(code) = typecode::classify(tag) else {
            tracing::debug!(tag, "unassigned rencode type code");
            return Err(RencodeError::InvalidTag(tag));
        };

        match code {
            TypeCode::Null => Ok(Value::Null),
            TypeCode::True => Ok(Value::Boolean(true)),
            TypeCode::False => Ok(Value::Boolean(false)),

            TypeCode::FixedInt(v) => Ok(Value::Integer(Integer::I8(v))),
            TypeCode::Int1 => {
                ensure_remaining(buf, 1)?;
                Ok(Value::Integer(Integer::I8(buf.get_i8())))
            }
            TypeCode::Int2 => {
                ensure_remaining(buf, 2)?;
                Ok(Value::Integer(Integer::I16(buf.get_i16())))
            }
            TypeCode::Int4 => {
                ensure_remaining(buf, 4)?;
                Ok(Value::Integer(Integer::I32(buf.get_i32())))
            }
            TypeCode::Int8 => {
                ensure_remaining(buf, 8)?;
                Ok(Value::Integer(Integer::I64(buf.get_i64())))
            }

            TypeCode::Float32 => {
                ensure_remaining(buf, 4)?;
                Ok(Value::Float32(buf.get_f32()))
            }
            TypeCode::Float64 => {
                ensure_remaining(buf, 8)?;
                Ok(Value::Float64(buf.get_f64()))
            }

            TypeCode::FixedStr(len) => self.decode_string_data(buf, len),
            TypeCode::LengthDigit(first) => {
                let len = read_length(buf, first)?;
                self.decode_string_data(buf, len)
            }

            TypeCode::BigNumber => decode_big_number_data(buf).map(Value::BigNumber),

            TypeCode::FixedList(count) => {
                self.decode_list_data(buf, Some(count), depth).map(Value::List)
            }
            TypeCode::List => self.decode_list_data(buf, None, depth).map(Value::List),

            TypeCode::FixedDict(count) => {
                self.decode_dict_data(buf, Some(count), depth).map(Value::Map)
            }
            TypeCode::Dict => self.decode_dict_data(buf, None, depth).map(Value::Map),

            // Only meaningful inside an unbounded container.
            TypeCode::Term => Err(RencodeError::InvalidTag(tag)),
        }
    }

    /// Decodes a child of the container at `depth`.
    fn decode_child(&self, buf: &mut impl Buf, depth: usize) -> Result<Value, RencodeError> {
        let child_depth = depth + 1;
        if child_depth > self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, "rencode nesting limit hit");
            return Err(RencodeError::DepthLimitExceeded(self.options.max_depth));
        }
        let tag = read_tag(buf)?;
        self.decode_tagged(buf, tag, child_depth)
    }

    fn decode_string_data(&self, buf: &mut impl Buf, len: usize) -> Result<Value, RencodeError> {
        let data = read_exact(buf, len)?;
        match self.options.string_mode {
            StringMode::Bytes => Ok(Value::Bytes(data)),
            StringMode::Text => into_text(data).map(Value::Text),
        }
    }

    /// Reads list items. `None` means terminator-delimited.
    fn decode_list_data(
        &self,
        buf: &mut impl Buf,
        count: Option<usize>,
        depth: usize,
    ) -> Result<Vec<Value>, RencodeError> {
        match count {
            Some(count) => {
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.decode_child(buf, depth)?);
                }
                Ok(items)
            }
            None => {
                let mut items = Vec::new();
                while !take_terminator(buf)? {
                    items.push(self.decode_child(buf, depth)?);
                }
                Ok(items)
            }
        }
    }

    /// Reads dictionary pairs. `None` means terminator-delimited.
    fn decode_dict_data(
        &self,
        buf: &mut impl Buf,
        count: Option<usize>,
        depth: usize,
    ) -> Result<Dict, RencodeError> {
        let mut dict = Dict::new();
        match count {
            Some(count) => {
                for _ in 0..count {
                    self.decode_pair(buf, depth, &mut dict)?;
                }
            }
            None => {
                while !take_terminator(buf)? {
                    self.decode_pair(buf, depth, &mut dict)?;
                }
            }
        }
        Ok(dict)
    }

    fn decode_pair(
        &self,
        buf: &mut impl Buf,
        depth: usize,
        dict: &mut Dict,
    ) -> Result<(), RencodeError> {
        let key = normalize_key(self.decode_child(buf, depth)?)?;
        let value = self.decode_child(buf, depth)?;
        dict.insert(key, value);
        Ok(())
    }

    // -- Typed reads --

    /// Reads a boolean; any tag other than true/false is a mismatch.
    pub fn read_bool(&self, buf: &mut impl Buf) -> Result<bool, RencodeError> {
        match read_tag(buf)? {
            typecode::TRUE => Ok(true),
            typecode::FALSE => Ok(false),
            tag => Err(mismatch("boolean", tag)),
        }
    }

    /// Reads any integer tag and truncates it to 8 bits.
    pub fn read_i8(&self, buf: &mut impl Buf) -> Result<i8, RencodeError> {
        read_number(buf).map(|v| v as i8)
    }

    /// Reads any integer tag and truncates it to 16 bits.
    pub fn read_i16(&self, buf: &mut impl Buf) -> Result<i16, RencodeError> {
        read_number(buf).map(|v| v as i16)
    }

    /// Reads any integer tag and truncates it to 32 bits.
    pub fn read_i32(&self, buf: &mut impl Buf) -> Result<i32, RencodeError> {
        read_number(buf).map(|v| v as i32)
    }

    pub fn read_i64(&self, buf: &mut impl Buf) -> Result<i64, RencodeError> {
        read_number(buf)
    }

    /// Reads a 32-bit float. A 64-bit float tag is a mismatch, not a narrowing.
    pub fn read_f32(&self, buf: &mut impl Buf) -> Result<f32, RencodeError> {
        expect_tag(buf, typecode::FLOAT_32, "float32")?;
        ensure_remaining(buf, 4)?;
        Ok(buf.get_f32())
    }

    /// Reads a 64-bit float. A 32-bit float tag is a mismatch, not a widening.
    pub fn read_f64(&self, buf: &mut impl Buf) -> Result<f64, RencodeError> {
        expect_tag(buf, typecode::FLOAT_64, "float64")?;
        ensure_remaining(buf, 8)?;
        Ok(buf.get_f64())
    }

    /// Reads a string as UTF-8 text regardless of the string mode.
    pub fn read_string(&self, buf: &mut impl Buf) -> Result<String, RencodeError> {
        let len = read_string_header(buf, "string")?;
        into_text(read_exact(buf, len)?)
    }

    /// Reads a string as raw bytes regardless of the string mode.
    pub fn read_bytes(&self, buf: &mut impl Buf) -> Result<Vec<u8>, RencodeError> {
        let len = read_string_header(buf, "bytes")?;
        read_exact(buf, len)
    }

    pub fn read_big_number(&self, buf: &mut impl Buf) -> Result<BigNumber, RencodeError> {
        expect_tag(buf, typecode::BIG_NUMBER, "big number")?;
        decode_big_number_data(buf)
    }

    pub fn read_list(&self, buf: &mut impl Buf) -> Result<Vec<Value>, RencodeError> {
        let tag = read_tag(buf)?;
        match typecode::classify(tag) {
            Some(TypeCode::FixedList(count)) => self.decode_list_data(buf, Some(count), 0),
            Some(TypeCode::List) => self.decode_list_data(buf, None, 0),
            _ => Err(mismatch("list", tag)),
        }
    }

    /// Reads a dictionary; keys are normalized as in [`Decoder::decode_value`].
    pub fn read_map(&self, buf: &mut impl Buf) -> Result<Dict, RencodeError> {
        let tag = read_tag(buf)?;
        match typecode::classify(tag) {
            Some(TypeCode::FixedDict(count)) => self.decode_dict_data(buf, Some(count), 0),
            Some(TypeCode::Dict) => self.decode_dict_data(buf, None, 0),
            _ => Err(mismatch("dict", tag)),
        }
    }
}

/// Collapses a decoded map key to its identity: integers of any width become
/// 32-bit (two's-complement truncation), byte strings become text.
fn normalize_key(key: Value) -> Result<Value, RencodeError> {
    match key {
        Value::Integer(i) => Ok(Value::Integer(i.to_i32_identity())),
        Value::Bytes(b) => into_text(b).map(Value::Text),
        other => Ok(other),
    }
}

fn read_number(buf: &mut impl Buf) -> Result<i64, RencodeError> {
    let tag = read_tag(buf)?;
    match typecode::classify(tag) {
        Some(TypeCode::FixedInt(v)) => Ok(i64::from(v)),
        Some(TypeCode::Int1) => {
            ensure_remaining(buf, 1)?;
            Ok(i64::from(buf.get_i8()))
        }
        Some(TypeCode::Int2) => {
            ensure_remaining(buf, 2)?;
            Ok(i64::from(buf.get_i16()))
        }
        Some(TypeCode::Int4) => {
            ensure_remaining(buf, 4)?;
            Ok(i64::from(buf.get_i32()))
        }
        Some(TypeCode::Int8) => {
            ensure_remaining(buf, 8)?;
            Ok(buf.get_i64())
        }
        _ => Err(mismatch("integer", tag)),
    }
}

/// Reads a fixed-length or `<len>:` string header and returns the length.
fn read_string_header(buf: &mut impl Buf, expected: &'static str) -> Result<usize, RencodeError> {
    let tag = read_tag(buf)?;
    match typecode::classify(tag) {
        Some(TypeCode::FixedStr(len)) => Ok(len),
        Some(TypeCode::LengthDigit(first)) => read_length(buf, first),
        _ => Err(mismatch(expected, tag)),
    }
}

fn decode_big_number_data(buf: &mut impl Buf) -> Result<BigNumber, RencodeError> {
    let len = read_string_header(buf, "big number text")?;
    BigNumber::from_ascii(&read_exact(buf, len)?)
}

/// Parses the remaining digits of a decimal length field up to the `:`.
fn read_length(buf: &mut impl Buf, first_digit: u8) -> Result<usize, RencodeError> {
    let mut len = usize::from(first_digit);
    loop {
        let b = read_tag(buf)?;
        if b == typecode::LENGTH_DELIMITER {
            return Ok(len);
        }
        if !b.is_ascii_digit() {
            return Err(RencodeError::InvalidLength(format!(
                "unexpected byte 0x{b:02X} in length field"
            )));
        }
        len = len
            .checked_mul(10)
            .and_then(|l| l.checked_add(usize::from(b - b'0')))
            .ok_or_else(|| RencodeError::InvalidLength("length field overflows".into()))?;
    }
}

fn read_tag(buf: &mut impl Buf) -> Result<u8, RencodeError> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8())
}

fn expect_tag(buf: &mut impl Buf, expected: u8, name: &'static str) -> Result<(), RencodeError> {
    let tag = read_tag(buf)?;
    if tag == expected {
        Ok(())
    } else {
        Err(mismatch(name, tag))
    }
}

/// Consumes the next byte if it is the terminator. Does not consume otherwise.
fn take_terminator(buf: &mut impl Buf) -> Result<bool, RencodeError> {
    match buf.chunk().first() {
        Some(&typecode::TERM) => {
            buf.advance(1);
            Ok(true)
        }
        Some(_) => Ok(false),
        None => Err(RencodeError::eof(1, 0)),
    }
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), RencodeError> {
    if buf.remaining() < needed {
        Err(RencodeError::eof(needed, buf.remaining()))
    } else {
        Ok(())
    }
}

fn read_exact(buf: &mut impl Buf, len: usize) -> Result<Vec<u8>, RencodeError> {
    ensure_remaining(buf, len)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    Ok(data)
}

fn into_text(data: Vec<u8>) -> Result<String, RencodeError> {
    String::from_utf8(data).map_err(|e| RencodeError::InvalidUtf8(e.utf8_error()))
}

fn mismatch(expected: &'static str, tag: u8) -> RencodeError {
    let found = typecode::region_of(tag).map_or("unassigned type code", |r| r.name);
    tracing::trace!(expected, found, tag, "typed read mismatch");
    RencodeError::TypeMismatch {
        expected,
        found,
        tag,
    }
}
