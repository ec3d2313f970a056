//! Rencode encoding: `Value` → bytes.
//!
//! Every writer appends to the sink. If an error is returned part of the value
//! may already have been written.
//!
//! Nesting depth is not limited here; decoders reject values nested beyond
//! their `max_depth` (256 by default).

use bytes::BufMut;

use super::typecode;
use crate::error::RencodeError;
use crate::types::{BigNumber, Dict, Integer, Value};

/// Encodes a `Value` into the buffer using the most compact framing.
pub fn encode_value(buf: &mut impl BufMut, value: &Value) -> Result<(), RencodeError> {
    match value {
        Value::Null => encode_null(buf),
        Value::Boolean(b) => encode_bool(buf, *b),
        Value::Integer(i) => encode_integer(buf, *i),
        Value::BigNumber(n) => return encode_big_number(buf, n),
        Value::Float32(f) => encode_f32(buf, *f),
        Value::Float64(f) => encode_f64(buf, *f),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_str(buf, s),
        Value::List(items) => return encode_list(buf, items),
        Value::Map(dict) => return encode_map(buf, dict),
    }
    Ok(())
}

pub fn encode_null(buf: &mut impl BufMut) {
    buf.put_u8(typecode::NULL);
}

pub fn encode_bool(buf: &mut impl BufMut, value: bool) {
    buf.put_u8(if value { typecode::TRUE } else { typecode::FALSE });
}

/// Encodes an integer starting from the width it is stored at.
pub fn encode_integer(buf: &mut impl BufMut, value: Integer) {
    match value {
        Integer::I8(v) => encode_i8(buf, v),
        Integer::I16(v) => encode_i16(buf, v),
        Integer::I32(v) => encode_i32(buf, v),
        Integer::I64(v) => encode_i64(buf, v),
    }
}

/// Encodes an 8-bit integer, embedding it in the tag when in [-32, 43].
pub fn encode_i8(buf: &mut impl BufMut, value: i8) {
    match typecode::fixed_int_tag(i64::from(value)) {
        Some(tag) => buf.put_u8(tag),
        None => {
            buf.put_u8(typecode::INT_1);
            buf.put_i8(value);
        }
    }
}

pub fn encode_i16(buf: &mut impl BufMut, value: i16) {
    if let Ok(v) = i8::try_from(value) {
        encode_i8(buf, v);
    } else {
        buf.put_u8(typecode::INT_2);
        buf.put_i16(value);
    }
}

pub fn encode_i32(buf: &mut impl BufMut, value: i32) {
    if let Ok(v) = i16::try_from(value) {
        encode_i16(buf, v);
    } else {
        buf.put_u8(typecode::INT_4);
        buf.put_i32(value);
    }
}

pub fn encode_i64(buf: &mut impl BufMut, value: i64) {
    if let Ok(v) = i32::try_from(value) {
        encode_i32(buf, v);
    } else {
        buf.put_u8(typecode::INT_8);
        buf.put_i64(value);
    }
}

pub fn encode_f32(buf: &mut impl BufMut, value: f32) {
    buf.put_u8(typecode::FLOAT_32);
    buf.put_f32(value);
}

pub fn encode_f64(buf: &mut impl BufMut, value: f64) {
    buf.put_u8(typecode::FLOAT_64);
    buf.put_f64(value);
}

/// Encodes a string (size = UTF-8 byte length, not char count).
pub fn encode_str(buf: &mut impl BufMut, value: &str) {
    encode_bytes(buf, value.as_bytes());
}

pub fn encode_bytes(buf: &mut impl BufMut, value: &[u8]) {
    encode_string_header(buf, value.len());
    buf.put_slice(value);
}

fn encode_string_header(buf: &mut impl BufMut, len: usize) {
    if len < typecode::STR_FIXED_COUNT {
        buf.put_u8(typecode::STR_FIXED_START + len as u8);
    } else {
        buf.put_slice(len.to_string().as_bytes());
        buf.put_u8(typecode::LENGTH_DELIMITER);
    }
}

/// Encodes a big number as the marker tag followed by its text as a string.
pub fn encode_big_number(buf: &mut impl BufMut, value: &BigNumber) -> Result<(), RencodeError> {
    if value.len() >= typecode::MAX_NUMBER_TEXT_LEN {
        return Err(RencodeError::NumberTooLong(value.len()));
    }
    buf.put_u8(typecode::BIG_NUMBER);
    encode_str(buf, value.as_str());
    Ok(())
}

pub fn encode_list(buf: &mut impl BufMut, items: &[Value]) -> Result<(), RencodeError> {
    let len = items.len();
    if len < typecode::LIST_FIXED_COUNT {
        buf.put_u8(typecode::LIST_FIXED_START + len as u8);
        for item in items {
            encode_value(buf, item)?;
        }
    } else {
        buf.put_u8(typecode::LIST);
        for item in items {
            encode_value(buf, item)?;
        }
        buf.put_u8(typecode::TERM);
    }
    Ok(())
}

/// Encodes a dictionary. Keys go through the generic value encoder.
pub fn encode_map(buf: &mut impl BufMut, dict: &Dict) -> Result<(), RencodeError> {
    let len = dict.len();
    let unbounded = len >= typecode::DICT_FIXED_COUNT;
    if unbounded {
        buf.put_u8(typecode::DICT);
    } else {
        buf.put_u8(typecode::DICT_FIXED_START + len as u8);
    }
    for (key, value) in dict {
        encode_value(buf, key)?;
        encode_value(buf, value)?;
    }
    if unbounded {
        buf.put_u8(typecode::TERM);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encoded(value: &Value) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_value(&mut buf, value).expect("encode failed");
        buf
    }

    #[test]
    fn encode_null_marker() {
        assert_eq!(&encoded(&Value::Null)[..], &[69]);
    }

    #[test]
    fn encode_booleans() {
        let mut buf = BytesMut::new();
        encode_bool(&mut buf, true);
        encode_bool(&mut buf, false);
        assert_eq!(&buf[..], &[67, 68]);
    }

    #[test]
    fn integer_tiers() {
        let cases: [(i64, &[u8]); 14] = [
            (0, &[0]),
            (43, &[43]),
            (44, &[62, 44]),
            (-1, &[70]),
            (-32, &[101]),
            (-33, &[62, 0xDF]),
            (127, &[62, 0x7F]),
            (-128, &[62, 0x80]),
            (-129, &[63, 0xFF, 0x7F]),
            (32767, &[63, 0x7F, 0xFF]),
            (32768, &[64, 0x00, 0x00, 0x80, 0x00]),
            (2_147_483_647, &[64, 0x7F, 0xFF, 0xFF, 0xFF]),
            (2_147_483_648, &[65, 0, 0, 0, 0, 0x80, 0, 0, 0]),
            (i64::MIN, &[65, 0x80, 0, 0, 0, 0, 0, 0, 0]),
        ];
        for (value, expected) in cases {
            let mut buf = BytesMut::new();
            encode_i64(&mut buf, value);
            assert_eq!(&buf[..], expected, "failed for {value}");
        }
    }

    #[test]
    fn wider_writers_delegate_to_narrower() {
        let mut buf = BytesMut::new();
        encode_i64(&mut buf, 5);
        encode_i32(&mut buf, -100);
        encode_i16(&mut buf, 300);
        assert_eq!(&buf[..], &[5, 62, 0x9C, 63, 0x01, 0x2C]);

        // Stored width does not leak onto the wire.
        assert_eq!(&encoded(&Value::Integer(Integer::I64(100)))[..], &[62, 100]);
        assert_eq!(&encoded(&Value::Integer(Integer::I32(-2)))[..], &[71]);
    }

    #[test]
    fn encode_floats() {
        let buf = encoded(&Value::Float32(1.5));
        assert_eq!(buf[0], typecode::FLOAT_32);
        assert_eq!(&buf[1..], &1.5f32.to_be_bytes());

        let buf = encoded(&Value::Float64(1.23));
        assert_eq!(buf[0], typecode::FLOAT_64);
        assert_eq!(&buf[1..], &1.23f64.to_be_bytes());
    }

    #[test]
    fn encode_short_string() {
        let buf = encoded(&Value::from("test0"));
        assert_eq!(&buf[..], b"\x85test0");
        assert_eq!(buf[0], 133);
    }

    #[test]
    fn string_length_boundary() {
        let s63 = "a".repeat(63);
        let buf = encoded(&Value::from(s63.as_str()));
        assert_eq!(buf[0], 128 + 63);
        assert_eq!(buf.len(), 64);

        let s64 = "a".repeat(64);
        let buf = encoded(&Value::from(s64.as_str()));
        assert_eq!(&buf[..3], b"64:");
        assert_eq!(&buf[3..], s64.as_bytes());
    }

    #[test]
    fn string_length_counts_utf8_bytes() {
        // 32 two-byte characters = 64 bytes.
        let s = "é".repeat(32);
        let buf = encoded(&Value::from(s.as_str()));
        assert_eq!(&buf[..3], b"64:");
    }

    #[test]
    fn bytes_share_string_framing() {
        assert_eq!(&encoded(&Value::Bytes(vec![0xDE, 0xAD]))[..], &[130, 0xDE, 0xAD]);
        assert_eq!(&encoded(&Value::Bytes(vec![]))[..], &[128]);
    }

    #[test]
    fn list_count_boundary() {
        let items: Vec<Value> = (0..63).map(|_| Value::Null).collect();
        let buf = encoded(&Value::List(items));
        assert_eq!(buf[0], 192 + 63);
        assert_eq!(buf.len(), 64);

        let items: Vec<Value> = (0..64).map(|_| Value::Null).collect();
        let buf = encoded(&Value::List(items));
        assert_eq!(buf[0], typecode::LIST);
        assert_eq!(buf[buf.len() - 1], typecode::TERM);
        assert_eq!(buf.len(), 66);
    }

    #[test]
    fn encode_small_list() {
        let items = vec![Value::from(1i8), Value::from(2i8), Value::from(3i8)];
        assert_eq!(&encoded(&Value::List(items))[..], &[195, 1, 2, 3]);
        assert_eq!(&encoded(&Value::List(vec![]))[..], &[192]);
    }

    #[test]
    fn map_count_boundary() {
        let dict: Dict = (0..24i32).map(|i| (Value::from(i), Value::Null)).collect();
        let buf = encoded(&Value::Map(dict));
        assert_eq!(buf[0], 102 + 24);
        assert_ne!(buf[buf.len() - 1], typecode::TERM);

        let dict: Dict = (0..25i32).map(|i| (Value::from(i), Value::Null)).collect();
        let buf = encoded(&Value::Map(dict));
        assert_eq!(buf[0], typecode::DICT);
        assert_eq!(buf[buf.len() - 1], typecode::TERM);
    }

    #[test]
    fn map_keys_use_generic_encoder() {
        let dict = Dict::from([(Value::from("k"), Value::from(true))]);
        assert_eq!(&encoded(&Value::Map(dict))[..], &[103, 129, b'k', 67]);
        assert_eq!(&encoded(&Value::Map(Dict::new()))[..], &[102]);
    }

    #[test]
    fn big_number_framing() {
        let n = BigNumber::parse("123456789012345678901234567890").unwrap();
        let buf = encoded(&Value::BigNumber(n));
        assert_eq!(buf[0], typecode::BIG_NUMBER);
        assert_eq!(buf[1], 128 + 30);
        assert_eq!(&buf[2..], b"123456789012345678901234567890");
    }

    #[test]
    fn big_number_length_limit() {
        let ok = BigNumber::parse(&"9".repeat(63)).unwrap();
        assert!(encode_big_number(&mut BytesMut::new(), &ok).is_ok());

        let too_long = BigNumber::parse(&"9".repeat(64)).unwrap();
        let nested = Value::List(vec![Value::BigNumber(too_long)]);
        assert!(matches!(
            encode_value(&mut BytesMut::new(), &nested),
            Err(RencodeError::NumberTooLong(64))
        ));
    }

    #[test]
    fn encodes_into_plain_vec() {
        let mut out: Vec<u8> = Vec::new();
        encode_value(&mut out, &Value::from(7i8)).unwrap();
        encode_value(&mut out, &Value::Null).unwrap();
        assert_eq!(out, vec![7, 69]);
    }
}
