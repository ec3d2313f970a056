//! Rencode value types.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;

use super::BigNumber;

/// Type alias for rencode dictionaries.
///
/// Keys are arbitrary values; a `BTreeMap` keeps the wire enumeration order
/// deterministic for a given map.
pub type Dict = BTreeMap<Value, Value>;

/// A value in the rencode data model.
///
/// Equality and ordering are total: floats compare with `total_cmp`, and
/// integers compare by numeric value regardless of width.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(Integer),
    BigNumber(BigNumber),
    Float32(f32),
    Float64(f64),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Value>),
    Map(Dict),
}

/// An integer at the concrete width it was decoded from (or built with).
///
/// Two integers are equal when their numeric values are equal, so
/// `I8(5) == I32(5)`.
#[derive(Debug, Clone, Copy)]
pub enum Integer {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
}

impl Integer {
    /// Returns the numeric value widened to `i64`.
    pub fn get(self) -> i64 {
        match self {
            Self::I8(v) => i64::from(v),
            Self::I16(v) => i64::from(v),
            Self::I32(v) => i64::from(v),
            Self::I64(v) => v,
        }
    }

    /// Returns the narrowest width that holds `value`.
    pub fn narrowest(value: i64) -> Self {
        if let Ok(v) = i8::try_from(value) {
            Self::I8(v)
        } else if let Ok(v) = i16::try_from(value) {
            Self::I16(v)
        } else if let Ok(v) = i32::try_from(value) {
            Self::I32(v)
        } else {
            Self::I64(value)
        }
    }

    /// Truncates to a 32-bit identity (two's complement), as map keys are.
    pub fn to_i32_identity(self) -> Self {
        Self::I32(self.get() as i32)
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for Integer {}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl Value {
    /// Returns the value as a string reference, if it is a `Text` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw payload of a `Bytes` or `Text` variant.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Integer` variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i.get()),
            _ => None,
        }
    }

    /// Returns either float variant widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Dict> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) => 2,
            Self::BigNumber(_) => 3,
            Self::Float32(_) => 4,
            Self::Float64(_) => 5,
            Self::Bytes(_) => 6,
            Self::Text(_) => 7,
            Self::List(_) => 8,
            Self::Map(_) => 9,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::BigNumber(a), Self::BigNumber(b)) => a.cmp(b),
            (Self::Float32(a), Self::Float32(b)) => a.total_cmp(b),
            (Self::Float64(a), Self::Float64(b)) => a.total_cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

// -- Convenience conversions --

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Integer> for Value {
    fn from(i: Integer) -> Self {
        Self::Integer(i)
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Self::Integer(Integer::I8(i))
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Self::Integer(Integer::I16(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(Integer::I32(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(Integer::I64(i))
    }
}

/// Integers beyond 64 bits become a `BigNumber`; others take the narrowest width.
impl From<i128> for Value {
    fn from(i: i128) -> Self {
        match i64::try_from(i) {
            Ok(v) => Self::Integer(Integer::narrowest(v)),
            Err(_) => Self::BigNumber(BigNumber::from(i)),
        }
    }
}

impl From<u128> for Value {
    fn from(u: u128) -> Self {
        match i64::try_from(u) {
            Ok(v) => Self::Integer(Integer::narrowest(v)),
            Err(_) => Self::BigNumber(BigNumber::from(u)),
        }
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::from(i128::from(u))
    }
}

impl From<&BigInt> for Value {
    fn from(n: &BigInt) -> Self {
        match i64::try_from(n) {
            Ok(v) => Self::Integer(Integer::narrowest(v)),
            Err(_) => Self::BigNumber(BigNumber::from(n)),
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<BigNumber> for Value {
    fn from(n: BigNumber) -> Self {
        Self::BigNumber(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Self::Map(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::BigNumber(n) => write!(f, "{n}"),
            Self::Float32(v) => write!(f, "{v}f32"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(dict) => {
                write!(f, "{{")?;
                for (i, (k, v)) in dict.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
