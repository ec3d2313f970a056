//! Arbitrary-precision numbers carried as ASCII text.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::error::RencodeError;

/// An arbitrary-precision integer or decimal in canonical ASCII form.
///
/// Accepted syntax: optional sign, digits, optional `.` fraction, optional
/// exponent (`e`/`E`, optional sign, digits). At least one mantissa digit is
/// required. Equality is textual: `1.0` and `1.00` differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigNumber(String);

impl BigNumber {
    /// Validates `text` and wraps it.
    pub fn parse(text: &str) -> Result<Self, RencodeError> {
        if is_number_text(text.as_bytes()) {
            Ok(Self(text.to_owned()))
        } else {
            Err(RencodeError::InvalidBigNumber(text.to_owned()))
        }
    }

    /// Validates a raw ASCII payload read off the wire.
    pub fn from_ascii(bytes: &[u8]) -> Result<Self, RencodeError> {
        if is_number_text(bytes) {
            // ASCII-only, so always valid UTF-8.
            let text = std::str::from_utf8(bytes)?;
            Ok(Self(text.to_owned()))
        } else {
            Err(RencodeError::InvalidBigNumber(
                String::from_utf8_lossy(bytes).into_owned(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the textual form in bytes (equal to characters: ASCII only).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_number_text(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    if let [b'+' | b'-', tail @ ..] = rest {
        rest = tail;
    }

    let int_digits = leading_digits(rest);
    rest = &rest[int_digits..];

    let mut frac_digits = 0;
    if let [b'.', tail @ ..] = rest {
        frac_digits = leading_digits(tail);
        rest = &tail[frac_digits..];
    }
    if int_digits + frac_digits == 0 {
        return false;
    }

    if let [b'e' | b'E', tail @ ..] = rest {
        rest = tail;
        if let [b'+' | b'-', tail @ ..] = rest {
            rest = tail;
        }
        let exp_digits = leading_digits(rest);
        if exp_digits == 0 {
            return false;
        }
        rest = &rest[exp_digits..];
    }

    rest.is_empty()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

impl FromStr for BigNumber {
    type Err = RencodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for BigNumber {
    fn from(v: i64) -> Self {
        Self(v.to_string())
    }
}

impl From<i128> for BigNumber {
    fn from(v: i128) -> Self {
        Self(v.to_string())
    }
}

impl From<u128> for BigNumber {
    fn from(v: u128) -> Self {
        Self(v.to_string())
    }
}

impl From<&BigInt> for BigNumber {
    fn from(v: &BigInt) -> Self {
        Self(v.to_str_radix(10))
    }
}

/// Only integer text converts; fractions and exponents are rejected.
impl TryFrom<&BigNumber> for BigInt {
    type Error = RencodeError;

    fn try_from(n: &BigNumber) -> Result<Self, Self::Error> {
        BigInt::from_str(n.as_str())
            .map_err(|_| RencodeError::InvalidBigNumber(format!("{} is not an integer", n.0)))
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
