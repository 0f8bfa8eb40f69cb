// src/codec/alphabet.rs - Radix conversion between integers and tokens
use std::fmt;

use serde::{Deserialize, Serialize};

use super::CodecError;

/// Lowercase letters followed by digits; `a` is digit zero
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

const NOT_A_DIGIT: u8 = u8::MAX;

/// Ordered set of URL-safe ASCII characters. The position of a character is
/// its digit value, and the number of characters is the radix.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    chars: Vec<u8>,
    // ASCII code -> digit value
    digits: [u8; 128],
}

impl Alphabet {
    pub fn new(chars: &str) -> Result<Self, CodecError> {
        let bytes = chars.as_bytes();
        if bytes.len() < 2 || bytes.len() > NOT_A_DIGIT as usize {
            return Err(CodecError::InvalidAlphabet(format!(
                "expected between 2 and {} characters, got {}",
                NOT_A_DIGIT,
                chars.chars().count()
            )));
        }

        let mut digits = [NOT_A_DIGIT; 128];
        for (value, &b) in bytes.iter().enumerate() {
            if !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
                return Err(CodecError::InvalidAlphabet(format!(
                    "'{}' is not a URL-safe character",
                    chars[value..].chars().next().unwrap_or_default()
                )));
            }
            if digits[b as usize] != NOT_A_DIGIT {
                return Err(CodecError::InvalidAlphabet(format!(
                    "'{}' appears more than once",
                    b as char
                )));
            }
            digits[b as usize] = value as u8;
        }

        Ok(Self {
            chars: bytes.to_vec(),
            digits,
        })
    }

    pub fn radix(&self) -> u64 {
        self.chars.len() as u64
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever accepted in `new`
        std::str::from_utf8(&self.chars).unwrap_or_default()
    }

    /// Renders `x` most significant digit first. Zero is the single first character.
    pub fn enbase(&self, mut x: u64) -> String {
        let radix = self.radix();
        let mut out = Vec::new();
        loop {
            out.push(self.chars[(x % radix) as usize]);
            x /= radix;
            if x == 0 {
                break;
            }
        }
        out.iter().rev().map(|&b| b as char).collect()
    }

    /// Parses a token written by [`Alphabet::enbase`].
    ///
    /// Empty tokens, characters outside the alphabet and redundant leading zero
    /// digits are rejected as invalid; values past `u64::MAX` are out of range.
    pub fn debase(&self, token: &str) -> Result<u64, CodecError> {
        let bytes = token.as_bytes();
        if bytes.is_empty() {
            return Err(CodecError::InvalidToken("token is empty".to_string()));
        }
        if bytes.len() > 1 && bytes[0] == self.chars[0] {
            return Err(CodecError::InvalidToken(format!(
                "'{}' has a leading zero digit",
                token
            )));
        }

        let radix = self.radix();
        let mut value: u64 = 0;
        for c in token.chars() {
            let digit = self.digit(c).ok_or_else(|| {
                CodecError::InvalidToken(format!("'{}' is not in the alphabet", c))
            })?;
            value = value
                .checked_mul(radix)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| CodecError::OutOfRange(format!("'{}' overflows", token)))?;
        }

        Ok(value)
    }

    fn digit(&self, c: char) -> Option<u64> {
        if !c.is_ascii() {
            return None;
        }
        match self.digits[c as usize] {
            NOT_A_DIGIT => None,
            d => Some(d as u64),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET).expect("default alphabet is valid")
    }
}

impl TryFrom<String> for Alphabet {
    type Error = CodecError;

    fn try_from(chars: String) -> Result<Self, Self::Error> {
        Self::new(&chars)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.as_str().to_string()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars
    }
}

impl Eq for Alphabet {}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}
