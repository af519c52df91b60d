//! Base62 positional encoding of link identifiers.
//!
//! Digits are ordered `0-9`, `a-z`, `A-Z`, so `0 → "0"`, `61 → "Z"` and
//! `62 → "10"`. The most significant digit comes first.

/// Symbol table, indexed by digit value.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of symbols in [`ALPHABET`].
pub const BASE: u64 = 62;

/// Longest code a `u64` can produce (`62^11 > u64::MAX`).
pub const MAX_CODE_LENGTH: usize = 11;

/// Errors returned when a string cannot be decoded into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Short code is empty")]
    Empty,

    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Short code exceeds the supported identifier range")]
    Overflow,
}

/// Encodes an identifier as base62.
///
/// Zero encodes to `"0"`, never to an empty string.
///
/// # Examples
///
/// ```
/// use shortlink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "Z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(MAX_CODE_LENGTH);
    while value > 0 {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }

    digits.iter().rev().map(|&b| b as char).collect()
}

/// Decodes a base62 string back into its identifier.
///
/// Leading `0` symbols are accepted and contribute nothing to the value.
///
/// # Errors
///
/// - [`CodeError::Empty`] for an empty string
/// - [`CodeError::InvalidCharacter`] for a symbol outside [`ALPHABET`]
/// - [`CodeError::Overflow`] when the value does not fit in a `u64`
pub fn decode(code: &str) -> Result<u64, CodeError> {
    if code.is_empty() {
        return Err(CodeError::Empty);
    }

    code.chars()
        .enumerate()
        .try_fold(0u64, |acc, (position, character)| {
            let digit = digit_value(character)
                .ok_or(CodeError::InvalidCharacter { character, position })?;

            acc.checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or(CodeError::Overflow)
        })
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'a'..='z' => c as u64 - 'a' as u64 + 10,
        'A'..='Z' => c as u64 - 'A' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
