//! Short code derivation from link identifiers.
//!
//! Codes are never random: each one is the base62 form of the row identifier,
//! left-padded with `0` up to a configurable minimum length. Uniqueness of the
//! identifier therefore carries over to the code without a collision check.

use crate::utils::base62::{self, CodeError, MAX_CODE_LENGTH};

/// Default minimum code length (no padding).
pub const DEFAULT_MIN_LENGTH: usize = 1;

/// Reserved codes that cannot be used as short links.
///
/// These collide with fixed route segments, so an identifier that encodes to
/// one of them is skipped.
pub const RESERVED_CODES: &[&str] = &["shorten", "health", "analytics", "api", "static"];

/// Converts identifiers to short codes and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortCodeCodec {
    min_length: usize,
}

impl ShortCodeCodec {
    /// Creates a codec that pads codes to `min_length` symbols.
    ///
    /// The length is clamped to `1..=11`; anything longer than the widest
    /// `u64` code would only add constant zeros.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length.clamp(1, MAX_CODE_LENGTH),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encodes an identifier, padding with leading zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use shortlink::utils::code_generator::ShortCodeCodec;
    ///
    /// let codec = ShortCodeCodec::new(4);
    /// assert_eq!(codec.encode(1), "0001");
    /// assert_eq!(codec.decode("0001").unwrap(), 1);
    /// ```
    pub fn encode(&self, id: u64) -> String {
        let code = base62::encode(id);
        if code.len() >= self.min_length {
            return code;
        }

        let mut padded = "0".repeat(self.min_length - code.len());
        padded.push_str(&code);
        padded
    }

    /// Decodes a short code into its identifier.
    ///
    /// # Errors
    ///
    /// Propagates [`CodeError`] from [`base62::decode`].
    pub fn decode(&self, code: &str) -> Result<u64, CodeError> {
        base62::decode(code)
    }
}

impl Default for ShortCodeCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

/// Returns true if the code collides with a reserved route segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
