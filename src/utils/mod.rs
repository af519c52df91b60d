//! Utility functions for code derivation and URL processing.
//!
//! - [`base62`] - Base62 encoding of identifiers
//! - [`code_generator`] - Short code derivation with padding and reserved codes
//! - [`url_normalizer`] - URL normalization for deduplication

pub mod base62;
pub mod code_generator;
pub mod url_normalizer;
