//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Public request/response fields are camelCase.

pub mod analytics;
pub mod health;
pub mod shorten;
pub mod stats;
