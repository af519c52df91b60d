//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with its click counter
//! - [`NewLink`] - Input for inserting a link
//! - [`LinkStatus`] - Active / expired state at lookup time

pub mod link;

pub use link::{Link, LinkStatus, NewLink};
