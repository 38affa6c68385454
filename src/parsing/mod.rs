//! Line-level parsing utilities.
//!
//! This module contains the building blocks the record parser is made of:
//! - [`fields`] - tolerant attribute extraction and entity decoding
//! - [`address`] - phone number normalization

pub mod address;
pub mod fields;

// Re-export commonly used items
pub use address::normalize_address;
pub use fields::{attribute, attribute_until, between, unescape};
