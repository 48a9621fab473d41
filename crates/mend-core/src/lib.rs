//! Mend Core - Foundational types for the mend asset pipeline
//!
//! This crate provides the types the other mend crates depend on:
//! - `MendError` and the `Result` alias
//! - `ContentHash` - SHA-256 based content hashing for generated files
//! - ISO 8601 timestamp formatting for registry and manifest documents

mod error;
mod hash;
mod time;

pub use error::{MendError, Result};
pub use hash::ContentHash;
pub use time::now_iso8601;
