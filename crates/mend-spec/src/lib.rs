//! Mend Spec - Asset specification store
//!
//! Validates, normalizes, and completes declarative asset specifications,
//! derives specs from free-text descriptions, and extracts spec and
//! reference information from project source files.

mod complete;
mod describe;
mod extract;
mod model;
mod validate;

pub use complete::complete;
pub use describe::from_description;
pub use extract::{extract_from_source, extract_references, AssetReference};
pub use model::{AssetSpec, AssetType, BackgroundMode};
pub use validate::{validate, SpecValidation};
