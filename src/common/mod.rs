//! Common types, errors, and traits shared across the crate

pub mod de;
pub mod errors;
pub mod traits;
pub mod types;
