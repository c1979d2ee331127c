//! Shared types and math helpers used across the landscape crates.
//!
//! Conventions: left-handed world space (+Z forward, +Y up), column-major
//! matrices, clip-space depth in `[0, 1]`.

pub mod math;
pub mod types;

pub use types::ViewportSize;
