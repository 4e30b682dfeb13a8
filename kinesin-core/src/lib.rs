//! Shared primitives for kinesin trajectory CV analysis.
//!
//! - **Error types** — [`KinesinError`] and [`Result`] for structured error handling
//! - **Traits** — [`Annotated`] and [`Summarizable`], implemented by series,
//!   classifications and reports in the other crates

pub mod error;
pub mod traits;

pub use error::{KinesinError, Result};
pub use traits::*;
