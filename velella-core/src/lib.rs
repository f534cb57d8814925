//! Shared primitives and utilities for the Velella spatial-index workspace.
//!
//! `velella-core` provides the foundation the other Velella crates build on:
//!
//! - **Error types** — [`VelellaError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`] for one-line diagnostics

pub mod error;
pub mod traits;

pub use error::{Result, VelellaError};
pub use traits::*;
