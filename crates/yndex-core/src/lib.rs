//! Yndex Core — shared types and errors.
//!
//! This crate provides the foundational types used across all Yndex crates.
//! It has no internal Yndex dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias

pub mod error;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
