//! chatvid Common Utilities
//!
//! Shared infrastructure for all chatvid crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (encoder, rasterizer, logging)
//! - External tool probing

pub mod config;
pub mod error;
pub mod logging;
pub mod process;

pub use config::*;
pub use error::*;
