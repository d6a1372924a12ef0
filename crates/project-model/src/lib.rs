//! chatvid Project Model
//!
//! Defines the data contracts for chatvid projects:
//! - **Project:** background video, output, resolution, chat transcript, overlays
//! - **Validation:** fail-fast schema checks over a decoded JSON document
//! - **Screenshots:** message-range keys and their deterministic file paths
//!
//! Every relative path in a project document is resolved against the
//! directory containing the project file.

pub mod project;
pub mod screenshot;
pub mod validate;

pub use project::*;
pub use screenshot::*;
pub use validate::*;
