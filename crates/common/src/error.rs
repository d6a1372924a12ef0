//! Error types shared across chatvid crates.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Top-level error type for chatvid operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatvidError {
    /// The project document violates the schema.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// The project file could not be read or written.
    #[error("Project error: {message}")]
    Project { message: String },

    /// A file the render needs is absent.
    #[error("Missing input: {path}")]
    MissingInput { path: PathBuf },

    /// An external tool (encoder, prober, browser) is not usable.
    #[error("Environment error: {message}")]
    Environment { message: String },

    #[error("Rasterize error: {message}")]
    Rasterize { message: String },

    /// The encoder ran but exited unsuccessfully. `output` is its captured
    /// diagnostic stream, verbatim.
    #[error("Encoder failed ({status}): {output}")]
    Encoder { status: ExitStatus, output: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type alias using ChatvidError.
pub type ChatvidResult<T> = Result<T, ChatvidError>;

impl ChatvidError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment {
            message: msg.into(),
        }
    }

    pub fn rasterize(msg: impl Into<String>) -> Self {
        Self::Rasterize {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the user should fix their installation rather than their
    /// project file.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::Environment { .. })
    }
}
