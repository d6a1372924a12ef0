//! Screenshot identity and on-disk locations.
//!
//! A screenshot is identified by the inclusive message range it depicts.
//! Every overlay sharing a range shares one image, stored at a path that is
//! a pure function of the key.

use std::fmt;
use std::path::{Path, PathBuf};

/// Directory (relative to the project directory) holding chat screenshots.
pub const SCREENSHOT_DIR: [&str; 2] = ["out", "chat"];

/// Inclusive message range `[start, end]` rendered into one image.
///
/// Ordering is numeric on `start`, then `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenshotKey {
    pub start: usize,
    pub end: usize,
}

impl ScreenshotKey {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// File name of the rendered image, e.g. `chat-0-1.png`.
    pub fn file_name(&self) -> String {
        format!("chat-{self}.png")
    }
}

impl fmt::Display for ScreenshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Maps a screenshot key to the image file the compositor should load.
pub trait ScreenshotResolver {
    fn screenshot_path(&self, key: ScreenshotKey) -> PathBuf;
}

/// Screenshot directory of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The standard `out/chat` directory under a project directory.
    pub fn for_project(project_dir: &Path) -> Self {
        let dir = SCREENSHOT_DIR
            .iter()
            .fold(project_dir.to_path_buf(), |acc, part| acc.join(part));
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: ScreenshotKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Create the directory if needed.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Keys whose image does not exist yet, preserving input order.
    pub fn missing(&self, keys: &[ScreenshotKey]) -> Vec<ScreenshotKey> {
        keys.iter()
            .copied()
            .filter(|key| !self.path_for(*key).exists())
            .collect()
    }
}

impl ScreenshotResolver for ScreenshotStore {
    fn screenshot_path(&self, key: ScreenshotKey) -> PathBuf {
        self.path_for(key)
    }
}
