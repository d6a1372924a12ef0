//! Application configuration.
//!
//! Everything that locates or tunes an external tool lives here and is
//! passed explicitly into the components that need it; library code never
//! reads the process environment to find a binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ChatvidError, ChatvidResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Video encoder settings.
    pub encoder: EncoderConfig,

    /// Screenshot rasterizer settings.
    pub rasterizer: RasterizerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Encoder (ffmpeg) invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Encoder binary name or path.
    pub ffmpeg_bin: String,

    /// Prober binary name or path.
    pub ffprobe_bin: String,

    /// Video codec passed to `-c:v`.
    pub video_codec: String,

    /// Encoder preset passed to `-preset`.
    pub preset: String,

    /// Constant rate factor passed to `-crf`.
    pub crf: u32,

    /// Output pixel format passed to `-pix_fmt`.
    pub pixel_format: String,

    /// Audio codec used when the background carries audio.
    pub audio_codec: String,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

/// Headless browser settings for screenshot generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    /// Chromium-compatible browser binary name or path.
    pub browser_bin: String,

    /// Virtual time granted to the page before the screenshot (ms).
    pub settle_ms: u64,

    /// Extra flags passed to the browser (e.g. `--no-sandbox` in containers).
    pub extra_args: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "chatvid_render_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 18,
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate_kbps: 192,
        }
    }
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            browser_bin: "chromium".to_string(),
            settle_ms: 100,
            extra_args: vec![],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Read config from `path`. `Ok(None)` when the file does not exist.
    pub fn try_load_from(path: &Path) -> ChatvidResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatvidError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ChatvidError::config(format!("Failed to parse {}: {e}", path.display())))
    }
}

/// Standard config file location under the given XDG config home (or
/// `$HOME/.config` when unset). Callers read the environment and pass the
/// values in.
pub fn config_file_path(xdg_config_home: Option<&str>, home: Option<&str>) -> PathBuf {
    let base = match xdg_config_home {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(home.unwrap_or("/tmp")).join(".config"),
    };
    base.join("chatvid").join("config.json")
}
