//! Screenshot generation through a headless browser.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chatvid_common::config::RasterizerConfig;
use chatvid_common::error::{ChatvidError, ChatvidResult};
use chatvid_common::process::tool_version;
use chatvid_project_model::{Project, Resolution, ScreenshotKey, ScreenshotStore};
use image::RgbaImage;

use crate::template::{chat_html, CONTAINER_MIN_ALPHA};
use crate::trim::trim_below_alpha;

/// Trait for page rasterizers (headless Chromium, test doubles).
pub trait Rasterizer {
    /// Render an HTML page at the given viewport size with a transparent
    /// background.
    fn capture(&mut self, html: &str, viewport: Resolution) -> ChatvidResult<RgbaImage>;

    /// Check if this rasterizer's engine is installed.
    fn is_available(&self) -> bool;

    /// Engine name.
    fn name(&self) -> &str;
}

/// Which screenshots to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Re-render every key, replacing existing files.
    Force,
    /// Render only keys whose image does not exist.
    MissingOnly,
}

/// Outcome of a screenshot run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Keys rendered in this run, in render order.
    pub rendered: Vec<ScreenshotKey>,
    /// Keys whose existing image was kept.
    pub skipped: Vec<ScreenshotKey>,
}

/// Render every distinct screenshot the project's overlays reference.
///
/// Keys are processed in ascending (start, end) order, one at a time.
pub fn render_screenshots(
    project: &Project,
    store: &ScreenshotStore,
    rasterizer: &mut dyn Rasterizer,
    mode: RenderMode,
) -> ChatvidResult<RenderSummary> {
    store.ensure_dir()?;

    let keys = project.screenshot_keys();
    let pending = match mode {
        RenderMode::Force => keys.clone(),
        RenderMode::MissingOnly => store.missing(&keys),
    };

    let mut summary = RenderSummary {
        rendered: Vec::with_capacity(pending.len()),
        skipped: keys
            .iter()
            .copied()
            .filter(|k| !pending.contains(k))
            .collect(),
    };

    tracing::info!(
        engine = rasterizer.name(),
        total = keys.len(),
        pending = pending.len(),
        "Rendering chat screenshots"
    );

    for key in pending {
        let path = store.path_for(key);
        let html = chat_html(&project.chat, key);
        let page = rasterizer.capture(&html, project.resolution)?;
        let trimmed = trim_below_alpha(&page, CONTAINER_MIN_ALPHA).ok_or_else(|| {
            ChatvidError::rasterize(format!("Screenshot for messages {key} is empty"))
        })?;
        trimmed.save(&path)?;

        tracing::info!(
            key = %key,
            path = %path.display(),
            width = trimmed.width(),
            height = trimmed.height(),
            "Screenshot written"
        );
        summary.rendered.push(key);
    }

    Ok(summary)
}

/// `file://` URL of a page on disk, percent-encoded.
fn page_url(page: &Path) -> ChatvidResult<String> {
    url::Url::from_file_path(page)
        .map(String::from)
        .map_err(|()| {
            ChatvidError::rasterize(format!(
                "Cannot address {} as a file URL (path must be absolute)",
                page.display()
            ))
        })
}

/// Drives a Chromium-compatible browser in headless screenshot mode.
pub struct ChromiumRasterizer {
    config: RasterizerConfig,
    work_dir: PathBuf,
    seq: u64,
}

impl ChromiumRasterizer {
    /// `work_dir` holds the temporary page and raw capture of each render.
    pub fn new(config: RasterizerConfig, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            work_dir: work_dir.into(),
            seq: 0,
        }
    }

    fn browser_args(&self, viewport: Resolution, page_url: &str, capture: &Path) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--hide-scrollbars".to_string(),
            "--default-background-color=00000000".to_string(),
            format!("--window-size={},{}", viewport.w, viewport.h),
            format!("--virtual-time-budget={}", self.config.settle_ms),
            format!("--screenshot={}", capture.display()),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        args.push(page_url.to_string());
        args
    }
}

impl Rasterizer for ChromiumRasterizer {
    fn capture(&mut self, html: &str, viewport: Resolution) -> ChatvidResult<RgbaImage> {
        std::fs::create_dir_all(&self.work_dir)?;
        self.seq += 1;
        let stem = format!("chatvid-page-{}-{}", std::process::id(), self.seq);
        let page = self.work_dir.join(format!("{stem}.html"));
        let capture = self.work_dir.join(format!("{stem}.png"));

        std::fs::write(&page, html)?;
        let url = match page_url(&page) {
            Ok(url) => url,
            Err(e) => {
                std::fs::remove_file(&page).ok();
                return Err(e);
            }
        };
        let args = self.browser_args(viewport, &url, &capture);
        tracing::debug!(browser = %self.config.browser_bin, ?args, "Running browser");

        let spawned = Command::new(&self.config.browser_bin)
            .args(&args)
            .stdin(Stdio::null())
            .output();

        let result = match spawned {
            Err(e) => Err(ChatvidError::environment(format!(
                "Failed to start browser '{}': {e}",
                self.config.browser_bin
            ))),
            Ok(output) if !output.status.success() => Err(ChatvidError::rasterize(format!(
                "browser exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            Ok(_) if !capture.exists() => Err(ChatvidError::rasterize(format!(
                "browser produced no screenshot at {}",
                capture.display()
            ))),
            Ok(_) => image::open(&capture)
                .map(|img| img.to_rgba8())
                .map_err(ChatvidError::from),
        };

        std::fs::remove_file(&page).ok();
        std::fs::remove_file(&capture).ok();
        result
    }

    fn is_available(&self) -> bool {
        tool_version(&self.config.browser_bin, "--version").is_some()
    }

    fn name(&self) -> &str {
        &self.config.browser_bin
    }
}
