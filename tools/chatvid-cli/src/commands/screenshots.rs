//! Regenerate every chat screenshot.

use std::path::PathBuf;

use chatvid_chat_render::{render_screenshots, RenderMode};
use chatvid_common::config::AppConfig;
use chatvid_project_model::ScreenshotStore;

use super::{browser, load_project};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let store = ScreenshotStore::for_project(&project.root);
    let keys = project.project.screenshot_keys();

    println!(
        "Rendering {} screenshot(s) to {}",
        keys.len(),
        store.dir().display()
    );

    let mut rasterizer = browser(&config.rasterizer);
    let summary = render_screenshots(&project.project, &store, &mut rasterizer, RenderMode::Force)?;

    for key in &summary.rendered {
        println!("  ✓ {}", key.file_name());
    }
    println!("Done: {} screenshot(s) written.", summary.rendered.len());

    Ok(())
}
