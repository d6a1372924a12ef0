pub mod info;
pub mod init;
pub mod render;
pub mod screenshots;
pub mod validate;

use std::path::{Path, PathBuf};

use chatvid_chat_render::ChromiumRasterizer;
use chatvid_common::config::RasterizerConfig;
use chatvid_project_model::LoadedProject;

/// Load and validate a project file.
pub(crate) fn load_project(path: &Path) -> anyhow::Result<LoadedProject> {
    LoadedProject::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}

/// Print non-fatal findings about the project.
pub(crate) fn print_advisories(project: &LoadedProject) {
    for advisory in project.project.advisories() {
        println!("  Warning: {advisory}");
    }
}

pub(crate) fn browser(config: &RasterizerConfig) -> ChromiumRasterizer {
    ChromiumRasterizer::new(config.clone(), work_dir())
}

fn work_dir() -> PathBuf {
    std::env::temp_dir().join("chatvid")
}
