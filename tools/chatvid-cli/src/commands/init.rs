//! Scaffold a new chatvid project.

use std::path::PathBuf;

use chatvid_project_model::LoadedProject;

pub fn run(dir: PathBuf) -> anyhow::Result<()> {
    println!("Creating project at {}", dir.display());

    let project = LoadedProject::init(&dir)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;
    let p = &project.project;

    println!("Project created successfully:");
    println!("  Project file: {}", project.path.display());
    println!("  Resolution: {}x{} @ {}fps", p.resolution.w, p.resolution.h, p.fps);
    println!();
    println!("Directory structure:");
    println!("  {}/", dir.display());
    println!("  ├── project.json");
    println!("  ├── assets/      (background video: {})", p.bg_video);
    println!("  └── out/         (screenshots and rendered video)");
    println!();
    println!("Next: add your background video, then run `chatvid render`.");

    Ok(())
}
