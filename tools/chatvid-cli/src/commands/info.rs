//! Show project information.

use std::path::PathBuf;

use chatvid_project_model::ScreenshotStore;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let p = &project.project;

    println!("Project: {}", project.path.display());
    println!(
        "  Resolution: {}x{} @ {}fps",
        p.resolution.w, p.resolution.h, p.fps
    );
    println!(
        "  Background: {}{}",
        p.bg_video,
        if project.bg_video_path().exists() {
            ""
        } else {
            " (missing)"
        }
    );
    println!("  Output: {}", p.output);
    println!();

    println!("Chat:");
    println!("  Theme: {}", p.chat.theme);
    for participant in &p.chat.participants {
        println!("  Participant: {} ({})", participant.name, participant.id);
    }
    println!("  Messages: {}", p.chat.messages.len());
    println!();

    println!("Overlays:");
    for (i, overlay) in p.overlays.iter().enumerate() {
        println!(
            "  [{i}] messages {} @ {}s-{}s at ({}, {}) w={}",
            overlay.key(),
            overlay.start,
            overlay.end,
            overlay.x,
            overlay.y,
            overlay.w
        );
    }
    println!();

    let store = ScreenshotStore::for_project(&project.root);
    println!("Screenshots ({}):", store.dir().display());
    for key in p.screenshot_keys() {
        let status = if store.path_for(key).exists() {
            "[OK]"
        } else {
            "[MISSING]"
        };
        println!("  {status} {}", key.file_name());
    }

    Ok(())
}
