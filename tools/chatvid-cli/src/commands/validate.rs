//! Validate a chatvid project and the tools it needs.

use std::path::PathBuf;

use chatvid_chat_render::Rasterizer;
use chatvid_common::config::AppConfig;
use chatvid_render_engine::{encoder_available, FfprobeProbe};

use super::{browser, load_project, print_advisories};

/// One line of the capability report.
struct Check {
    name: &'static str,
    detail: String,
    ok: bool,
    fix: String,
}

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating project at: {}", path.display());

    let project = load_project(&path)?;
    let p = &project.project;

    println!("  Resolution: {}x{} @ {}fps", p.resolution.w, p.resolution.h, p.fps);
    println!("  Messages: {}", p.chat.messages.len());
    println!("  Overlays: {}", p.overlays.len());
    println!("  Schema: OK");
    print_advisories(&project);

    let bg_video = project.bg_video_path();
    let ffmpeg = &config.encoder.ffmpeg_bin;
    let ffprobe = &config.encoder.ffprobe_bin;
    let browser_bin = &config.rasterizer.browser_bin;

    let checks = [
        Check {
            name: "Background video",
            detail: bg_video.display().to_string(),
            ok: bg_video.exists(),
            fix: format!("Place the video at {}", bg_video.display()),
        },
        Check {
            name: "ffmpeg",
            detail: ffmpeg.clone(),
            ok: encoder_available(&config.encoder),
            fix: "Install ffmpeg or set encoder.ffmpeg_bin in the config".to_string(),
        },
        Check {
            name: "ffprobe",
            detail: ffprobe.clone(),
            ok: FfprobeProbe::from_config(&config.encoder).is_available(),
            fix: "Install ffprobe or set encoder.ffprobe_bin in the config".to_string(),
        },
        Check {
            name: "Browser",
            detail: browser_bin.clone(),
            ok: browser(&config.rasterizer).is_available(),
            fix: "Install Chromium or set rasterizer.browser_bin in the config".to_string(),
        },
    ];

    println!();
    println!("Environment:");
    println!("{}", "-".repeat(60));
    for check in &checks {
        let status = if check.ok { "[OK]" } else { "[MISSING]" };
        println!("  {} {}: {}", status, check.name, check.detail);
        if !check.ok {
            println!("    Fix: {}", check.fix);
        }
    }

    let failed = checks.iter().filter(|c| !c.ok).count();
    if failed > 0 {
        anyhow::bail!("{failed} check(s) failed");
    }

    println!("\nProject is valid.");
    Ok(())
}
