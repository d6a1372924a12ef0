//! Render missing screenshots, then encode the final video.

use std::path::PathBuf;

use chatvid_chat_render::{render_screenshots, RenderMode};
use chatvid_common::config::AppConfig;
use chatvid_render_engine::{render_project, EncodeJob, FfprobeProbe};

use super::{browser, load_project, print_advisories};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Rendering project at: {}", path.display());

    let project = load_project(&path)?;
    print_advisories(&project);

    let job = EncodeJob::new(project, config.encoder.clone());

    let mut rasterizer = browser(&config.rasterizer);
    let summary = render_screenshots(
        &job.project.project,
        &job.store,
        &mut rasterizer,
        RenderMode::MissingOnly,
    )?;
    println!(
        "  Screenshots: {} rendered, {} reused",
        summary.rendered.len(),
        summary.skipped.len()
    );

    println!("  Output: {}", job.project.output_path().display());
    let probe = FfprobeProbe::from_config(&job.config);
    let result = render_project(&job, &probe)?;

    println!(
        "\nVideo written to {} ({:.1}s).",
        result.output.display(),
        result.elapsed.as_secs_f64()
    );

    Ok(())
}
