//! Encoder invocation: turns a project into an ffmpeg command line and runs it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use chatvid_common::config::EncoderConfig;
use chatvid_common::error::{ChatvidError, ChatvidResult};
use chatvid_common::process::tool_version;
use chatvid_project_model::{LoadedProject, ScreenshotResolver, ScreenshotStore};

use crate::filter_graph::compile;

/// Everything needed to encode one project.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub project: LoadedProject,
    pub store: ScreenshotStore,
    pub config: EncoderConfig,
}

impl EncodeJob {
    /// Job using the project's default screenshot directory.
    pub fn new(project: LoadedProject, config: EncoderConfig) -> Self {
        let store = ScreenshotStore::for_project(&project.root);
        Self {
            project,
            store,
            config,
        }
    }
}

/// Answers questions about media files before encoding.
pub trait MediaProbe {
    /// Whether the file has at least one audio stream.
    fn has_audio(&self, path: &Path) -> ChatvidResult<bool>;
}

/// [`MediaProbe`] backed by `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    ffprobe_bin: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(config.ffprobe_bin.clone())
    }

    pub fn is_available(&self) -> bool {
        tool_version(&self.ffprobe_bin, "-version").is_some()
    }
}

impl MediaProbe for FfprobeProbe {
    fn has_audio(&self, path: &Path) -> ChatvidResult<bool> {
        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "error",
                "-select_streams",
                "a:0",
                "-show_entries",
                "stream=codec_name",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ChatvidError::environment(format!(
                    "Failed to start ffprobe '{}': {e}",
                    self.ffprobe_bin
                ))
            })?;

        if !output.status.success() {
            tracing::warn!(
                path = %path.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "ffprobe failed, assuming no audio"
            );
            return Ok(false);
        }

        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }
}

/// A fully prepared encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Absolute path of the video being written.
    pub output: PathBuf,
    pub has_audio: bool,
}

impl EncoderCommand {
    /// The command as a single shell-safe line, for logs and display.
    pub fn to_shell_string(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_escape)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote an argument for display in a shell command line.
///
/// Arguments made only of `[A-Za-z0-9/_.-]` pass through; anything else is
/// wrapped in double quotes with embedded double quotes backslash-escaped.
pub fn shell_escape(arg: &str) -> Cow<'_, str> {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-'));
    if plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("\"{}\"", arg.replace('"', "\\\"")))
    }
}

/// Build the encoder command for a job.
///
/// Every input file is checked before anything else runs, so a missing
/// background or screenshot never reaches the probe or the encoder.
pub fn prepare(job: &EncodeJob, probe: &dyn MediaProbe) -> ChatvidResult<EncoderCommand> {
    let project = &job.project.project;
    let bg_video = job.project.bg_video_path();
    let output = job.project.output_path();

    if !bg_video.exists() {
        return Err(ChatvidError::missing_input(bg_video));
    }
    for overlay in &project.overlays {
        let path = job.store.screenshot_path(overlay.key());
        if !path.exists() {
            return Err(ChatvidError::missing_input(path));
        }
    }

    let graph = compile(project, &job.store);
    let has_audio = probe.has_audio(&bg_video)?;
    let config = &job.config;

    let mut args: Vec<String> = vec![
        "-y".into(),
        "-i".into(),
        bg_video.display().to_string(),
    ];
    for input in graph.extra_inputs() {
        args.push("-i".into());
        args.push(input.display().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        graph.expression(),
        "-map".to_string(),
        format!("[{}]", graph.output_label()),
    ]);
    if has_audio {
        args.extend([
            "-map".to_string(),
            "0:a?".to_string(),
            "-c:a".to_string(),
            config.audio_codec.clone(),
            "-b:a".to_string(),
            format!("{}k", config.audio_bitrate_kbps),
        ]);
    }
    args.extend([
        "-c:v".to_string(),
        config.video_codec.clone(),
        "-preset".to_string(),
        config.preset.clone(),
        "-crf".to_string(),
        config.crf.to_string(),
        "-pix_fmt".to_string(),
        config.pixel_format.clone(),
        "-r".to_string(),
        project.fps.to_string(),
        output.display().to_string(),
    ]);

    Ok(EncoderCommand {
        program: config.ffmpeg_bin.clone(),
        args,
        output,
        has_audio,
    })
}

/// Result of a successful encoder run.
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    pub output: PathBuf,
    /// Everything the encoder wrote to stderr.
    pub log: String,
    pub elapsed: Duration,
}

/// Run a prepared command with `cwd` as its working directory.
pub fn run(command: &EncoderCommand, cwd: &Path) -> ChatvidResult<EncodeOutput> {
    if let Some(parent) = command.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(args = ?command.args, cwd = %cwd.display(), "Running encoder");
    let started = Instant::now();
    let output = Command::new(&command.program)
        .args(&command.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            ChatvidError::environment(format!(
                "Failed to start encoder '{}': {e}",
                command.program
            ))
        })?;

    let log = String::from_utf8_lossy(&output.stderr).into_owned();
    for line in log.lines().filter(|l| !l.trim().is_empty()) {
        tracing::debug!(target: "chatvid::encoder", "{line}");
    }

    if !output.status.success() {
        return Err(ChatvidError::Encoder {
            status: output.status,
            output: log,
        });
    }

    Ok(EncodeOutput {
        output: command.output.clone(),
        log,
        elapsed: started.elapsed(),
    })
}

/// Prepare and run the encoder for a job.
pub fn render_project(job: &EncodeJob, probe: &dyn MediaProbe) -> ChatvidResult<EncodeOutput> {
    tracing::info!(
        project = %job.project.path.display(),
        overlays = job.project.project.overlays.len(),
        "Starting encode"
    );

    let command = prepare(job, probe)?;
    tracing::info!(
        command = %command.to_shell_string(),
        has_audio = command.has_audio,
        "Encoder command prepared"
    );

    let result = run(&command, &job.project.root)?;
    tracing::info!(
        output = %result.output.display(),
        elapsed_secs = result.elapsed.as_secs_f64(),
        "Encode finished"
    );
    Ok(result)
}

/// Whether the configured ffmpeg binary answers a version query.
pub fn encoder_available(config: &EncoderConfig) -> bool {
    tool_version(&config.ffmpeg_bin, "-version").is_some()
}
