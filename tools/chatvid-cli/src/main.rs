//! chatvid CLI: turn a chat transcript into timed overlays on a video.
//!
//! Usage:
//!   chatvid init [DIR]              Scaffold an example project
//!   chatvid screenshots [PROJECT]   Regenerate every chat screenshot
//!   chatvid render [PROJECT]        Render missing screenshots, then encode
//!   chatvid validate [PROJECT]      Check the project and the toolchain
//!   chatvid info [PROJECT]          Show project information

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chatvid_common::config::{config_file_path, AppConfig};
use chatvid_common::logging::init_logging;
use chatvid_project_model::{absolutize, PROJECT_FILE_NAME};

mod commands;

#[derive(Parser)]
#[command(
    name = "chatvid",
    about = "Composite rendered chat screenshots onto a background video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/chatvid/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project directory with an example project.json
    ///
    /// Fails without touching anything if DIR already contains a
    /// project.json; remove it first to start over.
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Regenerate every chat screenshot the overlays reference
    Screenshots {
        /// Path to project.json
        #[arg(default_value = PROJECT_FILE_NAME)]
        project: PathBuf,
    },

    /// Render missing screenshots, then encode the output video
    Render {
        /// Path to project.json
        #[arg(default_value = PROJECT_FILE_NAME)]
        project: PathBuf,
    },

    /// Validate the project and check required tools
    Validate {
        /// Path to project.json
        #[arg(default_value = PROJECT_FILE_NAME)]
        project: PathBuf,
    },

    /// Show project information
    Info {
        /// Path to project.json
        #[arg(default_value = PROJECT_FILE_NAME)]
        project: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| {
        config_file_path(
            std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
            std::env::var("HOME").ok().as_deref(),
        )
    });
    let (mut config, config_error) = match AppConfig::try_load_from(&config_path) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.log_json {
        config.logging.json = true;
    }
    init_logging(&config.logging);

    match config_error {
        Some(e) => tracing::warn!(error = %e, "Using default configuration"),
        None => tracing::debug!(path = %config_path.display(), "Configuration loaded"),
    }

    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { dir } => commands::init::run(absolutize(&cwd, &dir)),
        Commands::Screenshots { project } => {
            commands::screenshots::run(absolutize(&cwd, &project), &config)
        }
        Commands::Render { project } => commands::render::run(absolutize(&cwd, &project), &config),
        Commands::Validate { project } => {
            commands::validate::run(absolutize(&cwd, &project), &config)
        }
        Commands::Info { project } => commands::info::run(absolutize(&cwd, &project)),
    }
}
