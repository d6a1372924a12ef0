//! Project document types and on-disk loading.
//!
//! A project is the single root that owns the chat transcript and the
//! overlay list. Overlays reference messages by index, never by value.

use std::path::{Path, PathBuf};

use chatvid_common::error::ChatvidError;
use serde::{Deserialize, Serialize};

use crate::screenshot::ScreenshotKey;
use crate::validate::validate_document;

/// Participant id reserved for the local user (right-aligned bubbles).
pub const LOCAL_PARTICIPANT_ID: &str = "me";

/// Default project file name inside a project directory.
pub const PROJECT_FILE_NAME: &str = "project.json";

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Background video, relative to the project directory.
    pub bg_video: String,

    /// Output video path, relative to the project directory.
    pub output: String,

    /// Output frame rate.
    pub fps: f64,

    /// Target output resolution.
    pub resolution: Resolution,

    /// The chat transcript.
    pub chat: ChatConfig,

    /// Timed screenshot placements, in draw order.
    pub overlays: Vec<Overlay>,
}

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub w: u32,
    pub h: u32,
}

/// Chat transcript and its styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Theme identifier (e.g. `ios`).
    pub theme: String,

    pub participants: Vec<Participant>,

    /// Messages in display order.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sender participant id.
    pub from: String,
    pub text: String,
}

/// A timed, positioned placement of one rendered message range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// First message shown (inclusive, 0-based).
    pub message_index: usize,

    /// Last message shown (inclusive).
    pub end_message_index: usize,

    /// Time window on the background timeline, in seconds.
    pub start: f64,
    pub end: f64,

    /// Top-left placement in output pixels.
    pub x: f64,
    pub y: f64,

    /// Rendered width in output pixels; height follows the image aspect.
    pub w: f64,
}

impl Overlay {
    /// The screenshot this overlay displays.
    pub fn key(&self) -> ScreenshotKey {
        ScreenshotKey::new(self.message_index, self.end_message_index)
    }
}

impl ChatConfig {
    /// Look up a participant by id.
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Whether a message is sent by the local user and rendered right-aligned.
    pub fn is_local(&self, message: &Message) -> bool {
        message.from == LOCAL_PARTICIPANT_ID
            || self
                .participant(&message.from)
                .is_some_and(|p| p.id == LOCAL_PARTICIPANT_ID)
    }

    /// Sender label shown above a left-aligned bubble, if any.
    pub fn sender_label(&self, message: &Message) -> Option<&str> {
        if self.is_local(message) {
            return None;
        }
        self.participant(&message.from).map(|p| p.name.as_str())
    }

    /// Messages covered by a screenshot key. Keys come from validated
    /// overlays, so an out-of-range key yields the in-range part only.
    pub fn messages_for(&self, key: ScreenshotKey) -> &[Message] {
        let len = self.messages.len();
        let start = key.start.min(len);
        let end = key.end.saturating_add(1).min(len).max(start);
        &self.messages[start..end]
    }
}

impl Project {
    /// Parse and validate a project from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ProjectError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ProjectError::ParseError {
                path: PathBuf::from("<inline>"),
                source: e,
            })?;
        validate_document(&value)
    }

    /// Distinct screenshot keys referenced by the overlays, sorted by start
    /// index then end index.
    pub fn screenshot_keys(&self) -> Vec<ScreenshotKey> {
        let keys: std::collections::BTreeSet<ScreenshotKey> =
            self.overlays.iter().map(Overlay::key).collect();
        keys.into_iter().collect()
    }

    /// Non-fatal issues worth surfacing to the author.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = vec![];
        for (i, o) in self.overlays.iter().enumerate() {
            if o.start > o.end {
                notes.push(format!(
                    "overlays[{i}]: start {} is after end {}; the overlay will never be visible",
                    o.start, o.end
                ));
            }
        }
        notes
    }

    /// The example project written by `init`.
    pub fn example() -> Self {
        Self {
            bg_video: "assets/bg.example.mp4".to_string(),
            output: "out/final.mp4".to_string(),
            fps: 30.0,
            resolution: Resolution { w: 1080, h: 1920 },
            chat: ChatConfig {
                theme: "ios".to_string(),
                participants: vec![
                    Participant {
                        id: "me".to_string(),
                        name: "Me".to_string(),
                    },
                    Participant {
                        id: "her".to_string(),
                        name: "Her".to_string(),
                    },
                ],
                messages: vec![
                    Message {
                        from: "her".to_string(),
                        text: "Qué significa ese tatuaje?".to_string(),
                    },
                    Message {
                        from: "me".to_string(),
                        text: "El tatuaje no... pero la modelo sí 😌".to_string(),
                    },
                ],
            },
            overlays: vec![
                Overlay {
                    message_index: 0,
                    end_message_index: 0,
                    start: 0.5,
                    end: 2.5,
                    x: 80.0,
                    y: 980.0,
                    w: 920.0,
                },
                Overlay {
                    message_index: 0,
                    end_message_index: 1,
                    start: 2.5,
                    end: 5.0,
                    x: 80.0,
                    y: 980.0,
                    w: 920.0,
                },
            ],
        }
    }
}

/// A validated project together with where it lives on disk.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Path to the project file.
    pub path: PathBuf,

    /// Project directory; base for every relative path in the document.
    pub root: PathBuf,

    /// Project document.
    pub project: Project,
}

impl LoadedProject {
    /// Load and validate a project file. `path` should already be absolute.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ProjectError::NotFound { path });
        }

        let json = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;
        let project = validate_document(&value)?;

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            path,
            root,
            project,
        })
    }

    /// Scaffold the example project inside `dir`.
    ///
    /// Creates `assets/` and `out/`, writes `project.json` and a note in
    /// `assets/README.md`. Refuses to replace an existing project file.
    pub fn init(dir: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = dir.as_ref().to_path_buf();

        let path = root.join(PROJECT_FILE_NAME);
        if path.exists() {
            return Err(ProjectError::AlreadyExists { path });
        }

        for subdir in &["assets", "out"] {
            let path = root.join(subdir);
            std::fs::create_dir_all(&path)
                .map_err(|e| ProjectError::IoError { path, source: e })?;
        }

        let loaded = Self {
            path,
            root,
            project: Project::example(),
        };
        loaded.save()?;

        let note_path = loaded.root.join("assets").join("README.md");
        std::fs::write(
            &note_path,
            "Place your background video here as bg.example.mp4 \
             (or update project.json to point to your video)\n",
        )
        .map_err(|e| ProjectError::IoError {
            path: note_path,
            source: e,
        })?;

        Ok(loaded)
    }

    /// Write the project document as pretty JSON.
    pub fn save(&self) -> Result<(), ProjectError> {
        let json =
            serde_json::to_string_pretty(&self.project).map_err(|e| ProjectError::ParseError {
                path: self.path.clone(),
                source: e,
            })?;
        std::fs::write(&self.path, json).map_err(|e| ProjectError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Resolve a project-relative path against the project directory.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        absolutize(&self.root, relative.as_ref())
    }

    /// Absolute path of the background video.
    pub fn bg_video_path(&self) -> PathBuf {
        self.resolve(&self.project.bg_video)
    }

    /// Absolute path of the output video.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.project.output)
    }
}

/// Join `path` onto `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Project file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Project file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The first violated schema rule.
    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

impl From<ProjectError> for ChatvidError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound { path } => ChatvidError::missing_input(path),
            ProjectError::ValidationError { .. } | ProjectError::ParseError { .. } => {
                ChatvidError::schema(err.to_string())
            }
            ProjectError::AlreadyExists { .. } | ProjectError::IoError { .. } => {
                ChatvidError::project(err.to_string())
            }
        }
    }
}

impl ProjectError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chatvid_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_example_project_serializes_camel_case() {
        let json = serde_json::to_value(Project::example()).unwrap();
        assert_eq!(json["bgVideo"], "assets/bg.example.mp4");
        assert_eq!(json["overlays"][1]["endMessageIndex"], 1);
        assert_eq!(json["resolution"]["w"], 1080);
    }

    #[test]
    fn test_example_project_roundtrips_through_validation() {
        let json = serde_json::to_string_pretty(&Project::example()).unwrap();
        let parsed = Project::from_json_str(&json).unwrap();
        assert_eq!(parsed, Project::example());
    }

    #[test]
    fn test_local_sender_is_right_aligned_without_label() {
        let project = Project::example();
        let chat = &project.chat;
        assert!(!chat.is_local(&chat.messages[0]));
        assert_eq!(chat.sender_label(&chat.messages[0]), Some("Her"));
        assert!(chat.is_local(&chat.messages[1]));
        assert_eq!(chat.sender_label(&chat.messages[1]), None);
    }

    #[test]
    fn test_unknown_sender_has_no_label() {
        let mut chat = Project::example().chat;
        chat.messages.push(Message {
            from: "stranger".to_string(),
            text: "hi".to_string(),
        });
        let msg = chat.messages.last().unwrap();
        assert!(!chat.is_local(msg));
        assert_eq!(chat.sender_label(msg), None);
    }

    #[test]
    fn test_messages_for_is_inclusive() {
        let chat = Project::example().chat;
        assert_eq!(chat.messages_for(ScreenshotKey::new(0, 0)).len(), 1);
        assert_eq!(chat.messages_for(ScreenshotKey::new(0, 1)).len(), 2);
        assert_eq!(chat.messages_for(ScreenshotKey::new(1, 1))[0].from, "me");
    }

    #[test]
    fn test_advisories_flag_inverted_time_window() {
        let mut project = Project::example();
        assert!(project.advisories().is_empty());
        project.overlays[1].start = 6.0;
        let notes = project.advisories();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("overlays[1]"));
    }

    #[test]
    fn test_init_then_load() {
        let dir = temp_dir("init");
        let created = LoadedProject::init(&dir).unwrap();
        assert!(dir.join("assets").join("README.md").exists());
        assert!(dir.join("out").is_dir());

        let loaded = LoadedProject::load(&created.path).unwrap();
        assert_eq!(loaded.project, Project::example());
        assert_eq!(loaded.root, dir);
        assert_eq!(
            loaded.bg_video_path(),
            dir.join("assets").join("bg.example.mp4")
        );
        assert_eq!(loaded.output_path(), dir.join("out").join("final.mp4"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = temp_dir("init_twice");
        LoadedProject::init(&dir).unwrap();
        std::fs::write(dir.join(PROJECT_FILE_NAME), "{}").unwrap();
        std::fs::remove_dir_all(dir.join("out")).unwrap();

        let err = LoadedProject::init(&dir).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists { .. }));
        assert_eq!(std::fs::read_to_string(dir.join(PROJECT_FILE_NAME)).unwrap(), "{}");
        assert!(!dir.join("out").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_project_errors_map_into_taxonomy() {
        let schema: ChatvidError = ProjectError::validation("fps must be a positive number").into();
        assert!(matches!(schema, ChatvidError::Schema { .. }));

        let missing: ChatvidError = ProjectError::NotFound {
            path: PathBuf::from("/p/project.json"),
        }
        .into();
        assert!(matches!(missing, ChatvidError::MissingInput { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LoadedProject::load("/nonexistent/chatvid/project.json").unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let base = Path::new("/projects/demo");
        assert_eq!(
            absolutize(base, Path::new("/media/bg.mp4")),
            PathBuf::from("/media/bg.mp4")
        );
        assert_eq!(
            absolutize(base, Path::new("assets/bg.mp4")),
            PathBuf::from("/projects/demo/assets/bg.mp4")
        );
    }
}
