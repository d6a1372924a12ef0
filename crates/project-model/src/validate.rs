//! Schema validation for decoded project documents.
//!
//! Validation is fail-fast: rules are checked in document order and the
//! first violation is returned. Nothing is collected or repaired.

use serde_json::{Map, Value};

use crate::project::{ChatConfig, Message, Overlay, Participant, Project, ProjectError, Resolution};

type Result<T> = std::result::Result<T, ProjectError>;

/// Validate an arbitrary decoded document and build a [`Project`] from it.
pub fn validate_document(doc: &Value) -> Result<Project> {
    let root = doc
        .as_object()
        .ok_or_else(|| ProjectError::validation("Project must be an object"))?;

    let bg_video = non_empty_str(root, "bgVideo")?;
    let output = non_empty_str(root, "output")?;

    let fps = match root.get("fps").and_then(Value::as_f64) {
        Some(fps) if fps > 0.0 => fps,
        _ => return Err(ProjectError::validation("fps must be a positive number")),
    };

    let resolution = resolution(root.get("resolution"))?;
    let chat = chat(root.get("chat"))?;
    let overlays = overlays(root.get("overlays"), chat.messages.len())?;

    Ok(Project {
        bg_video,
        output,
        fps,
        resolution,
        chat,
        overlays,
    })
}

fn non_empty_str(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ProjectError::validation(format!(
            "{field} must be a non-empty string"
        ))),
    }
}

fn resolution(value: Option<&Value>) -> Result<Resolution> {
    let numeric = |field: &str| {
        value
            .and_then(|v| v.get(field))
            .filter(|v| v.is_number())
    };
    let (Some(w), Some(h)) = (numeric("w"), numeric("h")) else {
        return Err(ProjectError::validation(
            "resolution must have w and h as numbers",
        ));
    };

    Ok(Resolution {
        w: dimension(w, "resolution.w")?,
        h: dimension(h, "resolution.h")?,
    })
}

fn dimension(value: &Value, field: &str) -> Result<u32> {
    whole_number(value)
        .filter(|&v| v > 0.0 && v <= f64::from(u32::MAX))
        .map(|v| v as u32)
        .ok_or_else(|| {
            ProjectError::validation(format!("{field} must be a positive integer, got {value}"))
        })
}

/// A JSON number with no fractional part, whether written as `3` or `3.0`.
fn whole_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && v.fract() == 0.0)
}

fn chat(value: Option<&Value>) -> Result<ChatConfig> {
    let obj = value
        .and_then(Value::as_object)
        .ok_or_else(|| ProjectError::validation("chat must be an object"))?;

    let theme = obj
        .get("theme")
        .and_then(Value::as_str)
        .ok_or_else(|| ProjectError::validation("chat.theme must be a string"))?
        .to_string();

    let participants = obj
        .get("participants")
        .and_then(Value::as_array)
        .ok_or_else(|| ProjectError::validation("chat.participants must be an array"))?
        .iter()
        .map(|p| match (str_field(p, "id"), str_field(p, "name")) {
            (Some(id), Some(name)) => Ok(Participant { id, name }),
            _ => Err(ProjectError::validation(
                "Each participant must have id and name as strings",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let messages = obj
        .get("messages")
        .and_then(Value::as_array)
        .ok_or_else(|| ProjectError::validation("chat.messages must be an array"))?
        .iter()
        .map(|m| match (str_field(m, "from"), str_field(m, "text")) {
            (Some(from), Some(text)) => Ok(Message { from, text }),
            _ => Err(ProjectError::validation(
                "Each message must have from and text as strings",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChatConfig {
        theme,
        participants,
        messages,
    })
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

const OVERLAY_NUMERIC_FIELDS: [&str; 7] = [
    "messageIndex",
    "endMessageIndex",
    "start",
    "end",
    "x",
    "y",
    "w",
];

fn overlays(value: Option<&Value>, message_count: usize) -> Result<Vec<Overlay>> {
    let entries = value
        .and_then(Value::as_array)
        .ok_or_else(|| ProjectError::validation("overlays must be an array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| overlay(i, entry, message_count))
        .collect()
}

fn overlay(i: usize, entry: &Value, message_count: usize) -> Result<Overlay> {
    let all_numeric = OVERLAY_NUMERIC_FIELDS
        .iter()
        .all(|field| entry.get(*field).is_some_and(Value::is_number));
    if !all_numeric {
        return Err(ProjectError::validation(format!(
            "overlays[{i}]: each overlay must have messageIndex, endMessageIndex, start, end, x, y, w as numbers"
        )));
    }

    let message_index = index_field(i, &entry["messageIndex"], "messageIndex", message_count)?;
    let end_message_index =
        index_field(i, &entry["endMessageIndex"], "endMessageIndex", message_count)?;

    if message_index > end_message_index {
        return Err(ProjectError::validation(format!(
            "overlays[{i}]: messageIndex {message_index} must be <= endMessageIndex {end_message_index}"
        )));
    }

    // Numbers were checked above; serde_json always yields an f64 for them.
    let number = |field: &str| entry[field].as_f64().unwrap_or_default();

    Ok(Overlay {
        message_index,
        end_message_index,
        start: number("start"),
        end: number("end"),
        x: number("x"),
        y: number("y"),
        w: number("w"),
    })
}

fn index_field(i: usize, value: &Value, field: &str, message_count: usize) -> Result<usize> {
    let out_of_bounds = || {
        ProjectError::validation(format!(
            "overlays[{i}]: {field} {value} is out of bounds ({message_count} messages)"
        ))
    };

    if value.as_f64().is_some_and(|v| v < 0.0) {
        return Err(out_of_bounds());
    }
    let index = whole_number(value).ok_or_else(|| {
        ProjectError::validation(format!(
            "overlays[{i}]: {field} must be an integer, got {value}"
        ))
    })?;
    if index < message_count as f64 {
        Ok(index as usize)
    } else {
        Err(out_of_bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_doc() -> Value {
        json!({
            "bgVideo": "assets/bg.example.mp4",
            "output": "out/final.mp4",
            "fps": 30,
            "resolution": { "w": 1080, "h": 1920 },
            "chat": {
                "theme": "ios",
                "participants": [
                    { "id": "me", "name": "Me" },
                    { "id": "her", "name": "Her" }
                ],
                "messages": [
                    { "from": "her", "text": "Qué significa ese tatuaje?" },
                    { "from": "me", "text": "El tatuaje no... pero la modelo sí 😌" }
                ]
            },
            "overlays": [
                { "messageIndex": 0, "endMessageIndex": 0, "start": 0.5, "end": 2.5, "x": 80, "y": 980, "w": 920 },
                { "messageIndex": 0, "endMessageIndex": 1, "start": 2.5, "end": 5.0, "x": 80, "y": 980, "w": 920 }
            ]
        })
    }

    fn message(err: ProjectError) -> String {
        match err {
            ProjectError::ValidationError { message } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_example_project() {
        let project = validate_document(&example_doc()).unwrap();
        assert_eq!(project.chat.participants.len(), 2);
        assert_eq!(project.chat.messages.len(), 2);
        assert_eq!(project.overlays.len(), 2);

        let keys: Vec<String> = project
            .screenshot_keys()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["0-0", "0-1"]);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = validate_document(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(message(err), "Project must be an object");
    }

    #[test]
    fn test_rejects_empty_bg_video() {
        let mut doc = example_doc();
        doc["bgVideo"] = json!("");
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "bgVideo must be a non-empty string"
        );
    }

    #[test]
    fn test_rejects_missing_output() {
        let mut doc = example_doc();
        doc.as_object_mut().unwrap().remove("output");
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "output must be a non-empty string"
        );
    }

    #[test]
    fn test_rejects_non_numeric_fps() {
        let mut doc = example_doc();
        doc["fps"] = json!("30");
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "fps must be a positive number"
        );
    }

    #[test]
    fn test_rejects_zero_fps() {
        let mut doc = example_doc();
        doc["fps"] = json!(0);
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_accepts_fractional_fps() {
        let mut doc = example_doc();
        doc["fps"] = json!(29.97);
        let project = validate_document(&doc).unwrap();
        assert!((project.fps - 29.97).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_resolution_missing_dimension() {
        let mut doc = example_doc();
        doc["resolution"] = json!({ "w": 1080 });
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "resolution must have w and h as numbers"
        );
    }

    #[test]
    fn test_rejects_fractional_resolution() {
        let mut doc = example_doc();
        doc["resolution"]["h"] = json!(1920.5);
        let msg = message(validate_document(&doc).unwrap_err());
        assert!(msg.starts_with("resolution.h must be a positive integer"));
    }

    #[test]
    fn test_rejects_missing_chat() {
        let mut doc = example_doc();
        doc.as_object_mut().unwrap().remove("chat");
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "chat must be an object"
        );
    }

    #[test]
    fn test_rejects_participant_without_name() {
        let mut doc = example_doc();
        doc["chat"]["participants"][1] = json!({ "id": "her" });
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "Each participant must have id and name as strings"
        );
    }

    #[test]
    fn test_rejects_message_with_numeric_text() {
        let mut doc = example_doc();
        doc["chat"]["messages"][0]["text"] = json!(42);
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "Each message must have from and text as strings"
        );
    }

    #[test]
    fn test_rejects_overlay_missing_field() {
        let mut doc = example_doc();
        doc["overlays"][0].as_object_mut().unwrap().remove("w");
        let msg = message(validate_document(&doc).unwrap_err());
        assert!(msg.starts_with("overlays[0]: each overlay must have"));
    }

    #[test]
    fn test_rejects_message_index_beyond_count() {
        let mut doc = example_doc();
        doc["overlays"][1]["messageIndex"] = json!(5);
        doc["overlays"][1]["endMessageIndex"] = json!(5);
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "overlays[1]: messageIndex 5 is out of bounds (2 messages)"
        );
    }

    #[test]
    fn test_rejects_index_equal_to_message_count() {
        let mut doc = example_doc();
        doc["overlays"][0]["endMessageIndex"] = json!(2);
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "overlays[0]: endMessageIndex 2 is out of bounds (2 messages)"
        );
    }

    #[test]
    fn test_accepts_last_valid_index() {
        let mut doc = example_doc();
        doc["overlays"][0]["messageIndex"] = json!(1);
        doc["overlays"][0]["endMessageIndex"] = json!(1);
        let project = validate_document(&doc).unwrap();
        assert_eq!(project.overlays[0].key().to_string(), "1-1");
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut doc = example_doc();
        doc["overlays"][1]["messageIndex"] = json!(1);
        doc["overlays"][1]["endMessageIndex"] = json!(0);
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "overlays[1]: messageIndex 1 must be <= endMessageIndex 0"
        );
    }

    #[test]
    fn test_rejects_negative_index() {
        let mut doc = example_doc();
        doc["overlays"][0]["messageIndex"] = json!(-1);
        let msg = message(validate_document(&doc).unwrap_err());
        assert!(msg.contains("out of bounds"));
    }

    #[test]
    fn test_rejects_fractional_index() {
        let mut doc = example_doc();
        doc["overlays"][0]["messageIndex"] = json!(0.5);
        let msg = message(validate_document(&doc).unwrap_err());
        assert!(msg.contains("must be an integer"));
    }

    #[test]
    fn test_inverted_time_window_is_not_a_schema_error() {
        let mut doc = example_doc();
        doc["overlays"][0]["start"] = json!(3.0);
        doc["overlays"][0]["end"] = json!(1.0);
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        let mut doc = example_doc();
        doc["fps"] = json!(-1);
        doc["overlays"] = json!("nope");
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "fps must be a positive number"
        );
    }

    #[test]
    fn test_zero_overlays_is_valid() {
        let mut doc = example_doc();
        doc["overlays"] = json!([]);
        let project = validate_document(&doc).unwrap();
        assert!(project.overlays.is_empty());
        assert!(project.screenshot_keys().is_empty());
    }

    #[test]
    fn test_whole_numbers_written_as_floats_are_accepted() {
        let mut doc = example_doc();
        doc["resolution"]["w"] = json!(1080.0);
        doc["overlays"][1]["messageIndex"] = json!(0.0);
        doc["overlays"][1]["endMessageIndex"] = json!(1.0);

        let project = validate_document(&doc).unwrap();
        assert_eq!(project.resolution, Resolution { w: 1080, h: 1920 });
        assert_eq!(project.overlays[1].message_index, 0);
        assert_eq!(project.overlays[1].end_message_index, 1);
    }

    #[test]
    fn test_float_index_past_the_end_is_out_of_bounds() {
        let mut doc = example_doc();
        doc["overlays"][0]["endMessageIndex"] = json!(2.0);
        assert_eq!(
            message(validate_document(&doc).unwrap_err()),
            "overlays[0]: endMessageIndex 2.0 is out of bounds (2 messages)"
        );
    }
}
