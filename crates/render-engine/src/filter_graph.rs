//! Overlay compositing compiler.
//!
//! Translates a validated project into an ffmpeg `-filter_complex` graph:
//! the background is scaled to fit (never upscaled) and padded to the
//! target resolution, then each overlay adds one image input, one scale
//! stage and one time-gated overlay stage chained onto the running stream.
//!
//! Compilation is a pure function of the project and the screenshot
//! resolver: no I/O, no probing.

use std::fmt;
use std::path::PathBuf;

use chatvid_project_model::{Overlay, Project, ScreenshotResolver};

/// Stream label of the primary (background) video.
pub const PRIMARY_VIDEO: &str = "0:v";

/// Label of the scaled-and-padded background.
pub const BASE_LABEL: &str = "base";

const SCALED_LABEL: &str = "scaled";

/// What a stage does in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Fit the background inside the target resolution.
    BaseScale,
    /// Pad the fitted background to the exact target resolution.
    BasePad,
    /// Resize an overlay image to its requested width.
    OverlayScale,
    /// Draw an overlay image onto the running stream within its time window.
    Overlay,
}

/// One filter with its labelled inputs and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStage {
    pub kind: StageKind,
    pub inputs: Vec<String>,
    pub filter: String,
    pub output: String,
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "[{input}]")?;
        }
        write!(f, "{}[{}]", self.filter, self.output)
    }
}

/// A compiled filter graph plus the image inputs it references.
///
/// Extra input `i` (0-based in [`FilterGraph::extra_inputs`]) is ffmpeg
/// input `i + 1`; input 0 is the background video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    stages: Vec<FilterStage>,
    extra_inputs: Vec<PathBuf>,
    output_label: String,
}

impl FilterGraph {
    /// The `-filter_complex` expression.
    pub fn expression(&self) -> String {
        self.stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Image inputs in ffmpeg input order.
    pub fn extra_inputs(&self) -> &[PathBuf] {
        &self.extra_inputs
    }

    /// Label of the stream to map to the output video.
    pub fn output_label(&self) -> &str {
        &self.output_label
    }

    /// Number of stages of a given kind.
    pub fn count(&self, kind: StageKind) -> usize {
        self.stages.iter().filter(|s| s.kind == kind).count()
    }
}

/// Compile the project's overlays into a filter graph.
pub fn compile<R>(project: &Project, resolver: &R) -> FilterGraph
where
    R: ScreenshotResolver + ?Sized,
{
    let res = project.resolution;
    let mut stages = Vec::with_capacity(2 + project.overlays.len() * 2);

    stages.push(FilterStage {
        kind: StageKind::BaseScale,
        inputs: vec![PRIMARY_VIDEO.to_string()],
        filter: format!(
            "scale='min({w}\\,iw)':'min({h}\\,ih)':force_original_aspect_ratio=decrease",
            w = res.w,
            h = res.h
        ),
        output: SCALED_LABEL.to_string(),
    });
    stages.push(FilterStage {
        kind: StageKind::BasePad,
        inputs: vec![SCALED_LABEL.to_string()],
        filter: format!("pad={}:{}:(ow-iw)/2:(oh-ih)/2:black", res.w, res.h),
        output: BASE_LABEL.to_string(),
    });

    let mut extra_inputs = Vec::with_capacity(project.overlays.len());
    let mut current = BASE_LABEL.to_string();

    for (i, overlay) in project.overlays.iter().enumerate() {
        let input_index = i + 1;
        extra_inputs.push(resolver.screenshot_path(overlay.key()));

        let scaled = format!("ov{input_index}");
        let next = format!("v{input_index}");

        stages.push(FilterStage {
            kind: StageKind::OverlayScale,
            inputs: vec![format!("{input_index}:v")],
            filter: format!("scale={}:-1", overlay.w),
            output: scaled.clone(),
        });
        stages.push(FilterStage {
            kind: StageKind::Overlay,
            inputs: vec![current, scaled],
            filter: overlay_filter(overlay),
            output: next.clone(),
        });

        current = next;
    }

    FilterGraph {
        stages,
        extra_inputs,
        output_label: current,
    }
}

fn overlay_filter(overlay: &Overlay) -> String {
    format!(
        "overlay={}:{}:enable='between(t,{},{})'",
        overlay.x, overlay.y, overlay.start, overlay.end
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatvid_project_model::{ScreenshotKey, ScreenshotStore};
    use std::path::Path;

    #[test]
    fn test_example_project_graph_text() {
        let project = Project::example();
        let store = ScreenshotStore::for_project(Path::new("/p"));
        let graph = compile(&project, &store);

        assert_eq!(
            graph.expression(),
            "[0:v]scale='min(1080\\,iw)':'min(1920\\,ih)':force_original_aspect_ratio=decrease[scaled];\
             [scaled]pad=1080:1920:(ow-iw)/2:(oh-ih)/2:black[base];\
             [1:v]scale=920:-1[ov1];\
             [base][ov1]overlay=80:980:enable='between(t,0.5,2.5)'[v1];\
             [2:v]scale=920:-1[ov2];\
             [v1][ov2]overlay=80:980:enable='between(t,2.5,5)'[v2]"
        );
        assert_eq!(graph.output_label(), "v2");
        assert_eq!(
            graph.extra_inputs(),
            &[
                PathBuf::from("/p/out/chat/chat-0-0.png"),
                PathBuf::from("/p/out/chat/chat-0-1.png"),
            ]
        );
    }

    #[test]
    fn test_zero_overlays_maps_base() {
        let mut project = Project::example();
        project.overlays.clear();
        let graph = compile(&project, &ScreenshotStore::new("/p/out/chat"));

        assert_eq!(graph.stages().len(), 2);
        assert!(graph.extra_inputs().is_empty());
        assert_eq!(graph.output_label(), BASE_LABEL);
        assert!(graph.expression().ends_with("[base]"));
    }

    #[test]
    fn test_shared_screenshot_is_loaded_per_overlay() {
        let mut project = Project::example();
        let mut again = project.overlays[0];
        again.start = 7.0;
        again.end = 8.0;
        again.y = 200.0;
        project.overlays.push(again);

        let graph = compile(&project, &ScreenshotStore::new("/s"));
        assert_eq!(graph.extra_inputs().len(), 3);
        assert_eq!(graph.extra_inputs()[0], graph.extra_inputs()[2]);
        assert_eq!(graph.count(StageKind::OverlayScale), 3);
        assert!(graph.expression().contains("[3:v]scale=920:-1[ov3]"));
        assert!(graph
            .expression()
            .contains("[v2][ov3]overlay=80:200:enable='between(t,7,8)'[v3]"));
    }

    #[test]
    fn test_resolver_is_consulted_by_key() {
        struct Fixed;
        impl ScreenshotResolver for Fixed {
            fn screenshot_path(&self, key: ScreenshotKey) -> PathBuf {
                PathBuf::from(format!("/images/{}-{}.png", key.start, key.end))
            }
        }

        let graph = compile(&Project::example(), &Fixed);
        assert_eq!(graph.extra_inputs()[1], PathBuf::from("/images/0-1.png"));
    }

    #[test]
    fn test_stage_display() {
        let stage = FilterStage {
            kind: StageKind::Overlay,
            inputs: vec!["a".to_string(), "b".to_string()],
            filter: "overlay=0:0".to_string(),
            output: "c".to_string(),
        };
        assert_eq!(stage.to_string(), "[a][b]overlay=0:0[c]");
    }
}
