use glam::Vec3;

use crate::camera::Camera;
use crate::config::LabelConfig;
use crate::spline::CurvePath;

/// A text marker pinned to a world point on the curve.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub world: Vec3,
}

/// Where a label lands on screen this frame. Coordinates are pixels from
/// the top-left corner and stay valid even when `visible` is false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl LabelAnchor {
    const HIDDEN: LabelAnchor = LabelAnchor {
        x: 0.0,
        y: 0.0,
        visible: false,
    };
}

/// Maps a world point into the camera's viewport. The depth test uses the
/// symmetric NDC range, so points behind the camera or past the far plane
/// come back hidden rather than mirrored onto the screen.
pub fn project_to_screen(world: Vec3, camera: &Camera) -> LabelAnchor {
    let (width, height) = camera.viewport();
    match camera.project_ndc(world) {
        Some(ndc) => LabelAnchor {
            x: (ndc.x * 0.5 + 0.5) * width,
            y: (ndc.y * -0.5 + 0.5) * height,
            visible: ndc.z > -1.0 && ndc.z < 1.0,
        },
        None => LabelAnchor::HIDDEN,
    }
}

pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    /// Resolves each configured stop to its world point. The curve never
    /// changes after startup, so sampling once here matches re-sampling
    /// every frame.
    pub fn along_path(path: &CurvePath, stops: &[LabelConfig]) -> Self {
        let labels = stops
            .iter()
            .map(|stop| Label {
                text: stop.text.clone(),
                world: path.point_at(stop.progress),
            })
            .collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// One anchor per label, in label order.
    pub fn anchors(&self, camera: &Camera) -> Vec<LabelAnchor> {
        self.labels
            .iter()
            .map(|label| project_to_screen(label.world, camera))
            .collect()
    }
}
