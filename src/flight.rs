use crate::camera::{Camera, CameraPose};
use crate::config::FlightConfig;
use crate::labels::{project_to_screen, LabelAnchor};
use crate::spline::CurvePath;

/// Smoothed scroll progress along the loop, both values in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
}

/// Maps accumulated scroll input to a camera pose on the curve.
///
/// Wheel input moves only the target; `tick` eases the current position
/// toward it by a fixed fraction per frame, so motion keeps gliding for a
/// moment after the wheel stops.
pub struct FlightController {
    path: CurvePath,
    scroll: ScrollState,
    sensitivity: f32,
    smoothing: f32,
    lookahead: f32,
}

impl FlightController {
    pub fn new(path: CurvePath, config: &FlightConfig) -> Self {
        let start = config.start_position.clamp(0.0, 1.0);
        Self {
            path,
            scroll: ScrollState {
                current: start,
                target: start,
            },
            sensitivity: config.sensitivity,
            smoothing: config.smoothing.clamp(0.0, 1.0),
            lookahead: config.lookahead,
        }
    }

    /// Feeds one wheel event, `delta_y` in pixels with the browser sign
    /// convention (positive pulls the wheel toward the user and backs the
    /// camera up). Non-finite deltas are dropped.
    pub fn on_scroll_delta(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.scroll.target = (self.scroll.target - delta_y * self.sensitivity).clamp(0.0, 1.0);
    }

    /// Advances the smoothed position one frame and samples the pose:
    /// the eye sits at the current progress, the look-at slightly ahead so
    /// the camera faces down the tube even through tight bends.
    pub fn tick(&mut self) -> CameraPose {
        self.scroll.current += (self.scroll.target - self.scroll.current) * self.smoothing;
        self.pose_at(self.scroll.current)
    }

    pub fn pose_at(&self, progress: f32) -> CameraPose {
        CameraPose {
            position: self.path.point_at(progress),
            look_at: self.path.point_at((progress + self.lookahead).rem_euclid(1.0)),
        }
    }

    /// Screen anchor for an arbitrary position on the loop.
    pub fn anchor_at(&self, progress: f32, camera: &Camera) -> LabelAnchor {
        project_to_screen(self.path.point_at(progress), camera)
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn path(&self) -> &CurvePath {
        &self.path
    }
}
