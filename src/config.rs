use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 720;

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

pub const DEFAULT_SCROLL_SENSITIVITY: f32 = 1.0e-4;
pub const DEFAULT_SMOOTHING: f32 = 0.1;
pub const DEFAULT_LOOKAHEAD: f32 = 0.03;
pub const DEFAULT_START_POSITION: f32 = 0.5;

pub const DEFAULT_TUBE_RADIUS: f32 = 2.5;
pub const DEFAULT_TUBULAR_SEGMENTS: u32 = 400;
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 40;

pub const DEFAULT_BOX_COUNT: u32 = 55;
pub const DEFAULT_BOX_SIZE: f32 = 0.075;
pub const DEFAULT_BOX_SCATTER: f32 = 0.1;
pub const DEFAULT_SEED: u64 = 42;

pub const DEFAULT_FOG_DENSITY: f32 = 0.3;

const DEFAULT_LABEL_STOPS: [f32; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            title: "tunnel-flyer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Progress per wheel pixel.
    pub sensitivity: f32,
    /// Fraction of the remaining gap closed per tick, in (0, 1].
    pub smoothing: f32,
    /// How far ahead of the eye the look-at target sits, in progress units.
    pub lookahead: f32,
    pub start_position: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SCROLL_SENSITIVITY,
            smoothing: DEFAULT_SMOOTHING,
            lookahead: DEFAULT_LOOKAHEAD,
            start_position: DEFAULT_START_POSITION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeConfig {
    pub radius: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_TUBE_RADIUS,
            tubular_segments: DEFAULT_TUBULAR_SEGMENTS,
            radial_segments: DEFAULT_RADIAL_SEGMENTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    pub count: u32,
    pub size: f32,
    /// Forward jitter added to each box's even spacing, in progress units.
    pub scatter: f32,
    pub seed: u64,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_BOX_COUNT,
            size: DEFAULT_BOX_SIZE,
            scatter: DEFAULT_BOX_SCATTER,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub progress: f32,
    pub text: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            progress: 0.0,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub flight: FlightConfig,
    pub tube: TubeConfig,
    pub boxes: BoxConfig,
    pub fog_density: f32,
    pub labels: Vec<LabelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            flight: FlightConfig::default(),
            tube: TubeConfig::default(),
            boxes: BoxConfig::default(),
            fog_density: DEFAULT_FOG_DENSITY,
            labels: default_labels(),
        }
    }
}

fn default_labels() -> Vec<LabelConfig> {
    DEFAULT_LABEL_STOPS
        .iter()
        .enumerate()
        .map(|(i, &progress)| LabelConfig {
            progress,
            text: format!("Info {}", i + 1),
        })
        .collect()
}

impl Config {
    /// Reads a JSON config file. Fields the file omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&text)
            .context(format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!("window dimensions must be non-zero");
        }
        if !(0.0..180.0).contains(&self.camera.fov_degrees) || self.camera.fov_degrees <= 0.0 {
            bail!(
                "camera.fov_degrees must be in (0, 180), got {}",
                self.camera.fov_degrees
            );
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            bail!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                self.camera.near,
                self.camera.far
            );
        }
        if !self.flight.sensitivity.is_finite() || self.flight.sensitivity <= 0.0 {
            bail!(
                "flight.sensitivity must be positive, got {}",
                self.flight.sensitivity
            );
        }
        if !(self.flight.smoothing > 0.0 && self.flight.smoothing <= 1.0) {
            bail!(
                "flight.smoothing must be in (0, 1], got {}",
                self.flight.smoothing
            );
        }
        if !(self.flight.lookahead > 0.0 && self.flight.lookahead < 1.0) {
            bail!(
                "flight.lookahead must be in (0, 1), got {}",
                self.flight.lookahead
            );
        }
        if !(0.0..=1.0).contains(&self.flight.start_position) {
            bail!(
                "flight.start_position must be in [0, 1], got {}",
                self.flight.start_position
            );
        }
        if self.tube.radius <= 0.0 {
            bail!("tube.radius must be positive, got {}", self.tube.radius);
        }
        if self.tube.tubular_segments < 2 || self.tube.radial_segments < 3 {
            bail!(
                "tube needs at least 2 tubular and 3 radial segments, got {}x{}",
                self.tube.tubular_segments,
                self.tube.radial_segments
            );
        }
        if self.boxes.size <= 0.0 {
            bail!("boxes.size must be positive, got {}", self.boxes.size);
        }
        if !(self.boxes.scatter >= 0.0 && self.boxes.scatter < 1.0) {
            bail!(
                "boxes.scatter must be in [0, 1), got {}",
                self.boxes.scatter
            );
        }
        if !(self.fog_density.is_finite() && self.fog_density >= 0.0) {
            bail!("fog_density must be non-negative, got {}", self.fog_density);
        }
        for label in &self.labels {
            if !(0.0..=1.0).contains(&label.progress) {
                bail!(
                    "label progress must be in [0, 1], got {} ({:?})",
                    label.progress,
                    label.text
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.labels.len(), 5);
        assert_eq!(config.labels[2].progress, 0.5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = serde_json::from_str(r#"{"flight":{"smoothing":0.2}}"#).unwrap();
        assert_eq!(config.flight.smoothing, 0.2);
        assert_eq!(config.flight.sensitivity, DEFAULT_SCROLL_SENSITIVITY);
        assert_eq!(config.tube.radius, DEFAULT_TUBE_RADIUS);
    }

    #[test]
    fn rejects_out_of_range_smoothing() {
        let mut config = Config::default();
        config.flight.smoothing = 0.0;
        assert!(config.validate().is_err());
        config.flight.smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let mut config = Config::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back.tube.tubular_segments, config.tube.tubular_segments);
        assert_eq!(back.boxes.seed, config.boxes.seed);
    }
}
