pub mod camera;
pub mod cli;
pub mod config;
pub mod flight;
pub mod frame;
pub mod labels;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod spline;
pub mod types;

pub use camera::{Camera, CameraPose};
pub use config::Config;
pub use flight::{FlightController, ScrollState};
pub use labels::{project_to_screen, Label, LabelAnchor, LabelSet};
pub use spline::{CurvePath, CurveError};
