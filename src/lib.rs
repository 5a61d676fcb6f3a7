//! Simulated differential-drive robot with a synthetic camera.
//!
//! The crate exposes the same motion/sensor surface as the hardware driver it
//! substitutes for, so student navigation code runs unchanged against it. The
//! physics loop either runs autonomously in a background thread or is stepped
//! manually for deterministic, reproducible sequences.

mod domain;
mod driver;
mod simulator;

pub use domain::{
    load_scenario, Angle, Camera, CameraConfig, Frame, Marker, MarkerColor, Pose, PoseHistory,
    Position, Robot, RobotConfig, ScenarioError, World,
};
pub use driver::{Motor, Rover, DEFAULT_SPEED};
pub use simulator::{Simulator, DEFAULT_DT};
