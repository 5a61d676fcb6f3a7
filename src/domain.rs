//! The domain module encapsulates the core business logic. It defines the
//! `World` of markers, the differential-drive `Robot`, and the synthetic
//! `Camera` that projects the one onto the other.
//!
//! By minimizing hard dependencies, this module ensures the business logic
//! remains adaptable and independent of specific implementation details.

mod basis;
mod camera;
mod robot;
mod world;

pub use basis::{Angle, Position};
pub use camera::{Camera, CameraConfig, Frame};
pub use robot::{Pose, PoseHistory, Robot, RobotConfig};
pub use world::{load_scenario, Marker, MarkerColor, ScenarioError, World};
