//! Differential-drive robot kinematics.
//!
//! Two independently driven wheels separated by the wheel base; the speed
//! difference produces rotation. Pose is advanced by Euler integration.

use std::collections::VecDeque;

use super::{Angle, Position};

/// Snapshot of the robot state at a point in simulation time.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub time: f64,
}

/// Rotating buffer of prior poses for trajectory introspection. Once full,
/// the oldest sample is dropped for each new one.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseHistory {
    samples: VecDeque<Pose>,
    capacity: usize,
}

impl PoseHistory {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, pose: Pose) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(pose);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Pose> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for PoseHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Physical parameters, approximately matching the real robot. All lengths in
/// centimeters.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RobotConfig {
    /// Distance between the wheels.
    pub wheel_base: f64,
    pub wheel_radius: f64,
    /// Forward offset of the camera mount from the robot center.
    pub camera_offset: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_base: 11.5,
            wheel_radius: 3.25,
            camera_offset: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Robot {
    position: Position,
    heading: Angle,
    left_speed: f64,
    right_speed: f64,
    time: f64,
    history: PoseHistory,
    config: RobotConfig,
}

impl Robot {
    pub fn new(config: RobotConfig) -> Self {
        Self {
            position: Position::default(),
            heading: Angle::default(),
            left_speed: 0.0,
            right_speed: 0.0,
            time: 0.0,
            history: PoseHistory::default(),
            config,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.position.x(),
            y: self.position.y(),
            theta: self.heading.into(),
            time: self.time,
        }
    }

    pub fn motor_speeds(&self) -> (f64, f64) {
        (self.left_speed, self.right_speed)
    }

    /// Set wheel speeds in degrees per second. Positive is forward rotation
    /// for that wheel.
    pub fn set_motor_speeds(&mut self, left_dps: f64, right_dps: f64) {
        self.left_speed = left_dps;
        self.right_speed = right_dps;
    }

    pub fn history(&self) -> &PoseHistory {
        &self.history
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Camera position and heading: the mount sits `camera_offset` ahead of
    /// the robot center along its heading.
    pub fn camera_pose(&self) -> (Position, Angle) {
        let theta = f64::from(self.heading);
        let position = self.position
            + Position::new(
                self.config.camera_offset * theta.sin(),
                self.config.camera_offset * theta.cos(),
            );
        (position, self.heading)
    }

    fn dps_to_cms(&self, dps: f64) -> f64 {
        (dps / 360.0) * (2.0 * std::f64::consts::PI * self.config.wheel_radius)
    }

    /// Advance the simulation by `dt` seconds using Euler integration of the
    /// differential-drive equations. The pre-step pose is recorded in the
    /// history before the state mutates.
    ///
    /// `dt` must be positive; the behavior for `dt <= 0` is unspecified.
    pub fn update(&mut self, dt: f64) {
        self.history.push(self.pose());

        let v_left = self.dps_to_cms(self.left_speed);
        let v_right = self.dps_to_cms(self.right_speed);

        let v = (v_left + v_right) / 2.0;
        let omega = (v_right - v_left) / self.config.wheel_base;

        let theta = f64::from(self.heading);
        self.position = Position::new(
            self.position.x() + v * theta.sin() * dt,
            self.position.y() + v * theta.cos() * dt,
        );
        self.heading = Angle::new(theta + omega * dt).normalized();
        self.time += dt;
    }

    /// Move the robot to a specific pose, stop both wheels, rewind time, and
    /// clear the history.
    pub fn reset(&mut self, x: f64, y: f64, theta: f64) {
        self.position = Position::new(x, y);
        self.heading = Angle::new(theta).normalized();
        self.left_speed = 0.0;
        self.right_speed = 0.0;
        self.time = 0.0;
        self.history.clear();
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::new(RobotConfig::default())
    }
}
