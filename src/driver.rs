//! Drop-in motion and camera surface mirroring the hardware driver API.
//!
//! Method names match the real driver so student code swaps between hardware
//! and simulation by changing a constructor. Commands are non-blocking: they
//! set wheel speeds and return, while the simulation loop integrates them.

use crate::{
    domain::{load_scenario, Frame, Pose, ScenarioError, World},
    simulator::Simulator,
};

/// Default motion speed in degrees per second, matching the real robot.
pub const DEFAULT_SPEED: f64 = 300.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Motor {
    Left,
    Right,
}

pub struct Rover {
    sim: Simulator,
    speed: f64,
}

impl Rover {
    /// Simulated robot in the default gate world with the autonomous loop
    /// running, like powered-on hardware.
    pub fn new() -> Self {
        Self::with_world(World::default())
    }

    pub fn with_world(world: World) -> Self {
        let mut sim = Simulator::new(world);
        sim.start();
        Self {
            sim,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn from_scenario(name: &str) -> Result<Self, ScenarioError> {
        Ok(Self::with_world(load_scenario(name)?))
    }

    pub fn from_seed(seed: u64, count: usize) -> Self {
        Self::with_world(World::from_seed(seed, count))
    }

    /// Simulated robot without the background loop; advance it with
    /// [`Rover::step`]. This is the entry point for deterministic sequences.
    pub fn manual(world: World) -> Self {
        Self {
            sim: Simulator::new(world),
            speed: DEFAULT_SPEED,
        }
    }

    /// Set the default speed for motion commands, in degrees per second.
    pub fn set_speed(&mut self, dps: f64) {
        self.speed = dps;
    }

    pub fn get_speed(&self) -> f64 {
        self.speed
    }

    pub fn forward(&self) {
        self.sim.set_motor_speeds(self.speed, self.speed);
    }

    pub fn backward(&self) {
        self.sim.set_motor_speeds(-self.speed, -self.speed);
    }

    /// Spin left in place.
    pub fn left(&self) {
        self.sim.set_motor_speeds(-self.speed, self.speed);
    }

    /// Spin right in place.
    pub fn right(&self) {
        self.sim.set_motor_speeds(self.speed, -self.speed);
    }

    pub fn stop(&self) {
        self.sim.set_motor_speeds(0.0, 0.0);
    }

    /// Set both motors as percentages of the configured speed. Percentages
    /// are clamped to [-100, 100] before scaling.
    pub fn steer(&self, left_percent: f64, right_percent: f64) {
        let left = self.speed * left_percent.clamp(-100.0, 100.0) / 100.0;
        let right = self.speed * right_percent.clamp(-100.0, 100.0) / 100.0;
        self.sim.set_motor_speeds(left, right);
    }

    /// Override a single motor's speed in degrees per second.
    pub fn set_motor_dps(&self, motor: Motor, dps: f64) {
        let (left, right) = self.sim.motor_speeds();
        match motor {
            Motor::Left => self.sim.set_motor_speeds(dps, right),
            Motor::Right => self.sim.set_motor_speeds(left, dps),
        }
    }

    /// Reset the robot pose; wheel speeds, simulation time, and the
    /// trajectory are cleared along with it.
    pub fn reset(&self, x: f64, y: f64, theta: f64) {
        self.sim.reset(x, y, theta);
    }

    /// Manually advance the simulation. Only meaningful without the
    /// autonomous loop.
    pub fn step(&mut self, dt: f64) {
        self.sim.step(dt);
    }

    pub fn capture_frame(&self) -> Frame {
        self.sim.capture_frame()
    }

    pub fn get_pose(&self) -> (f64, f64, f64) {
        let pose = self.sim.pose();
        (pose.x, pose.y, pose.theta)
    }

    pub fn trajectory(&self) -> Vec<Pose> {
        self.sim.trajectory()
    }

    pub fn world(&self) -> &World {
        self.sim.world()
    }

    /// Shut down the background loop. The rover stays queryable but no
    /// longer advances on its own.
    pub fn close(&mut self) {
        self.sim.stop();
    }
}

impl Default for Rover {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn drive_sequence(rover: &mut Rover) {
        rover.forward();
        for _ in 0..5 {
            rover.step(0.1);
        }
        rover.steer(50.0, 100.0);
        for _ in 0..5 {
            rover.step(0.1);
        }
        rover.stop();
        rover.step(0.1);
    }

    #[test]
    fn test_forward_then_stop() {
        let mut rover = Rover::manual(World::default());
        rover.forward();
        rover.step(0.5);
        let (x, y, theta) = rover.get_pose();
        assert!(y > 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(theta, 0.0, epsilon = 1e-12);

        rover.stop();
        rover.step(0.5);
        let pose_after = rover.get_pose();
        assert_eq!((x, y, theta), pose_after);
    }

    #[rstest]
    #[case::within_range(50.0, -50.0, 150.0, -150.0)]
    #[case::clamped(150.0, -260.0, 300.0, -300.0)]
    fn test_steer_scales_and_clamps(
        #[case] left_percent: f64,
        #[case] right_percent: f64,
        #[case] expected_left: f64,
        #[case] expected_right: f64,
    ) {
        let rover = Rover::manual(World::default());
        rover.steer(left_percent, right_percent);
        let (left, right) = rover.sim.motor_speeds();
        assert_abs_diff_eq!(left, expected_left);
        assert_abs_diff_eq!(right, expected_right);
    }

    #[test]
    fn test_left_right_spin_opposite_ways() {
        let mut rover = Rover::manual(World::default());
        rover.left();
        rover.step(0.2);
        let (_, _, theta_left) = rover.get_pose();

        rover.reset(0.0, 0.0, 0.0);
        rover.right();
        rover.step(0.2);
        let (_, _, theta_right) = rover.get_pose();

        assert_abs_diff_eq!(theta_left, -theta_right, epsilon = 1e-12);
        assert!(theta_left > 0.0);
    }

    #[test]
    fn test_set_motor_dps_overrides_one_side() {
        let rover = Rover::manual(World::default());
        rover.forward();
        rover.set_motor_dps(Motor::Right, 120.0);
        assert_eq!(rover.sim.motor_speeds(), (DEFAULT_SPEED, 120.0));
    }

    #[test]
    fn test_set_speed_rescales_commands() {
        let mut rover = Rover::manual(World::default());
        rover.set_speed(100.0);
        assert_abs_diff_eq!(rover.get_speed(), 100.0);
        rover.backward();
        assert_eq!(rover.sim.motor_speeds(), (-100.0, -100.0));
    }

    #[test]
    fn test_seeded_runs_replay_identically() {
        let mut first = Rover::manual(World::from_seed(7, 4));
        let mut second = Rover::manual(World::from_seed(7, 4));

        drive_sequence(&mut first);
        drive_sequence(&mut second);

        assert_eq!(first.get_pose(), second.get_pose());
        assert_eq!(first.capture_frame(), second.capture_frame());
        assert_eq!(first.trajectory(), second.trajectory());
    }

    #[test]
    fn test_close_keeps_rover_queryable() {
        let mut rover = Rover::with_world(World::default());
        rover.close();
        rover.close();
        let frame = rover.capture_frame();
        assert_eq!(frame.width(), 640);
        let (_, _, theta) = rover.get_pose();
        assert!(theta.abs() <= std::f64::consts::PI);
    }

    #[test]
    fn test_trajectory_records_steps() {
        let mut rover = Rover::manual(World::default());
        rover.forward();
        for _ in 0..3 {
            rover.step(0.1);
        }
        let trajectory = rover.trajectory();
        assert_eq!(trajectory.len(), 3);
        assert_abs_diff_eq!(trajectory[0].time, 0.0);
        assert!(trajectory[2].time > trajectory[1].time);
    }
}
