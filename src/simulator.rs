//! Simulation core arbitrating between autonomous and manual timing.
//!
//! One mutex guards the robot state. In autonomous mode a background thread
//! integrates a fixed timestep and idles for roughly that long, mimicking the
//! always-running control loop of powered-on hardware. In manual mode the
//! caller steps the integration explicitly, which keeps test sequences free
//! of wall-clock timing.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::Duration,
};

use tracing::warn;

use crate::domain::{Camera, CameraConfig, Frame, Pose, Robot, RobotConfig, World};

/// Default integration timestep in seconds (50 Hz).
pub const DEFAULT_DT: f64 = 0.02;

/// Timing discipline currently in effect. Mixing the two is a caller
/// discipline violation; it stays memory-safe but double-advances time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Idle,
    Autonomous,
    Manual,
}

pub struct Simulator {
    world: Arc<World>,
    robot: Arc<Mutex<Robot>>,
    camera: Camera,
    dt: f64,
    mode: Mode,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Simulator {
    pub fn new(world: World) -> Self {
        Self::with_camera(world, CameraConfig::default())
    }

    pub fn with_camera(world: World, camera: CameraConfig) -> Self {
        Self {
            world: Arc::new(world),
            robot: Arc::new(Mutex::new(Robot::new(RobotConfig::default()))),
            camera: Camera::new(camera),
            dt: DEFAULT_DT,
            mode: Mode::Idle,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    fn robot(&self) -> MutexGuard<'_, Robot> {
        // A panic while holding the lock leaves consistent state; keep going.
        self.robot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the autonomous background loop. A no-op when already running.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        if self.mode == Mode::Manual {
            warn!("switching from manual stepping to the autonomous loop");
        }

        self.running.store(true, Ordering::Relaxed);
        let robot = Arc::clone(&self.robot);
        let running = Arc::clone(&self.running);
        let dt = self.dt;

        let worker = thread::Builder::new()
            .name("rover-sim".into())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    robot
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .update(dt);
                    thread::sleep(Duration::from_secs_f64(dt));
                }
            });

        match worker {
            Ok(handle) => {
                self.worker = Some(handle);
                self.mode = Mode::Autonomous;
            }
            Err(error) => {
                self.running.store(false, Ordering::Relaxed);
                warn!("failed to spawn simulation worker: {error}");
            }
        }
    }

    /// Stop the autonomous loop and join its thread. The instance remains
    /// queryable afterwards; its last pose stands. Teardown failures are
    /// logged, never propagated.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("simulation worker panicked during shutdown");
            }
        }
        self.mode = Mode::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Manually advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if self.mode == Mode::Autonomous {
            warn!("manual step while the autonomous loop runs double-advances the timeline");
        } else {
            self.mode = Mode::Manual;
        }
        self.robot().update(dt);
    }

    pub fn set_motor_speeds(&self, left_dps: f64, right_dps: f64) {
        self.robot().set_motor_speeds(left_dps, right_dps);
    }

    pub fn motor_speeds(&self) -> (f64, f64) {
        self.robot().motor_speeds()
    }

    pub fn pose(&self) -> Pose {
        self.robot().pose()
    }

    pub fn reset(&self, x: f64, y: f64, theta: f64) {
        self.robot().reset(x, y, theta);
    }

    /// Render a frame from the robot's current vantage point. The camera pose
    /// is snapshotted under the lock; rasterization happens outside it into a
    /// buffer owned by the caller.
    pub fn capture_frame(&self) -> Frame {
        let (position, heading) = self.robot().camera_pose();
        self.camera.capture(&self.world, position, heading)
    }

    pub fn trajectory(&self) -> Vec<Pose> {
        self.robot().history().iter().copied().collect()
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_manual_stepping_is_exact() {
        let mut sim = Simulator::new(World::default());
        sim.set_motor_speeds(300.0, 300.0);
        for _ in 0..10 {
            sim.step(0.1);
        }
        let pose = sim.pose();
        assert_abs_diff_eq!(pose.time, 1.0, epsilon = 1e-12);
        assert!(pose.y > 0.0);
        assert_abs_diff_eq!(pose.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_restores_pose_and_clears_trajectory() {
        let mut sim = Simulator::new(World::default());
        sim.set_motor_speeds(200.0, 300.0);
        sim.step(0.5);
        assert_eq!(sim.trajectory().len(), 1);

        sim.reset(1.0, 2.0, 0.25);
        let pose = sim.pose();
        assert_abs_diff_eq!(pose.x, 1.0);
        assert_abs_diff_eq!(pose.y, 2.0);
        assert_abs_diff_eq!(pose.theta, 0.25);
        assert_abs_diff_eq!(pose.time, 0.0);
        assert_eq!(sim.motor_speeds(), (0.0, 0.0));
        assert!(sim.trajectory().is_empty());
    }

    #[test]
    fn test_capture_produces_fresh_buffers() {
        let sim = Simulator::new(World::default());
        let first = sim.capture_frame();
        let second = sim.capture_frame();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stop_is_idempotent_and_leaves_state_queryable() {
        let mut sim = Simulator::new(World::default());
        sim.start();
        assert!(sim.is_running());
        sim.stop();
        assert!(!sim.is_running());
        sim.stop();
        let pose = sim.pose();
        assert!(pose.time >= 0.0);
    }
}
