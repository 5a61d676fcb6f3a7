//! Synthetic camera rendering the world from the robot's vantage point.
//!
//! A pinhole model projects each marker onto the image plane; apparent size
//! scales inversely with depth. Markers are composited back to front
//! (painter's algorithm) so nearer ones occlude farther ones.

use nalgebra::{Rotation2, Vector2};

use super::{Angle, Marker, Position, World};

/// Camera intrinsics and rendering parameters. Static per camera instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in degrees.
    pub fov_horizontal: f64,
    pub sky_color: [u8; 3],
    pub ground_color: [u8; 3],
    /// Horizon row as a fraction of the image height (0 = top, 1 = bottom).
    pub horizon_y: f64,
    /// Markers nearer than this are not rendered (cm).
    pub min_distance: f64,
    /// Markers farther than this are not rendered (cm).
    pub max_distance: f64,
}

impl CameraConfig {
    /// Pinhole focal length in pixels: `f = (width/2) / tan(fov/2)`.
    pub fn focal_length(&self) -> f64 {
        (self.width as f64 / 2.0) / (self.fov_horizontal.to_radians() / 2.0).tan()
    }

    pub fn center_x(&self) -> f64 {
        self.width as f64 / 2.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            fov_horizontal: 60.0,
            sky_color: [160, 180, 200],
            ground_color: [60, 80, 60],
            horizon_y: 0.45,
            min_distance: 5.0,
            max_distance: 500.0,
        }
    }
}

/// Fixed-size RGB8 raster, row-major, three bytes per pixel. The same shape a
/// real camera sensor delivers, so caller code is none the wiser.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    fn fill_row(&mut self, y: u32, color: [u8; 3]) {
        let start = y as usize * self.width as usize * 3;
        for pixel in self.data[start..start + self.width as usize * 3].chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
    }

    /// Fill the half-open pixel rectangle `[x1, x2) x [y1, y2)`.
    fn fill_rect(&mut self, x1: u32, y1: u32, x2: u32, y2: u32, color: [u8; 3]) {
        for y in y1..y2 {
            for x in x1..x2 {
                let i = (y as usize * self.width as usize + x as usize) * 3;
                self.data[i..i + 3].copy_from_slice(&color);
            }
        }
    }
}

/// Screen-space placement of one marker.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Projection {
    screen_x: f64,
    top: f64,
    bottom: f64,
    width: f64,
    height: f64,
    distance: f64,
}

pub struct Camera {
    config: CameraConfig,
}

// Markers slightly outside the FOV are kept so they slide into view smoothly.
const FOV_MARGIN: f64 = 1.2;
// Hand-tuned ground intersection: base row drops below the horizon inversely
// with depth.
const GROUND_DROP: f64 = 0.1;
const SHADE_FLOOR: f64 = 0.4;
const SHADE_RANGE: f64 = 400.0;

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Render a frame as seen from the given camera pose. Each call produces
    /// a fresh buffer.
    pub fn capture(&self, world: &World, position: Position, heading: Angle) -> Frame {
        let mut frame = Frame::new(self.config.width, self.config.height);
        self.draw_background(&mut frame);

        let mut visible = world
            .markers()
            .iter()
            .filter_map(|marker| {
                self.project(marker, position, heading)
                    .map(|projection| (marker, projection))
            })
            .collect::<Vec<_>>();

        // Far to near, so nearer markers overwrite farther ones.
        visible.sort_by(|a, b| b.1.distance.total_cmp(&a.1.distance));

        for (marker, projection) in visible {
            self.draw_marker(&mut frame, marker, projection);
        }

        frame
    }

    fn horizon_row(&self) -> u32 {
        (self.config.height as f64 * self.config.horizon_y) as u32
    }

    fn draw_background(&self, frame: &mut Frame) {
        let horizon = self.horizon_row();
        for y in 0..horizon {
            frame.fill_row(y, self.config.sky_color);
        }

        // Ground brightens away from the horizon as a depth cue.
        let rows_below = self.config.height - horizon;
        for i in 0..rows_below {
            let t = i as f64 / rows_below as f64;
            frame.fill_row(horizon + i, scale_color(self.config.ground_color, 0.7 + 0.3 * t));
        }
    }

    /// Project a marker to screen space, or `None` if it is outside the depth
    /// range or the (margin-widened) field of view. Depth filtering happens
    /// before any division by depth.
    fn project(&self, marker: &Marker, position: Position, heading: Angle) -> Option<Projection> {
        let cfg = &self.config;

        let relative = Vector2::new(
            marker.position().x() - position.x(),
            marker.position().y() - position.y(),
        );
        // Headings are measured from +y toward +x, so rotating the offset by
        // +heading in nalgebra's convention puts depth on the local y axis and
        // the camera's rightward direction on the local x axis.
        let local = Rotation2::new(f64::from(heading)) * relative;
        let (horizontal, depth) = (local.x, local.y);

        if depth < cfg.min_distance || depth > cfg.max_distance {
            return None;
        }

        let bearing = horizontal.atan2(depth);
        let half_fov = (cfg.fov_horizontal / 2.0).to_radians();
        if bearing.abs() > half_fov * FOV_MARGIN {
            return None;
        }

        let f = cfg.focal_length();
        let screen_x = f * (horizontal / depth) + cfg.center_x();
        let width = f * (marker.radius() * 2.0) / depth;
        let height = f * marker.height() / depth;

        // The marker stands on the ground: its base sits below the horizon,
        // approaching it with distance.
        let bottom = self.config.height as f64 * cfg.horizon_y + f * GROUND_DROP / depth;

        Some(Projection {
            screen_x,
            top: bottom - height,
            bottom,
            width,
            height,
            distance: relative.norm(),
        })
    }

    fn draw_marker(&self, frame: &mut Frame, marker: &Marker, projection: Projection) {
        let width = (projection.width as i64).max(2);
        let height_px = (projection.height as i64).max(4);

        let x1 = (projection.screen_x - width as f64 / 2.0) as i64;
        let x2 = (projection.screen_x + width as f64 / 2.0) as i64;
        let y1 = projection.bottom as i64 - height_px;
        let y2 = projection.bottom as i64;

        let x1 = x1.clamp(0, self.config.width as i64 - 1) as u32;
        let x2 = x2.clamp(0, self.config.width as i64) as u32;
        let y1 = y1.clamp(0, self.config.height as i64 - 1) as u32;
        let y2 = y2.clamp(0, self.config.height as i64) as u32;

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let shade = (1.0 - projection.distance / SHADE_RANGE).max(SHADE_FLOOR);
        let color = scale_color(marker.color().rgb(), shade);
        frame.fill_rect(x1, y1, x2, y2, color);

        // Lighter left edge and darker right edge as a cheap depth cue.
        if width > 4 {
            frame.fill_rect(x1, y1, x1 + 1, y2, scale_color(color, 1.3));
            frame.fill_rect(x2 - 1, y1, x2, y2, scale_color(color, 0.7));
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

fn scale_color(color: [u8; 3], factor: f64) -> [u8; 3] {
    color.map(|c| (c as f64 * factor).min(255.0) as u8)
}
