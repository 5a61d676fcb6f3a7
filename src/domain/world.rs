//! World layout: colored markers, bounds, and scenario generation.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rand::{
    distr::{Distribution, Uniform},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use super::Position;

/// Supported marker colors. A closed set so scenarios stay enumerable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
    Blue,
}

impl MarkerColor {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            MarkerColor::Green => [0, 255, 0],
            MarkerColor::Orange => [255, 165, 0],
            MarkerColor::Red => [255, 0, 0],
            MarkerColor::Blue => [0, 0, 255],
        }
    }
}

/// A colored vertical marker. Immutable once placed; scenarios are
/// regenerated wholesale rather than edited in place.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Marker {
    position: Position,
    color: MarkerColor,
    radius: f64,
    height: f64,
}

impl Marker {
    pub const DEFAULT_RADIUS: f64 = 5.0;
    pub const DEFAULT_HEIGHT: f64 = 30.0;

    pub const fn new(x: f64, y: f64, color: MarkerColor) -> Self {
        Self {
            position: Position::new(x, y),
            color,
            radius: Self::DEFAULT_RADIUS,
            height: Self::DEFAULT_HEIGHT,
        }
    }

    pub const fn with_dimensions(x: f64, y: f64, color: MarkerColor, radius: f64, height: f64) -> Self {
        Self {
            position: Position::new(x, y),
            color,
            radius,
            height,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> MarkerColor {
        self.color
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// The simulation world. The marker order is irrelevant for rendering (depth
/// sorting happens per frame) but stable for lookups and replay.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    markers: Vec<Marker>,
    width: f64,
    height: f64,
    seed: Option<u64>,
}

impl World {
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const DEFAULT_HEIGHT: f64 = 300.0;

    pub fn new(markers: Vec<Marker>) -> Self {
        Self {
            markers,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            seed: None,
        }
    }

    /// Two markers forming a gate to drive through, centered on the x axis at
    /// the given distance ahead.
    pub fn two_marker_gate(
        gap: f64,
        distance: f64,
        left_color: MarkerColor,
        right_color: MarkerColor,
    ) -> Self {
        Self::new(vec![
            Marker::new(-gap / 2.0, distance, left_color),
            Marker::new(gap / 2.0, distance, right_color),
        ])
    }

    /// Slalom course of alternating gates: each gate is a green/orange pair
    /// whose lateral offset flips sign from one gate to the next.
    pub fn slalom(num_gates: usize, spacing: f64) -> Self {
        let mut markers = Vec::with_capacity(num_gates * 2);
        for i in 0..num_gates {
            let y = 80.0 + i as f64 * spacing;
            let offset = if i % 2 == 0 { 30.0 } else { -30.0 };
            markers.push(Marker::new(offset - 20.0, y, MarkerColor::Green));
            markers.push(Marker::new(offset + 20.0, y, MarkerColor::Orange));
        }
        Self::new(markers)
    }

    /// Deterministic random world. Identical `(seed, count)` always produces
    /// the identical marker list, which is what makes graded runs replayable.
    pub fn from_seed(seed: u64, count: usize) -> Self {
        const COLORS: [MarkerColor; 2] = [MarkerColor::Green, MarkerColor::Orange];

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let x_range = Uniform::try_from(-80.0..=80.0).unwrap();
        let y_range = Uniform::try_from(50.0..=250.0).unwrap();

        let markers = (0..count)
            .map(|_| {
                let x = x_range.sample(&mut rng);
                let y = y_range.sample(&mut rng);
                let color = COLORS[rng.random_range(0..COLORS.len())];
                Marker::new(x, y, color)
            })
            .collect();

        Self {
            seed: Some(seed),
            ..Self::new(markers)
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Seed the world was generated from, if it was generated at all.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// First marker within `tolerance` of the given position, if any.
    pub fn marker_near(&self, position: Position, tolerance: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.position.distance(position) < tolerance)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::two_marker_gate(50.0, 80.0, MarkerColor::Green, MarkerColor::Orange)
    }
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("unknown scenario '{name}'; available: {available}")]
    Unknown { name: String, available: String },
}

static SCENARIOS: Lazy<BTreeMap<&'static str, fn() -> World>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "simple_gate",
            (|| World::two_marker_gate(50.0, 80.0, MarkerColor::Green, MarkerColor::Orange))
                as fn() -> World,
        ),
        ("narrow_gate", || {
            World::two_marker_gate(30.0, 80.0, MarkerColor::Green, MarkerColor::Orange)
        }),
        ("offset_gate", || {
            World::two_marker_gate(40.0, 100.0, MarkerColor::Green, MarkerColor::Orange)
        }),
        ("slalom", || World::slalom(3, 80.0)),
    ])
});

/// Load a pre-built scenario by name.
pub fn load_scenario(name: &str) -> Result<World, ScenarioError> {
    SCENARIOS
        .get(name)
        .map(|build| build())
        .ok_or_else(|| ScenarioError::Unknown {
            name: name.to_string(),
            available: SCENARIOS.keys().copied().collect::<Vec<_>>().join(", "),
        })
}
