//! Basic building blocks.
//!
//! The world uses a planar coordinate system in centimeters: x increases to
//! the right, y increases forward from the robot's starting position.

use std::{
    f64::consts::PI,
    ops::{Add, Neg},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self, position: Self) -> f64 {
        ((self.x - position.x).powi(2) + (self.y - position.y).powi(2)).sqrt()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl From<Position> for (f64, f64) {
    fn from(value: Position) -> Self {
        (value.x, value.y)
    }
}

/// Heading angle in radians. Zero faces the +y axis; positive angles turn
/// toward +x.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_deg(degree: f64) -> Self {
        Self(degree * PI / 180.0)
    }

    pub fn to_deg(self) -> f64 {
        (self.0 * (180.0 / PI) + 360.0) % 360.0
    }

    /// Equivalent angle in the half-open interval (-pi, pi].
    pub fn normalized(self) -> Self {
        Self(self.0.sin().atan2(self.0.cos()))
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Angle(-self.0)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl From<Angle> for f64 {
    fn from(value: Angle) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_position() {
        let position = Position::new(1.0, 2.0);
        assert_abs_diff_eq!(position.x(), 1.0);
        assert_abs_diff_eq!(position.y(), 2.0);
        assert_abs_diff_eq!(position.distance(Position::new(4.0, 6.0)), 5.0);
    }

    #[rstest]
    #[case(Angle::new(0.0), 0.0)]
    #[case(Angle::new(0.5 * PI), 90.0)]
    #[case(Angle::new(1.5 * PI), 270.0)]
    #[case(Angle::new(2.0 * PI), 0.0)]
    fn test_angle_to_deg(#[case] angle: Angle, #[case] expected: f64) {
        assert_abs_diff_eq!(angle.to_deg(), expected);
    }

    #[rstest]
    #[case::identity(0.25 * PI, 0.25 * PI)]
    #[case::wrap_positive(1.5 * PI, -0.5 * PI)]
    #[case::wrap_negative(-1.5 * PI, 0.5 * PI)]
    #[case::two_turns(4.5 * PI, 0.5 * PI)]
    #[case::pi_stays_pi(PI, PI)]
    fn test_angle_normalized(#[case] radians: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(
            f64::from(Angle::new(radians).normalized()),
            expected,
            epsilon = 1e-12
        );
    }
}
