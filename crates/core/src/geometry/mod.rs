//! Pure numeric mappings shared by every motion.
//!
//! Physical coordinates live on the dome's horizontal projection: X and Y span
//! `[-radius, radius]` with the listener at the origin. Normalized values are
//! the host-facing `[0, 1]` representation of the same quantities.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// A point in physical dome coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Maps a normalized value onto `[min, max]`.
#[inline]
pub fn percent_to_range(value: f32, min: f32, max: f32) -> f32 {
    min + value * (max - min)
}

/// Maps a value in `[min, max]` back to the normalized range.
#[inline]
pub fn range_to_percent(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}

/// Converts a normalized parameter value into a physical coordinate.
#[inline]
pub fn normalized_to_physical(value: f32, radius: f32) -> f32 {
    percent_to_range(value, -radius, radius)
}

/// Converts a physical coordinate into its normalized parameter value.
#[inline]
pub fn physical_to_normalized(value: f32, radius: f32) -> f32 {
    range_to_percent(value, -radius, radius)
}

/// Euclidean fractional part, always in `[0, 1)`.
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Converts normalized azimuth/elevation into a physical point.
///
/// Azimuth 0.5 faces front (positive Y) and elevation 1.0 is the zenith,
/// which projects onto the origin.
pub fn azimuth_elevation_to_xy(azimuth01: f32, elevation01: f32, radius: f32) -> Point {
    let azimuth = percent_to_range(azimuth01, -PI, PI);
    let elevation = percent_to_range(elevation01, 0.0, FRAC_PI_2);
    let ground = radius * elevation.cos();
    Point::new(-ground * azimuth.sin(), ground * azimuth.cos())
}

/// Normalized azimuth of a physical point.
pub fn xy_to_azimuth01(point: Point) -> f32 {
    let azimuth = (-point.x).atan2(point.y);
    wrap_unit(range_to_percent(azimuth, -PI, PI))
}

/// Normalized elevation of a physical point. Points outside the dome clamp
/// to the horizon.
pub fn xy_to_elevation01(point: Point, radius: f32) -> f32 {
    let distance = (point.x.hypot(point.y) / radius).clamp(0.0, 1.0);
    range_to_percent(distance.acos(), 0.0, FRAC_PI_2)
}

/// Straight line through a start and an end point.
///
/// Vertical lines have no finite slope, so the relation flips to X being
/// constant and Y driving the motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPath {
    pub start: Point,
    pub end: Point,
    y_dependent: bool,
    slope: f32,
    intercept: f32,
}

impl LinearPath {
    pub fn new(start: Point, end: Point) -> Self {
        if end.x != start.x {
            let slope = (end.y - start.y) / (end.x - start.x);
            Self {
                start,
                end,
                y_dependent: true,
                slope,
                intercept: start.y - slope * start.x,
            }
        } else {
            Self {
                start,
                end,
                y_dependent: false,
                slope: 0.0,
                intercept: start.x,
            }
        }
    }

    /// Same line with the end pushed to twice its displacement from the start.
    pub fn extended(start: Point, end: Point) -> Self {
        let far = Point::new(2.0 * end.x - start.x, 2.0 * end.y - start.y);
        Self::new(start, far)
    }

    /// Point at `amount` along the line, 0 being the start and 1 the end.
    pub fn at(&self, amount: f32) -> Point {
        if self.y_dependent {
            let x = self.start.x + (self.end.x - self.start.x) * amount;
            Point::new(x, self.slope * x + self.intercept)
        } else {
            Point::new(self.intercept, self.start.y + (self.end.y - self.start.y) * amount)
        }
    }
}
