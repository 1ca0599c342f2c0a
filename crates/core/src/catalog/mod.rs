//! Descriptive metadata used to populate trajectory pickers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{MotionError, Result};

const ROTATIONS: &[Direction] = &[Direction::Clockwise, Direction::CounterClockwise];
const SPIRAL_DIRECTIONS: &[Direction] = &[
    Direction::InClockwise,
    Direction::InCounterClockwise,
    Direction::OutClockwise,
    Direction::OutCounterClockwise,
];
const SPEEDS: &[Direction] = &[Direction::Slow, Direction::Mid, Direction::Fast];
const BOUNDED_RETURNS: &[ReturnMode] = &[ReturnMode::OneWay, ReturnMode::Return];

/// The closed set of motion patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrajectoryKind {
    Circle,
    Ellipse,
    Spiral,
    Pendulum,
    Random,
}

impl TrajectoryKind {
    pub const ALL: [TrajectoryKind; 5] = [
        TrajectoryKind::Circle,
        TrajectoryKind::Ellipse,
        TrajectoryKind::Spiral,
        TrajectoryKind::Pendulum,
        TrajectoryKind::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrajectoryKind::Circle => "Circle",
            TrajectoryKind::Ellipse => "Ellipse",
            TrajectoryKind::Spiral => "Spiral",
            TrajectoryKind::Pendulum => "Pendulum",
            TrajectoryKind::Random => "Random",
        }
    }

    /// Directions a picker may offer for this kind, in display order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            TrajectoryKind::Circle | TrajectoryKind::Ellipse => ROTATIONS,
            TrajectoryKind::Spiral => SPIRAL_DIRECTIONS,
            TrajectoryKind::Pendulum => &[],
            TrajectoryKind::Random => SPEEDS,
        }
    }

    /// Return modes for this kind, or `None` when the kind has no notion of
    /// returning.
    pub fn returns(self) -> Option<&'static [ReturnMode]> {
        match self {
            TrajectoryKind::Circle | TrajectoryKind::Ellipse | TrajectoryKind::Random => None,
            TrajectoryKind::Spiral | TrajectoryKind::Pendulum => Some(BOUNDED_RETURNS),
        }
    }

    /// Whether the motion runs between the start and an explicit end point.
    pub fn needs_end_point(self) -> bool {
        matches!(self, TrajectoryKind::Spiral | TrajectoryKind::Pendulum)
    }

    pub fn accepts(self, direction: Direction) -> bool {
        self.directions().contains(&direction)
    }
}

impl fmt::Display for TrajectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrajectoryKind {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_label(s);
        TrajectoryKind::ALL
            .into_iter()
            .find(|kind| normalize_label(kind.name()) == wanted)
            .ok_or_else(|| MotionError::UnknownName(s.to_string()))
    }
}

/// Every direction any kind understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
    InClockwise,
    InCounterClockwise,
    OutClockwise,
    OutCounterClockwise,
    Slow,
    Mid,
    Fast,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::Clockwise,
        Direction::CounterClockwise,
        Direction::InClockwise,
        Direction::InCounterClockwise,
        Direction::OutClockwise,
        Direction::OutCounterClockwise,
        Direction::Slow,
        Direction::Mid,
        Direction::Fast,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::Clockwise => "Clockwise",
            Direction::CounterClockwise => "Counter Clockwise",
            Direction::InClockwise => "In, Clockwise",
            Direction::InCounterClockwise => "In, Counter Clockwise",
            Direction::OutClockwise => "Out, Clockwise",
            Direction::OutCounterClockwise => "Out, Counter Clockwise",
            Direction::Slow => "Slow",
            Direction::Mid => "Mid",
            Direction::Fast => "Fast",
        }
    }

    pub fn is_counter_clockwise(self) -> bool {
        matches!(
            self,
            Direction::CounterClockwise | Direction::InCounterClockwise | Direction::OutCounterClockwise
        )
    }

    pub fn is_inward(self) -> bool {
        matches!(self, Direction::InClockwise | Direction::InCounterClockwise)
    }

    /// Random-walk step size in normalized units, for speed directions.
    pub fn walk_speed(self) -> Option<f32> {
        match self {
            Direction::Slow => Some(0.02),
            Direction::Mid => Some(0.06),
            Direction::Fast => Some(0.1),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_label(s);
        Direction::ALL
            .into_iter()
            .find(|direction| normalize_label(direction.label()) == wanted)
            .ok_or_else(|| MotionError::UnknownName(s.to_string()))
    }
}

/// Whether a bounded motion travels once or goes there and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReturnMode {
    #[default]
    OneWay,
    Return,
}

impl ReturnMode {
    pub fn label(self) -> &'static str {
        match self {
            ReturnMode::OneWay => "One Way",
            ReturnMode::Return => "Return",
        }
    }

    pub fn is_round_trip(self) -> bool {
        self == ReturnMode::Return
    }
}

/// Names of every trajectory kind, in picker order.
pub fn trajectory_names() -> Vec<&'static str> {
    TrajectoryKind::ALL.iter().map(|kind| kind.name()).collect()
}

/// Direction labels offered for `kind`.
pub fn direction_labels(kind: TrajectoryKind) -> Vec<&'static str> {
    kind.directions().iter().map(|d| d.label()).collect()
}

/// Return-mode labels for `kind`, or `None` when not applicable.
pub fn return_labels(kind: TrajectoryKind) -> Option<Vec<&'static str>> {
    kind.returns()
        .map(|modes| modes.iter().map(|mode| mode.label()).collect())
}

/// Resolves a picker index into the direction it displays.
pub fn direction_at(kind: TrajectoryKind, index: usize) -> Result<Direction> {
    kind.directions()
        .get(index)
        .copied()
        .ok_or(MotionError::DirectionIndexOutOfRange { kind, index })
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_every_trajectory() {
        assert_eq!(
            trajectory_names(),
            vec!["Circle", "Ellipse", "Spiral", "Pendulum", "Random"]
        );
    }

    #[test]
    fn lists_directions_per_kind() {
        assert_eq!(
            direction_labels(TrajectoryKind::Circle),
            vec!["Clockwise", "Counter Clockwise"]
        );
        assert_eq!(
            direction_labels(TrajectoryKind::Spiral),
            vec![
                "In, Clockwise",
                "In, Counter Clockwise",
                "Out, Clockwise",
                "Out, Counter Clockwise"
            ]
        );
        assert!(direction_labels(TrajectoryKind::Pendulum).is_empty());
        assert_eq!(
            direction_labels(TrajectoryKind::Random),
            vec!["Slow", "Mid", "Fast"]
        );
    }

    #[test]
    fn return_modes_are_not_applicable_to_unbounded_kinds() {
        assert_eq!(return_labels(TrajectoryKind::Circle), None);
        assert_eq!(return_labels(TrajectoryKind::Ellipse), None);
        assert_eq!(return_labels(TrajectoryKind::Random), None);
        assert_eq!(
            return_labels(TrajectoryKind::Pendulum),
            Some(vec!["One Way", "Return"])
        );
        assert_eq!(
            return_labels(TrajectoryKind::Spiral),
            Some(vec!["One Way", "Return"])
        );
    }

    #[test]
    fn indexes_resolve_within_kind() {
        assert_eq!(
            direction_at(TrajectoryKind::Random, 2).unwrap(),
            Direction::Fast
        );
        assert_eq!(
            direction_at(TrajectoryKind::Spiral, 1).unwrap(),
            Direction::InCounterClockwise
        );
        assert!(matches!(
            direction_at(TrajectoryKind::Circle, 2),
            Err(MotionError::DirectionIndexOutOfRange { index: 2, .. })
        ));
        assert!(direction_at(TrajectoryKind::Pendulum, 0).is_err());
    }

    #[test]
    fn parses_labels_loosely() {
        assert_eq!(
            "counter-clockwise".parse::<Direction>().unwrap(),
            Direction::CounterClockwise
        );
        assert!("out, ccw".parse::<Direction>().is_err());
        assert_eq!(
            "In Counter Clockwise".parse::<Direction>().unwrap(),
            Direction::InCounterClockwise
        );
        assert_eq!(
            "PENDULUM".parse::<TrajectoryKind>().unwrap(),
            TrajectoryKind::Pendulum
        );
        assert!("square".parse::<TrajectoryKind>().is_err());
    }

    #[test]
    fn speeds_match_directions() {
        assert_eq!(Direction::Slow.walk_speed(), Some(0.02));
        assert_eq!(Direction::Mid.walk_speed(), Some(0.06));
        assert_eq!(Direction::Fast.walk_speed(), Some(0.1));
        assert_eq!(Direction::Clockwise.walk_speed(), None);
    }
}
