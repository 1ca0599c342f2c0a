use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Direction, ReturnMode, TrajectoryKind},
    config::EngineConfig,
    geometry::Point,
    host::{MotionHost, SourceIndex},
    rng::MersenneTwister,
    trajectory::{Motion, Timing, Trajectory},
    MotionError, Result,
};

/// Everything needed to build a trajectory for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryDescriptor {
    pub kind: TrajectoryKind,
    /// Must belong to `kind.directions()`; `None` for kinds without any.
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub return_mode: ReturnMode,
    /// Length of one cycle, in seconds or in measures when synced.
    pub duration: f32,
    pub repeat_count: f32,
    #[serde(default)]
    pub sync_with_tempo: bool,
    pub source: SourceIndex,
    /// Physical target of pendulum and spiral motions.
    #[serde(default)]
    pub end_point: Option<Point>,
    /// Fixes the random-walk sequence; drawn from the system when absent.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl TrajectoryDescriptor {
    pub fn new(kind: TrajectoryKind, direction: Option<Direction>) -> Self {
        Self {
            kind,
            direction,
            return_mode: ReturnMode::OneWay,
            duration: 1.0,
            repeat_count: 1.0,
            sync_with_tempo: false,
            source: 0,
            end_point: None,
            seed: None,
        }
    }

    /// Checks the kind/direction/return/end-point combination.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind;
        match self.direction {
            Some(direction) if !kind.accepts(direction) => {
                return Err(MotionError::InvalidDirection { kind, direction })
            }
            None if !kind.directions().is_empty() => return Err(MotionError::MissingDirection(kind)),
            _ => {}
        }

        if kind.returns().is_none() && self.return_mode.is_round_trip() {
            return Err(MotionError::ReturnModeNotApplicable(kind));
        }

        if kind.needs_end_point() && self.end_point.is_none() {
            return Err(MotionError::MissingEndPoint(kind));
        }

        Ok(())
    }

    fn timing(&self) -> Timing {
        Timing {
            cycle_duration: self.duration,
            repeat_count: self.repeat_count,
            sync_with_tempo: self.sync_with_tempo,
        }
    }
}

/// Builds the trajectory a descriptor asks for.
///
/// Invalid combinations are refused instead of falling back to a default
/// direction. The source's current position is captured as the start point.
/// The engine configuration is checked too, since a zero clamp epsilon or
/// step quantum would leave the trajectory unable to advance.
pub fn create<H: MotionHost + ?Sized>(
    descriptor: &TrajectoryDescriptor,
    host: &mut H,
    config: &EngineConfig,
) -> Result<Trajectory> {
    config.validate()?;
    descriptor.validate()?;

    let motion = build_motion(descriptor, config)?;
    let trajectory = Trajectory::new(host, descriptor.source, descriptor.timing(), motion, config);

    tracing::debug!(
        kind = %descriptor.kind,
        source = descriptor.source,
        duration = trajectory.cycle_duration(),
        repeats = trajectory.repeat_count(),
        "trajectory created"
    );
    Ok(trajectory)
}

fn build_motion(descriptor: &TrajectoryDescriptor, config: &EngineConfig) -> Result<Motion> {
    let kind = descriptor.kind;
    let direction = || descriptor.direction.ok_or(MotionError::MissingDirection(kind));
    let end_point = || descriptor.end_point.ok_or(MotionError::MissingEndPoint(kind));

    let motion = match kind {
        TrajectoryKind::Circle => Motion::circle(direction()?.is_counter_clockwise()),
        TrajectoryKind::Ellipse => Motion::ellipse(direction()?.is_counter_clockwise()),
        TrajectoryKind::Pendulum => Motion::pendulum(end_point()?, descriptor.return_mode),
        TrajectoryKind::Spiral => Motion::spiral(end_point()?, direction()?, descriptor.return_mode),
        TrajectoryKind::Random => {
            let direction = direction()?;
            let speed = direction
                .walk_speed()
                .ok_or(MotionError::InvalidDirection { kind, direction })?;
            let rng = match descriptor.seed {
                Some(seed) => MersenneTwister::new(seed),
                None => MersenneTwister::from_entropy(),
            };
            Motion::random(direction, speed, config.random_step_seconds, rng)
        }
    };
    Ok(motion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn host() -> MemoryHost {
        MemoryHost::new(4, 150.0)
    }

    fn pendulum() -> TrajectoryDescriptor {
        TrajectoryDescriptor {
            end_point: Some(Point::new(10.0, 0.0)),
            ..TrajectoryDescriptor::new(TrajectoryKind::Pendulum, None)
        }
    }

    #[test]
    fn builds_every_kind() {
        let config = EngineConfig::default();
        for kind in TrajectoryKind::ALL {
            let descriptor = TrajectoryDescriptor {
                end_point: Some(Point::new(5.0, 5.0)),
                seed: Some(1),
                ..TrajectoryDescriptor::new(kind, kind.directions().first().copied())
            };
            let trajectory = create(&descriptor, &mut host(), &config).unwrap();
            assert_eq!(trajectory.kind(), kind);
            assert_eq!(trajectory.direction(), descriptor.direction);
        }
    }

    #[test]
    fn rejects_cross_kind_directions() {
        let descriptor = TrajectoryDescriptor {
            direction: Some(Direction::InCounterClockwise),
            ..pendulum()
        };
        let err = create(&descriptor, &mut host(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            MotionError::InvalidDirection {
                kind: TrajectoryKind::Pendulum,
                direction: Direction::InCounterClockwise
            }
        ));

        let circle = TrajectoryDescriptor::new(TrajectoryKind::Circle, Some(Direction::Fast));
        assert!(circle.validate().is_err());
    }

    #[test]
    fn requires_a_direction_where_offered() {
        let descriptor = TrajectoryDescriptor::new(TrajectoryKind::Random, None);
        assert!(matches!(
            descriptor.validate(),
            Err(MotionError::MissingDirection(TrajectoryKind::Random))
        ));
    }

    #[test]
    fn rejects_return_for_unbounded_kinds() {
        let descriptor = TrajectoryDescriptor {
            return_mode: ReturnMode::Return,
            ..TrajectoryDescriptor::new(TrajectoryKind::Circle, Some(Direction::Clockwise))
        };
        assert!(matches!(
            descriptor.validate(),
            Err(MotionError::ReturnModeNotApplicable(TrajectoryKind::Circle))
        ));
    }

    #[test]
    fn bounded_kinds_need_an_end_point() {
        let descriptor = TrajectoryDescriptor::new(TrajectoryKind::Spiral, Some(Direction::OutClockwise));
        assert!(matches!(
            descriptor.validate(),
            Err(MotionError::MissingEndPoint(TrajectoryKind::Spiral))
        ));
    }

    #[test]
    fn round_trip_is_kept() {
        let descriptor = TrajectoryDescriptor {
            return_mode: ReturnMode::Return,
            ..pendulum()
        };
        let trajectory = create(&descriptor, &mut host(), &EngineConfig::default()).unwrap();
        assert_eq!(trajectory.return_mode(), Some(ReturnMode::Return));
        assert_eq!(trajectory.end_point(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn creation_snapshots_locations() {
        let mut host = host();
        host.place(2, Point::new(-30.0, 60.0));
        let descriptor = TrajectoryDescriptor {
            source: 2,
            ..TrajectoryDescriptor::new(TrajectoryKind::Circle, Some(Direction::CounterClockwise))
        };

        let trajectory = create(&descriptor, &mut host, &EngineConfig::default()).unwrap();
        let start = trajectory.origin().start;
        assert!((start.x + 30.0).abs() < 1e-3);
        assert!((start.y - 60.0).abs() < 1e-3);
        assert_eq!(host.count(&crate::host::HostEvent::Snapshot), 1);
    }

    #[test]
    fn refuses_degenerate_engine_config() {
        let walk = TrajectoryDescriptor {
            seed: Some(7),
            ..TrajectoryDescriptor::new(TrajectoryKind::Random, Some(Direction::Slow))
        };
        let configs = [
            EngineConfig {
                random_step_seconds: 0.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                min_duration: 0.0,
                ..EngineConfig::default()
            },
        ];

        for config in configs {
            let mut host = host();
            let err = create(&walk, &mut host, &config).unwrap_err();
            assert!(matches!(err, MotionError::InvalidConfig(_)), "{err:?}");
            assert!(host.events().is_empty());
        }
    }

    #[test]
    fn descriptors_deserialize_with_defaults() {
        let descriptor: TrajectoryDescriptor = serde_json::from_str(
            r#"{ "kind": "Random", "direction": "Slow", "duration": 2.0, "repeat_count": 3.0, "source": 1 }"#,
        )
        .unwrap();
        assert_eq!(descriptor.return_mode, ReturnMode::OneWay);
        assert!(!descriptor.sync_with_tempo);
        assert!(descriptor.validate().is_ok());
    }
}
