use std::f32::consts::PI;

use rand::Rng;

use crate::{
    catalog::{Direction, ReturnMode, TrajectoryKind},
    geometry::{normalized_to_physical, wrap_unit, LinearPath, Point},
    host::{MotionHost, SourceIndex},
    rng::MersenneTwister,
};

/// Reference frame captured from the source when a trajectory is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub start: Point,
    pub azimuth01: f32,
    pub elevation01: f32,
}

/// Where a trajectory sits within its cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Cycles completed, fractional part included.
    pub turns: f32,
    /// Position inside the current cycle, in `[0, 1]`.
    pub phase: f32,
}

/// Position a motion wants the source moved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Spherical { azimuth01: f32, elevation01: f32 },
    Planar(Point),
}

/// Straight-line motion between the start and an end point.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    end: Point,
    round_trip: bool,
    path: Option<LinearPath>,
}

impl Sweep {
    fn new(end: Point, round_trip: bool) -> Self {
        Self {
            end,
            round_trip,
            path: None,
        }
    }

    fn along(&self, origin: &Origin, amount: f32) -> Point {
        match &self.path {
            Some(path) => path.at(amount),
            None => origin.start,
        }
    }
}

/// Most steps a single tick may take; older backlog is dropped.
pub(crate) const MAX_STEPS_PER_TICK: usize = 1024;

/// Stochastic walk stepping at a fixed interval regardless of block size.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    rng: Box<MersenneTwister>,
    clock: f64,
    speed: f32,
    quantum: f64,
    direction: Direction,
}

impl RandomWalk {
    fn run<H: MotionHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: SourceIndex,
        radius: f32,
        seconds: f32,
    ) {
        self.clock += f64::from(seconds);

        let mut steps = 0;
        while self.clock > self.quantum {
            if steps == MAX_STEPS_PER_TICK {
                self.clock %= self.quantum;
                break;
            }
            self.clock -= self.quantum;
            steps += 1;

            let r1: f32 = self.rng.gen();
            let r2: f32 = self.rng.gen();
            let (x01, y01) = host.normalized_position(source);

            // clamped after remapping, so steps past the rim pile up on it
            let x = normalized_to_physical(x01 + (r1 - 0.5) * self.speed, radius)
                .clamp(-radius, radius);
            let y = normalized_to_physical(y01 + (r2 - 0.5) * self.speed, radius)
                .clamp(-radius, radius);

            host.move_source(source, x, y);
        }
    }
}

/// Per-variant state of a trajectory.
#[derive(Debug, Clone)]
pub enum Motion {
    Circle {
        counter_clockwise: bool,
    },
    Ellipse {
        counter_clockwise: bool,
    },
    Pendulum(Sweep),
    /// Linear sweep towards a target pushed twice as far as the end point.
    Spiral {
        sweep: Sweep,
        counter_clockwise: bool,
        inward: bool,
    },
    Random(RandomWalk),
}

impl Motion {
    pub fn circle(counter_clockwise: bool) -> Self {
        Motion::Circle { counter_clockwise }
    }

    pub fn ellipse(counter_clockwise: bool) -> Self {
        Motion::Ellipse { counter_clockwise }
    }

    pub fn pendulum(end: Point, return_mode: ReturnMode) -> Self {
        Motion::Pendulum(Sweep::new(end, return_mode.is_round_trip()))
    }

    pub fn spiral(end: Point, direction: Direction, return_mode: ReturnMode) -> Self {
        Motion::Spiral {
            sweep: Sweep::new(end, return_mode.is_round_trip()),
            counter_clockwise: direction.is_counter_clockwise(),
            inward: direction.is_inward(),
        }
    }

    /// Random walk stepping every `quantum` seconds by at most `speed / 2`
    /// normalized units per axis.
    pub fn random(direction: Direction, speed: f32, quantum: f32, rng: MersenneTwister) -> Self {
        Motion::Random(RandomWalk {
            rng: Box::new(rng),
            clock: 0.0,
            speed,
            quantum: f64::from(quantum),
            direction,
        })
    }

    pub fn kind(&self) -> TrajectoryKind {
        match self {
            Motion::Circle { .. } => TrajectoryKind::Circle,
            Motion::Ellipse { .. } => TrajectoryKind::Ellipse,
            Motion::Pendulum(_) => TrajectoryKind::Pendulum,
            Motion::Spiral { .. } => TrajectoryKind::Spiral,
            Motion::Random(_) => TrajectoryKind::Random,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Motion::Circle { counter_clockwise } | Motion::Ellipse { counter_clockwise } => {
                Some(if *counter_clockwise {
                    Direction::CounterClockwise
                } else {
                    Direction::Clockwise
                })
            }
            Motion::Pendulum(_) => None,
            Motion::Spiral {
                counter_clockwise,
                inward,
                ..
            } => Some(match (*inward, *counter_clockwise) {
                (true, false) => Direction::InClockwise,
                (true, true) => Direction::InCounterClockwise,
                (false, false) => Direction::OutClockwise,
                (false, true) => Direction::OutCounterClockwise,
            }),
            Motion::Random(walk) => Some(walk.direction),
        }
    }

    /// Return mode for bounded motions, `None` where it does not apply.
    pub fn return_mode(&self) -> Option<ReturnMode> {
        match self {
            Motion::Pendulum(sweep) | Motion::Spiral { sweep, .. } => Some(if sweep.round_trip {
                ReturnMode::Return
            } else {
                ReturnMode::OneWay
            }),
            _ => None,
        }
    }

    pub fn end_point(&self) -> Option<Point> {
        match self {
            Motion::Pendulum(sweep) | Motion::Spiral { sweep, .. } => Some(sweep.end),
            _ => None,
        }
    }

    /// One-time setup run when the trajectory starts.
    pub(crate) fn init(&mut self, origin: &Origin) {
        match self {
            Motion::Pendulum(sweep) => {
                sweep.path = Some(LinearPath::new(origin.start, sweep.end));
            }
            Motion::Spiral { sweep, .. } => {
                sweep.path = Some(LinearPath::extended(origin.start, sweep.end));
            }
            _ => {}
        }
    }

    /// Clears per-run state once the trajectory stops.
    pub(crate) fn reset(&mut self) {
        if let Motion::Random(walk) = self {
            walk.clock = 0.0;
        }
    }

    /// Position for the deterministic motions. The random walk moves the
    /// source itself through [`Motion::walk`] and yields `None`.
    pub(crate) fn position(&self, origin: &Origin, progress: Progress) -> Option<Target> {
        match self {
            Motion::Circle { counter_clockwise } => Some(Target::Spherical {
                azimuth01: orbit(origin, progress.turns, *counter_clockwise),
                elevation01: origin.elevation01,
            }),
            Motion::Ellipse { counter_clockwise } => {
                let bulge = (1.0 - origin.elevation01) / 2.0 * (progress.phase * 2.0 * PI).sin().abs();
                Some(Target::Spherical {
                    azimuth01: orbit(origin, progress.turns, *counter_clockwise),
                    elevation01: origin.elevation01 + bulge,
                })
            }
            Motion::Pendulum(sweep) => {
                let swings = if sweep.round_trip { 2.0 } else { 1.0 };
                let eased = (1.0 - (progress.phase * swings * PI).cos()) / 2.0;
                Some(Target::Planar(sweep.along(origin, eased)))
            }
            Motion::Spiral { sweep, .. } => Some(Target::Planar(sweep.along(origin, progress.phase))),
            Motion::Random(_) => None,
        }
    }

    /// Advances the random walk's own clock, stepping as many times as the
    /// elapsed seconds allow. No-op for the other motions.
    pub(crate) fn walk<H: MotionHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: SourceIndex,
        radius: f32,
        seconds: f32,
    ) {
        if let Motion::Random(walk) = self {
            walk.run(host, source, radius, seconds);
        }
    }
}

fn orbit(origin: &Origin, turns: f32, counter_clockwise: bool) -> f32 {
    let turns = if counter_clockwise { turns } else { -turns };
    wrap_unit(origin.azimuth01 + turns)
}
