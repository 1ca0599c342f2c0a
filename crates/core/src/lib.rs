//! Core library of the dome motion engine.
//!
//! Trajectories animate the position of a sound source on a speaker dome
//! using a small set of geometric patterns. They are driven once per
//! control-rate tick by the host integration layer, which they reach only
//! through the [`MotionHost`] trait. The factory and catalog run off the
//! real-time path and may allocate; [`Trajectory::process`] does not.

pub mod catalog;
pub mod config;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod host;
pub mod rng;
pub mod timeline;
pub mod trajectory;

pub use catalog::{
    direction_at, direction_labels, return_labels, trajectory_names, Direction, ReturnMode,
    TrajectoryKind,
};
pub use config::{AudioConfig, EngineConfig};
pub use error::{MotionError, Result};
pub use factory::{create, TrajectoryDescriptor};
pub use geometry::Point;
pub use host::{HostEvent, MemoryHost, MotionHost, ParameterId, SourceIndex, TransportInfo};
pub use rng::MersenneTwister;
pub use timeline::{BlockClock, Tick};
pub use trajectory::{Motion, Timing, Trajectory};
