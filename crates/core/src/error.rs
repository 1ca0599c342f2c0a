use crate::catalog::{Direction, TrajectoryKind};

/// Result alias that carries the custom [`MotionError`] type.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Common error type for the core crate.
///
/// Only configuration problems surface here. Degenerate durations, late
/// ticks and out-of-range random steps are absorbed by the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// The direction is not part of the subset offered for the kind.
    #[error("direction `{direction}` is not valid for {kind} trajectories")]
    InvalidDirection {
        kind: TrajectoryKind,
        direction: Direction,
    },
    /// The kind needs a direction but none was selected.
    #[error("{0} trajectories require a direction")]
    MissingDirection(TrajectoryKind),
    /// A UI index does not address any direction of the kind.
    #[error("direction index {index} is out of range for {kind} trajectories")]
    DirectionIndexOutOfRange { kind: TrajectoryKind, index: usize },
    /// A round trip was requested for a kind with no return concept.
    #[error("{0} trajectories have no return mode")]
    ReturnModeNotApplicable(TrajectoryKind),
    /// Pendulum and spiral motions need a target point.
    #[error("{0} trajectories require an end point")]
    MissingEndPoint(TrajectoryKind),
    /// A textual name did not match any catalog entry.
    #[error("unknown catalog name `{0}`")]
    UnknownName(String),
    /// Engine configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around configuration parse errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MotionError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for MotionError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MotionError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
