//! Shared timing state and lifecycle of a running trajectory.
//!
//! A trajectory is created idle, starts lazily on its first
//! [`Trajectory::process`] call and stops for good once its total duration
//! has elapsed or [`Trajectory::stop`] is called. Stopped trajectories are
//! inert; run a new instance to move the source again.

mod motion;

pub use motion::{Motion, Origin, Progress, RandomWalk, Sweep, Target};

use crate::{
    catalog::{Direction, ReturnMode, TrajectoryKind},
    config::EngineConfig,
    geometry::{azimuth_elevation_to_xy, xy_to_azimuth01, xy_to_elevation01, Point},
    host::{physical_position, MotionHost, ParameterId, SourceIndex},
};

/// Duration settings of a trajectory, in seconds or in tempo units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub cycle_duration: f32,
    pub repeat_count: f32,
    pub sync_with_tempo: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            cycle_duration: 1.0,
            repeat_count: 1.0,
            sync_with_tempo: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trajectory {
    source: SourceIndex,
    radius: f32,
    min_duration: f32,
    cycle_duration: f32,
    repeat_count: f32,
    total_duration: f32,
    sync_with_tempo: bool,
    elapsed: f32,
    unit_seconds: f64,
    origin: Origin,
    started: bool,
    stopped: bool,
    motion: Motion,
}

impl Trajectory {
    /// Snapshots the source's current position as the motion's reference
    /// frame and asks the host to remember every location for [`Trajectory::stop`].
    pub fn new<H: MotionHost + ?Sized>(
        host: &mut H,
        source: SourceIndex,
        timing: Timing,
        motion: Motion,
        config: &EngineConfig,
    ) -> Self {
        let radius = config.dome_radius;
        let start = physical_position(&*host, source, radius);
        let origin = Origin {
            start,
            azimuth01: xy_to_azimuth01(start),
            elevation01: xy_to_elevation01(start, radius),
        };
        host.snapshot_locations();

        let min_duration = config.min_duration;
        let cycle_duration = clamp_duration(timing.cycle_duration, min_duration);
        let repeat_count = clamp_duration(timing.repeat_count, min_duration);

        Self {
            source,
            radius,
            min_duration,
            cycle_duration,
            repeat_count,
            total_duration: cycle_duration * repeat_count,
            sync_with_tempo: timing.sync_with_tempo,
            elapsed: 0.0,
            unit_seconds: 1.0,
            origin,
            started: false,
            stopped: false,
            motion,
        }
    }

    pub fn kind(&self) -> TrajectoryKind {
        self.motion.kind()
    }

    pub fn source(&self) -> SourceIndex {
        self.source
    }

    pub fn direction(&self) -> Option<Direction> {
        self.motion.direction()
    }

    pub fn return_mode(&self) -> Option<ReturnMode> {
        self.motion.return_mode()
    }

    pub fn end_point(&self) -> Option<Point> {
        self.motion.end_point()
    }

    pub fn cycle_duration(&self) -> f32 {
        self.cycle_duration
    }

    pub fn repeat_count(&self) -> f32 {
        self.repeat_count
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn sync_with_tempo(&self) -> bool {
        self.sync_with_tempo
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_cycle_duration(&mut self, duration: f32) {
        self.cycle_duration = clamp_duration(duration, self.min_duration);
        self.update_total();
    }

    pub fn set_repeat_count(&mut self, count: f32) {
        self.repeat_count = clamp_duration(count, self.min_duration);
        self.update_total();
    }

    /// Fraction of the total duration already travelled.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.total_duration).clamp(0.0, 1.0)
    }

    /// Wall-clock length of the whole run. Tempo-synced trajectories count
    /// in measures, so this is only known once the transport was read at start.
    pub fn total_seconds(&self) -> f64 {
        f64::from(self.total_duration) * self.unit_seconds
    }

    /// Reads the transport and opens the automation gestures on the
    /// source's position parameters.
    pub fn start<H: MotionHost + ?Sized>(&mut self, host: &mut H) {
        if self.started {
            return;
        }

        self.motion.init(&self.origin);
        self.started = true;
        self.elapsed = 0.0;

        let transport = host.transport();
        self.unit_seconds = if self.sync_with_tempo {
            match transport.measure_seconds() {
                Some(seconds) => seconds,
                None => {
                    tracing::warn!(
                        bpm = transport.bpm,
                        denominator = transport.time_signature_denominator,
                        "transport cannot describe a measure, counting in seconds"
                    );
                    1.0
                }
            }
        } else {
            1.0
        };

        host.set_recording_automation(true);
        host.begin_gesture(ParameterId::x(self.source));
        host.begin_gesture(ParameterId::y(self.source));

        tracing::debug!(
            kind = %self.kind(),
            source = self.source,
            total = self.total_duration,
            sync = self.sync_with_tempo,
            "trajectory started"
        );
    }

    /// Advances the trajectory by one control-rate tick.
    ///
    /// Progress accrues in `beats` when synced with tempo and in `seconds`
    /// otherwise. Returns `true` on the tick that reaches the total duration
    /// and on every call after that.
    pub fn process<H: MotionHost + ?Sized>(&mut self, host: &mut H, seconds: f32, beats: f32) -> bool {
        if self.stopped {
            return true;
        }
        if !self.started {
            self.start(host);
        }

        let delta = (if self.sync_with_tempo { beats } else { seconds }).max(0.0);
        let before = self.elapsed;
        self.elapsed = (before + delta).min(self.total_duration);
        let finished = self.elapsed >= self.total_duration;

        // wall time past the end of the run is not walked
        let mut seconds = seconds.max(0.0);
        let applied = self.elapsed - before;
        if delta > 0.0 && applied < delta {
            seconds *= applied / delta;
        }

        self.tick(host, seconds, finished);

        if finished {
            self.stop(host);
        }
        finished
    }

    /// Ends the run and puts every source back where it was when the
    /// trajectory was created. Redundant calls are ignored.
    pub fn stop<H: MotionHost + ?Sized>(&mut self, host: &mut H) {
        if !self.started || self.stopped {
            return;
        }
        self.stopped = true;

        host.end_gesture(ParameterId::x(self.source));
        host.end_gesture(ParameterId::y(self.source));
        host.set_recording_automation(false);
        host.restore_locations();

        self.motion.reset();

        host.request_ui_refresh();

        tracing::debug!(
            kind = %self.kind(),
            source = self.source,
            progress = self.progress(),
            "trajectory stopped"
        );
    }

    fn tick<H: MotionHost + ?Sized>(&mut self, host: &mut H, seconds: f32, finished: bool) {
        let turns = self.elapsed / self.cycle_duration;
        let mut phase = turns.fract();
        if finished && phase == 0.0 && turns > 0.0 {
            phase = 1.0;
        }

        match self.motion.position(&self.origin, Progress { turns, phase }) {
            Some(target) => self.move_to(host, target),
            None => self.motion.walk(host, self.source, self.radius, seconds),
        }
    }

    fn move_to<H: MotionHost + ?Sized>(&self, host: &mut H, target: Target) {
        let point = match target {
            Target::Spherical {
                azimuth01,
                elevation01,
            } => azimuth_elevation_to_xy(azimuth01, elevation01, self.radius),
            Target::Planar(point) => point,
        };
        host.move_source(self.source, point.x, point.y);
    }

    fn update_total(&mut self) {
        self.total_duration = self.cycle_duration * self.repeat_count;
        self.elapsed = self.elapsed.min(self.total_duration);
    }
}

fn clamp_duration(value: f32, min: f32) -> f32 {
    if value.is_nan() || value < min {
        min
    } else {
        value
    }
}
