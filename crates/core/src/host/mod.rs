//! Narrow interface between the motion engine and whatever hosts it.
//!
//! Trajectories never own the parameter store. Every operation that touches
//! the outside world receives a `&mut impl MotionHost`, which keeps the engine
//! testable against [`MemoryHost`] with no plugin host present.

use serde::{Deserialize, Serialize};

use crate::geometry::{normalized_to_physical, physical_to_normalized, Point};

/// Number of automatable parameters owned by each source.
pub const PARAMETERS_PER_SOURCE: usize = 5;

/// Index of a sound source on the dome.
pub type SourceIndex = usize;

/// Identifier of an automatable host parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(pub usize);

impl ParameterId {
    /// X (or azimuth) parameter of `source`.
    pub const fn x(source: SourceIndex) -> Self {
        Self(source * PARAMETERS_PER_SOURCE)
    }

    /// Y (or elevation) parameter of `source`.
    pub const fn y(source: SourceIndex) -> Self {
        Self(source * PARAMETERS_PER_SOURCE + 1)
    }
}

/// Snapshot of the host transport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportInfo {
    pub bpm: f64,
    pub time_signature_numerator: u32,
    pub time_signature_denominator: u32,
    pub is_playing: bool,
}

impl Default for TransportInfo {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            time_signature_numerator: 4,
            time_signature_denominator: 4,
            is_playing: false,
        }
    }
}

impl TransportInfo {
    /// Length of one measure in seconds, or `None` when the transport
    /// reports a tempo or signature that cannot describe a measure.
    pub fn measure_seconds(&self) -> Option<f64> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) || self.time_signature_denominator == 0 {
            return None;
        }
        let quarter_notes = 4.0 / f64::from(self.time_signature_denominator);
        Some(f64::from(self.time_signature_numerator) * quarter_notes * 60.0 / self.bpm)
    }

    /// Beats elapsed over `seconds` at the current tempo.
    pub fn beats_in(&self, seconds: f64) -> f64 {
        if self.bpm.is_finite() && self.bpm > 0.0 {
            seconds * self.bpm / 60.0
        } else {
            0.0
        }
    }
}

/// Capabilities the engine needs from the host integration layer.
pub trait MotionHost {
    /// Current value of a parameter, normalized to `[0, 1]`.
    fn normalized_parameter(&self, parameter: ParameterId) -> f32;

    /// Applies an automated move of `source` to a physical position.
    fn move_source(&mut self, source: SourceIndex, x: f32, y: f32);

    fn begin_gesture(&mut self, parameter: ParameterId);

    fn end_gesture(&mut self, parameter: ParameterId);

    fn transport(&self) -> TransportInfo;

    fn set_recording_automation(&mut self, recording: bool);

    fn request_ui_refresh(&mut self);

    /// Remembers every source position so it can be restored later.
    fn snapshot_locations(&mut self);

    fn restore_locations(&mut self);

    /// Normalized X/Y of a source.
    fn normalized_position(&self, source: SourceIndex) -> (f32, f32) {
        (
            self.normalized_parameter(ParameterId::x(source)),
            self.normalized_parameter(ParameterId::y(source)),
        )
    }
}

/// Side effect recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Move { source: SourceIndex, x: f32, y: f32 },
    BeginGesture(ParameterId),
    EndGesture(ParameterId),
    RecordingAutomation(bool),
    UiRefresh,
    Snapshot,
    Restore,
}

/// In-memory parameter store that logs everything a trajectory does to it.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    radius: f32,
    positions: Vec<Point>,
    saved: Vec<Point>,
    transport: TransportInfo,
    recording: bool,
    events: Vec<HostEvent>,
}

impl MemoryHost {
    /// Creates a store with `sources` sources parked at the origin.
    pub fn new(sources: usize, radius: f32) -> Self {
        Self {
            radius,
            positions: vec![Point::default(); sources],
            saved: Vec::new(),
            transport: TransportInfo::default(),
            recording: false,
            events: Vec::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Places a source without recording an event.
    pub fn place(&mut self, source: SourceIndex, point: Point) {
        if let Some(slot) = self.positions.get_mut(source) {
            *slot = point;
        }
    }

    /// Physical position of a source; the origin for unknown sources.
    pub fn position(&self, source: SourceIndex) -> Point {
        self.positions.get(source).copied().unwrap_or_default()
    }

    pub fn set_transport(&mut self, transport: TransportInfo) {
        self.transport = transport;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Positions written by moves, in order.
    pub fn moves(&self) -> impl Iterator<Item = Point> + '_ {
        self.events.iter().filter_map(|event| match event {
            HostEvent::Move { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        })
    }

    /// Most recent position written by a move.
    pub fn last_move(&self) -> Option<Point> {
        self.moves().last()
    }

    /// Number of recorded events equal to `event`.
    pub fn count(&self, event: &HostEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl MotionHost for MemoryHost {
    fn normalized_parameter(&self, parameter: ParameterId) -> f32 {
        let source = parameter.0 / PARAMETERS_PER_SOURCE;
        let point = self.position(source);
        match parameter.0 % PARAMETERS_PER_SOURCE {
            0 => physical_to_normalized(point.x, self.radius),
            1 => physical_to_normalized(point.y, self.radius),
            _ => 0.0,
        }
    }

    fn move_source(&mut self, source: SourceIndex, x: f32, y: f32) {
        self.place(source, Point::new(x, y));
        self.events.push(HostEvent::Move { source, x, y });
    }

    fn begin_gesture(&mut self, parameter: ParameterId) {
        self.events.push(HostEvent::BeginGesture(parameter));
    }

    fn end_gesture(&mut self, parameter: ParameterId) {
        self.events.push(HostEvent::EndGesture(parameter));
    }

    fn transport(&self) -> TransportInfo {
        self.transport
    }

    fn set_recording_automation(&mut self, recording: bool) {
        self.recording = recording;
        self.events.push(HostEvent::RecordingAutomation(recording));
    }

    fn request_ui_refresh(&mut self) {
        self.events.push(HostEvent::UiRefresh);
    }

    fn snapshot_locations(&mut self) {
        self.saved = self.positions.clone();
        self.events.push(HostEvent::Snapshot);
    }

    fn restore_locations(&mut self) {
        if self.saved.len() == self.positions.len() {
            self.positions.copy_from_slice(&self.saved);
        }
        self.events.push(HostEvent::Restore);
    }
}

/// Physical position of `source` as the host currently reports it.
pub fn physical_position<H: MotionHost + ?Sized>(host: &H, source: SourceIndex, radius: f32) -> Point {
    let (x, y) = host.normalized_position(source);
    Point::new(
        normalized_to_physical(x, radius),
        normalized_to_physical(y, radius),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_ids_are_grouped_per_source() {
        assert_eq!(ParameterId::x(0), ParameterId(0));
        assert_eq!(ParameterId::y(0), ParameterId(1));
        assert_eq!(ParameterId::x(3), ParameterId(15));
        assert_eq!(ParameterId::y(3), ParameterId(16));
    }

    #[test]
    fn measure_length_uses_time_signature() {
        let transport = TransportInfo {
            bpm: 120.0,
            time_signature_numerator: 6,
            time_signature_denominator: 8,
            is_playing: true,
        };
        let seconds = transport.measure_seconds().unwrap();
        assert!((seconds - 1.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_transport_has_no_measure() {
        let silent = TransportInfo {
            bpm: 0.0,
            ..TransportInfo::default()
        };
        assert!(silent.measure_seconds().is_none());
        assert_eq!(silent.beats_in(1.0), 0.0);

        let broken = TransportInfo {
            time_signature_denominator: 0,
            ..TransportInfo::default()
        };
        assert!(broken.measure_seconds().is_none());
    }

    #[test]
    fn memory_host_reports_normalized_positions() {
        let mut host = MemoryHost::new(2, 100.0);
        host.move_source(1, 50.0, -100.0);

        let (x, y) = host.normalized_position(1);
        assert!((x - 0.75).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert_eq!(host.normalized_position(0), (0.5, 0.5));

        let point = physical_position(&host, 1, 100.0);
        assert!((point.x - 50.0).abs() < 1e-4);
        assert!((point.y + 100.0).abs() < 1e-4);
    }

    #[test]
    fn restore_returns_to_snapshot() {
        let mut host = MemoryHost::new(1, 10.0);
        host.place(0, Point::new(1.0, 2.0));
        host.snapshot_locations();
        host.move_source(0, 5.0, 5.0);
        host.restore_locations();

        assert_eq!(host.position(0), Point::new(1.0, 2.0));
        assert_eq!(host.count(&HostEvent::Restore), 1);
        assert_eq!(host.last_move(), Some(Point::new(5.0, 5.0)));
    }
}
