use crate::{config::AudioConfig, host::TransportInfo};

/// Elapsed time handed to a trajectory for one control-rate tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    pub seconds: f32,
    pub beats: f32,
}

/// Turns fixed-size audio blocks into per-tick time deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockClock {
    block_seconds: f64,
    time_seconds: f64,
    time_beats: f64,
}

impl BlockClock {
    pub fn new(sample_rate: u32, block_size: usize) -> Self {
        Self {
            block_seconds: block_size as f64 / f64::from(sample_rate.max(1)),
            time_seconds: 0.0,
            time_beats: 0.0,
        }
    }

    pub fn from_config(audio: &AudioConfig) -> Self {
        Self::new(audio.sample_rate, audio.block_size)
    }

    pub fn block_seconds(&self) -> f64 {
        self.block_seconds
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub fn time_beats(&self) -> f64 {
        self.time_beats
    }

    pub fn reset(&mut self) {
        self.time_seconds = 0.0;
        self.time_beats = 0.0;
    }

    /// Advances by one block at the transport's current tempo.
    pub fn advance(&mut self, transport: &TransportInfo) -> Tick {
        let beats = transport.beats_in(self.block_seconds);
        self.time_seconds += self.block_seconds;
        self.time_beats += beats;
        Tick {
            seconds: self.block_seconds as f32,
            beats: beats as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_length_follows_sample_rate() {
        let clock = BlockClock::new(48_000, 480);
        assert!((clock.block_seconds() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn accumulates_seconds_and_beats() {
        let mut clock = BlockClock::new(1_000, 500);
        let transport = TransportInfo {
            bpm: 120.0,
            ..TransportInfo::default()
        };

        let tick = clock.advance(&transport);
        assert_eq!(tick.seconds, 0.5);
        assert_eq!(tick.beats, 1.0);

        clock.advance(&transport);
        assert!((clock.time_seconds() - 1.0).abs() < 1e-12);
        assert!((clock.time_beats() - 2.0).abs() < 1e-12);

        clock.reset();
        assert_eq!(clock.time_seconds(), 0.0);
    }
}
