use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MotionError, Result};

/// Settings threaded into every trajectory the factory builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Half-extent of the dome; X and Y span `[-dome_radius, dome_radius]`.
    pub dome_radius: f32,
    /// Floor applied to cycle durations and repeat counts.
    pub min_duration: f32,
    /// Interval between random-walk steps, in seconds.
    pub random_step_seconds: f32,
    pub audio: AudioConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dome_radius: 150.0,
            min_duration: 0.0001,
            random_step_seconds: 0.01,
            audio: AudioConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration. Missing fields fall back
    /// to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("dome_radius", self.dome_radius)?;
        check_positive("min_duration", self.min_duration)?;
        check_positive("random_step_seconds", self.random_step_seconds)?;
        self.audio.validate()
    }
}

/// Block timing of the audio callback driving the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub block_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 1024,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(MotionError::InvalidConfig(
                "sample_rate must be greater than zero".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(MotionError::InvalidConfig(
                "block_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
