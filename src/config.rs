//! Startup parameters
//!
//! Four required numbers, no defaults: zombies per wave, humans per wave,
//! wave interval (seconds) and the infection-to-zombie probability. The
//! probability also drives the chance that a spawned human is already a
//! carrier. Invalid values are a startup failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("wave interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f32),
    #[error("conversion probability must be within [0, 1], got {0}")]
    InvalidProbability(f32),
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Zombies spawned per wave
    pub zombies_per_wave: u32,
    /// Humans spawned per wave
    pub humans_per_wave: u32,
    /// Seconds between waves
    pub wave_interval: f32,
    /// Infected -> Zombie chance per wave (and carrier chance at spawn)
    pub conversion_probability: f32,
}

impl SimConfig {
    /// Build and validate a configuration
    pub fn new(
        zombies_per_wave: u32,
        humans_per_wave: u32,
        wave_interval: f32,
        conversion_probability: f32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            zombies_per_wave,
            humans_per_wave,
            wave_interval,
            conversion_probability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wave_interval.is_finite() || self.wave_interval <= 0.0 {
            return Err(ConfigError::InvalidInterval(self.wave_interval));
        }
        if !(0.0..=1.0).contains(&self.conversion_probability) {
            // NaN fails `contains` too
            return Err(ConfigError::InvalidProbability(self.conversion_probability));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = SimConfig::new(3, 10, 2.5, 0.25).unwrap();
        assert_eq!(config.zombies_per_wave, 3);
        assert_eq!(config.humans_per_wave, 10);
        assert!(SimConfig::new(0, 0, 0.1, 0.0).is_ok());
        assert!(SimConfig::new(0, 0, 0.1, 1.0).is_ok());
    }

    #[test]
    fn test_rejects_bad_interval() {
        assert_eq!(SimConfig::new(1, 1, 0.0, 0.5), Err(ConfigError::InvalidInterval(0.0)));
        assert!(SimConfig::new(1, 1, -2.0, 0.5).is_err());
        assert!(SimConfig::new(1, 1, f32::INFINITY, 0.5).is_err());
        assert!(SimConfig::new(1, 1, f32::NAN, 0.5).is_err());
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert_eq!(SimConfig::new(1, 1, 1.0, 1.5), Err(ConfigError::InvalidProbability(1.5)));
        assert!(SimConfig::new(1, 1, 1.0, -0.1).is_err());
        assert!(SimConfig::new(1, 1, 1.0, f32::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = SimConfig::new(1, 1, 1.0, 2.0).unwrap_err();
        assert_eq!(err.to_string(), "conversion probability must be within [0, 1], got 2");
    }
}
