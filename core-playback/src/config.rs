//! # Controller Configuration
//!
//! Timing and retry settings for [`PlaybackController`](crate::PlaybackController).

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback controller configuration.
///
/// Every field has a serde default, so hosts can deserialize partial
/// settings (e.g. `{"max_retries": 5}`) from their own config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// How long a play attempt may stay in `Loading` before the controller
    /// reports a timeout and offers force play.
    ///
    /// Default: 10 seconds.
    #[serde(default = "default_loading_timeout")]
    pub loading_timeout: Duration,

    /// Delay for the secondary play timer.
    ///
    /// The slot is reserved: it is cancelled alongside the loading timer but
    /// no transition arms it yet.
    ///
    /// Default: 3 seconds.
    #[serde(default = "default_force_play_delay")]
    pub force_play_delay: Duration,

    /// Failed play gestures tolerated before the next gesture is forced.
    ///
    /// Default: 3.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Volume applied when the controller is created.
    ///
    /// Default: 1.0.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            loading_timeout: default_loading_timeout(),
            force_play_delay: default_force_play_delay(),
            max_retries: default_max_retries(),
            initial_volume: default_initial_volume(),
        }
    }
}

impl ControllerConfig {
    /// Configuration for hosts on slow or metered connections.
    ///
    /// - Longer loading window (30s)
    /// - Force play after two failures
    pub fn slow_network() -> Self {
        Self {
            loading_timeout: Duration::from_secs(30),
            max_retries: 2,
            ..Default::default()
        }
    }

    /// Override the loading timeout.
    pub fn with_loading_timeout(mut self, timeout: Duration) -> Self {
        self.loading_timeout = timeout;
        self
    }

    /// Override the retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the initial volume.
    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.loading_timeout.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "loading_timeout must be > 0".to_string(),
            ));
        }

        if self.force_play_delay.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "force_play_delay must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(PlaybackError::InvalidConfig(
                "initial_volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_loading_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_force_play_delay() -> Duration {
    Duration::from_secs(3)
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_volume() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.loading_timeout, Duration::from_secs(10));
        assert_eq!(config.force_play_delay, Duration::from_secs(3));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_volume, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slow_network_preset() {
        let config = ControllerConfig::slow_network();
        assert_eq!(config.loading_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_timeout = ControllerConfig::default().with_loading_timeout(Duration::ZERO);
        assert!(matches!(
            zero_timeout.validate(),
            Err(PlaybackError::InvalidConfig(_))
        ));

        let loud = ControllerConfig::default().with_initial_volume(1.5);
        assert!(loud.validate().is_err());

        let nan = ControllerConfig::default().with_initial_volume(f32::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: ControllerConfig = serde_json::from_str(r#"{"max_retries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.loading_timeout, Duration::from_secs(10));
        assert_eq!(config.initial_volume, 1.0);
    }
}
