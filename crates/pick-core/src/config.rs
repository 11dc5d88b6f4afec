//! Picker configuration and `--name=value` argument parsing.

use crate::{DEFAULT_CAPTURE_RATIO, DEFAULT_REFRESH_FREQUENCY, GRID_CELLS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors, fatal before a session starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("refresh frequency must be positive")]
    ZeroRefreshFrequency,
    #[error("capture ratio must be at least 1")]
    ZeroCaptureRatio,
    #[error("capture bounds must be positive, got {width}x{height}")]
    EmptyBounds { width: u32, height: u32 },
}

/// Configuration for one picker session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Scheduler tick frequency in Hz.
    pub refresh_frequency: u32,
    /// Scheduler ticks per screen capture (1 = capture on every tick).
    pub capture_ratio: u32,
    /// Capture region width in pixels.
    pub bound_width: u32,
    /// Capture region height in pixels.
    pub bound_height: u32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            refresh_frequency: DEFAULT_REFRESH_FREQUENCY,
            capture_ratio: DEFAULT_CAPTURE_RATIO,
            bound_width: GRID_CELLS,
            bound_height: GRID_CELLS,
        }
    }
}

impl PickerConfig {
    /// Build a configuration from `--name=value` command line arguments,
    /// falling back to defaults for anything absent or unparsable.
    pub fn from_args(args: &[String]) -> Self {
        let defaults = Self::default();
        Self {
            refresh_frequency: arg_value(args, "--refresh-frequency=")
                .unwrap_or(defaults.refresh_frequency),
            capture_ratio: arg_value(args, "--capture-ratio=").unwrap_or(defaults.capture_ratio),
            bound_width: arg_value(args, "--bound-width=").unwrap_or(defaults.bound_width),
            bound_height: arg_value(args, "--bound-height=").unwrap_or(defaults.bound_height),
        }
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_frequency == 0 {
            return Err(ConfigError::ZeroRefreshFrequency);
        }
        if self.capture_ratio == 0 {
            return Err(ConfigError::ZeroCaptureRatio);
        }
        if self.bound_width == 0 || self.bound_height == 0 {
            return Err(ConfigError::EmptyBounds {
                width: self.bound_width,
                height: self.bound_height,
            });
        }
        Ok(())
    }

    /// Fixed scheduler tick period, `1 / refresh_frequency`.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_frequency.max(1) as f64)
    }
}

/// Extract the value of a `--name=value` style argument by prefix match.
///
/// The last occurrence wins; a value that fails to parse counts as absent.
pub fn arg_value<T: FromStr>(args: &[String], prefix: &str) -> Option<T> {
    args.iter()
        .rev()
        .find_map(|arg| arg.strip_prefix(prefix).and_then(|v| v.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = PickerConfig::default();
        assert_eq!(config.refresh_frequency, 144);
        assert_eq!(config.capture_ratio, 1);
        assert_eq!(config.bound_width, 17);
        assert_eq!(config.bound_height, 17);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_arg_value_prefix_match() {
        let args = args(&["--mode=0", "--capture-ratio=3", "--time=9"]);
        assert_eq!(arg_value::<u32>(&args, "--capture-ratio="), Some(3));
        assert_eq!(arg_value::<i32>(&args, "--mode="), Some(0));
        assert_eq!(arg_value::<u32>(&args, "--missing="), None);
    }

    #[test]
    fn test_arg_value_last_occurrence_wins() {
        let args = args(&["--capture-ratio=3", "--capture-ratio=6"]);
        assert_eq!(arg_value::<u32>(&args, "--capture-ratio="), Some(6));
    }

    #[test]
    fn test_arg_value_unparsable_is_absent() {
        let args = args(&["--capture-ratio=lots"]);
        assert_eq!(arg_value::<u32>(&args, "--capture-ratio="), None);
    }

    #[test]
    fn test_from_args_merges_defaults() {
        let config = PickerConfig::from_args(&args(&[
            "--mode=0",
            "--refresh-frequency=60",
            "--bound-width=9",
        ]));
        assert_eq!(config.refresh_frequency, 60);
        assert_eq!(config.capture_ratio, 1);
        assert_eq!(config.bound_width, 9);
        assert_eq!(config.bound_height, 17);
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let mut config = PickerConfig::default();
        config.capture_ratio = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCaptureRatio)
        ));

        let mut config = PickerConfig::default();
        config.refresh_frequency = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroRefreshFrequency)
        ));

        let mut config = PickerConfig::default();
        config.bound_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBounds { .. })
        ));
    }

    #[test]
    fn test_tick_period() {
        let mut config = PickerConfig::default();
        config.refresh_frequency = 100;
        assert_eq!(config.tick_period(), Duration::from_millis(10));
    }
}
