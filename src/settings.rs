//! Simulation settings
//!
//! Canvas bounds, step rates and the RNG seed. Loaded from JSON by the
//! driver; everything has a default so a partial file is enough.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield width in pixels
    pub canvas_width: u32,
    /// Playfield height in pixels
    pub canvas_height: u32,
    /// Rate the driver steps the world at
    pub steps_per_second: f32,
    /// Cadence of moving and collapsing platform updates
    pub platform_tick_hz: f32,
    /// Fixed seed for reproducible runs (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            platform_tick_hz: DEFAULT_PLATFORM_TICK_HZ,
            seed: None,
        }
    }
}

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {}", e),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check bounds the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if (self.canvas_width as f32) <= PLATFORM_WIDTH + WRAP_MARGIN {
            return Err(SettingsError::Invalid(format!(
                "canvas width {} is too narrow for a platform",
                self.canvas_width
            )));
        }
        if (self.canvas_height as f32) <= INITIAL_BOTTOM_OFFSET + INITIAL_SPACING_MAX as f32 {
            return Err(SettingsError::Invalid(format!(
                "canvas height {} is too short",
                self.canvas_height
            )));
        }
        if !(self.steps_per_second.is_finite() && self.steps_per_second > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "steps per second must be positive, got {}",
                self.steps_per_second
            )));
        }
        if !(self.platform_tick_hz.is_finite() && self.platform_tick_hz > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "platform tick rate must be positive, got {}",
                self.platform_tick_hz
            )));
        }
        Ok(())
    }

    /// Fixed step length in seconds
    pub fn step_dt(&self) -> f32 {
        1.0 / self.steps_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.canvas_width, 480);
        assert_eq!(settings.canvas_height, 640);
        assert_eq!(settings.steps_per_second, 60.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "canvas_width": 600 }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.canvas_width, 600);
        assert_eq!(settings.canvas_height, DEFAULT_CANVAS_HEIGHT);
        assert_eq!(settings.platform_tick_hz, DEFAULT_PLATFORM_TICK_HZ);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            Settings::from_json(r#"{ "canvas_width": 50 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "steps_per_second": 0.0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
