//! Rail configuration
//!
//! Loaded from a TOML table; every field has a default so an empty file is
//! a valid configuration:
//!
//! ```toml
//! axis = "vertical"
//! diameter = 24.0
//! stretch_ms = 100
//! shrink_ms = 150
//! shrink_easing = "cubic-bezier(0.34, 1.56, 0.64, 1)"
//! geometry_retry_limit = 30
//! ```

use crate::easing::Easing;
use crate::style::Transition;
use crate::tween::TweenParams;
use rail_core::{Axis, RailError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration of one rail indicator
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RailConfig {
    /// Axis the rail travels along, fixed for the indicator's lifetime
    #[serde(default)]
    pub axis: Axis,
    /// Resting size of the rail
    #[serde(default = "default_diameter")]
    pub diameter: f64,
    /// Thickness lost per unit of travel while stretched
    #[serde(default = "default_cross_squash")]
    pub cross_squash: f64,
    /// Minimum thickness while stretched
    #[serde(default = "default_min_cross_size")]
    pub min_cross_size: f64,
    #[serde(default = "default_stretch_ms")]
    pub stretch_ms: u64,
    #[serde(default = "default_shrink_ms")]
    pub shrink_ms: u64,
    #[serde(default = "default_stretch_easing")]
    pub stretch_easing: Easing,
    #[serde(default = "Easing::overshoot")]
    pub shrink_easing: Easing,
    /// Give up on a target after this many "not laid out" answers; must be
    /// at least 1. Unset polls until layout completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_retry_limit: Option<u32>,
    /// CSS selector used when rendering styles as CSS
    #[serde(default = "default_selector")]
    pub selector: String,
}

fn default_diameter() -> f64 {
    24.0
}

fn default_cross_squash() -> f64 {
    0.0625
}

fn default_min_cross_size() -> f64 {
    2.0
}

fn default_stretch_ms() -> u64 {
    100
}

fn default_shrink_ms() -> u64 {
    150
}

fn default_stretch_easing() -> Easing {
    Easing::EaseOut
}

fn default_selector() -> String {
    "#workspace-rail".to_string()
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            axis: Axis::default(),
            diameter: default_diameter(),
            cross_squash: default_cross_squash(),
            min_cross_size: default_min_cross_size(),
            stretch_ms: default_stretch_ms(),
            shrink_ms: default_shrink_ms(),
            stretch_easing: default_stretch_easing(),
            shrink_easing: Easing::overshoot(),
            geometry_retry_limit: None,
            selector: default_selector(),
        }
    }
}

impl RailConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RailConfig =
            toml::from_str(content).map_err(|e| RailError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| RailError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RailError::Config(e.to_string()))
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_retry_limit(mut self, limit: u32) -> Self {
        self.geometry_retry_limit = Some(limit);
        self
    }

    /// Check that the geometry parameters describe a drawable rail
    pub fn validate(&self) -> Result<()> {
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(RailError::Config(format!(
                "diameter must be positive, got {}",
                self.diameter
            )));
        }
        if !(self.cross_squash.is_finite() && self.cross_squash >= 0.0) {
            return Err(RailError::Config(format!(
                "cross_squash must not be negative, got {}",
                self.cross_squash
            )));
        }
        if !(0.0..=self.diameter).contains(&self.min_cross_size) {
            return Err(RailError::Config(format!(
                "min_cross_size must be within 0..={}, got {}",
                self.diameter, self.min_cross_size
            )));
        }
        if self.geometry_retry_limit == Some(0) {
            return Err(RailError::Config(
                "geometry_retry_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tween(&self) -> TweenParams {
        TweenParams {
            diameter: self.diameter,
            cross_squash: self.cross_squash,
            min_cross_size: self.min_cross_size,
        }
    }

    pub fn stretch_duration(&self) -> Duration {
        Duration::from_millis(self.stretch_ms)
    }

    pub fn shrink_duration(&self) -> Duration {
        Duration::from_millis(self.shrink_ms)
    }

    pub fn stretch_transition(&self) -> Transition {
        Transition::new(self.stretch_duration(), self.stretch_easing)
    }

    pub fn shrink_transition(&self) -> Transition {
        Transition::new(self.shrink_duration(), self.shrink_easing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RailConfig::from_toml_str("").unwrap();
        assert_eq!(config, RailConfig::default());
        assert_eq!(config.stretch_duration(), Duration::from_millis(100));
        assert_eq!(config.shrink_duration(), Duration::from_millis(150));
        assert_eq!(config.shrink_easing, Easing::overshoot());
        assert_eq!(config.geometry_retry_limit, None);
    }

    #[test]
    fn test_parse_overrides() {
        let config = RailConfig::from_toml_str(
            r##"
            axis = "vertical"
            diameter = 16.0
            stretch_ms = 80
            stretch_easing = "linear"
            geometry_retry_limit = 5
            selector = "#bar-rail"
            "##,
        )
        .unwrap();

        assert_eq!(config.axis, Axis::Vertical);
        assert_eq!(config.diameter, 16.0);
        assert_eq!(config.stretch_transition().duration_ms, 80);
        assert_eq!(config.stretch_transition().easing, Easing::Linear);
        assert_eq!(config.geometry_retry_limit, Some(5));
        assert_eq!(config.selector, "#bar-rail");
        assert_eq!(config.tween().diameter, 16.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let invalid = [
            "diameter = 0.0",
            "cross_squash = -1.0",
            "min_cross_size = 30.0",
            r#"axis = "diagonal""#,
            r#"shrink_easing = "bounce""#,
            r#"stretch_easing = "cubic-bezier(0.3, nan, 0.6, 1)""#,
            "geometry_retry_limit = 0",
        ];
        for content in invalid {
            assert!(RailConfig::from_toml_str(content).is_err(), "{}", content);
        }

        let config = RailConfig::from_toml_str("geometry_retry_limit = 1").unwrap();
        assert_eq!(config.geometry_retry_limit, Some(1));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RailConfig::default()
            .with_axis(Axis::Vertical)
            .with_retry_limit(12);
        let text = config.to_toml().unwrap();

        assert!(text.contains("axis = \"vertical\""));
        assert!(text.contains("shrink_easing = \"cubic-bezier(0.34, 1.56, 0.64, 1)\""));
        assert_eq!(RailConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RailConfig::load(Path::new("/nonexistent/rail.toml")).unwrap_err();
        assert!(matches!(err, RailError::Io(_)));
    }
}
