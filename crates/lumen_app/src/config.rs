//! Lumen configuration file handling

use lumen_core::Size;
use lumen_layout::driver::{
    DriverConfig, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_MAX_TICKS, MIN_FRAME_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`LumenConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "lumen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration (lumen.toml)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LumenConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// Logical screen size views are laid out in
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    390.0
}

fn default_height() -> f32 {
    844.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Frame pacing and the runaway-motion safeguard
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f32,
    /// Ticks before an unsettled motion is snapped; 0 disables the safeguard
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
}

fn default_frame_interval() -> f32 {
    DEFAULT_FRAME_INTERVAL_MS
}

fn default_max_ticks() -> u32 {
    DEFAULT_MAX_TICKS
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            max_ticks: default_max_ticks(),
        }
    }
}

impl LumenConfig {
    /// Load `lumen.toml` from a directory, or the file itself.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_dir(path: &Path) -> Result<Self, ConfigError> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LumenConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ViewportConfig { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {width}x{height}"
            )));
        }
        let interval = self.animation.frame_interval_ms;
        if !(interval.is_finite() && interval >= MIN_FRAME_INTERVAL_MS) {
            return Err(ConfigError::Invalid(format!(
                "frame_interval_ms must be at least {MIN_FRAME_INTERVAL_MS}, got {interval}"
            )));
        }
        Ok(())
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport.width, self.viewport.height)
    }

    pub fn max_ticks(&self) -> Option<u32> {
        (self.animation.max_ticks > 0).then_some(self.animation.max_ticks)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            viewport: self.viewport_size(),
            frame_interval_ms: self.animation.frame_interval_ms,
            max_ticks: self.max_ticks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = LumenConfig::from_toml("").unwrap();
        assert_eq!(config, LumenConfig::default());
        assert_eq!(config.viewport_size(), Size::new(390.0, 844.0));
        assert_eq!(config.max_ticks(), Some(DEFAULT_MAX_TICKS));
    }

    #[test]
    fn test_partial_sections() {
        let config = LumenConfig::from_toml(
            r#"
            [viewport]
            width = 1024.0

            [animation]
            max_ticks = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport.width, 1024.0);
        assert_eq!(config.viewport.height, 844.0);
        assert_eq!(config.max_ticks(), None);
        assert_eq!(config.driver_config().frame_interval_ms, DEFAULT_FRAME_INTERVAL_MS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = LumenConfig::from_toml("[viewport]\nwidth = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = LumenConfig::from_toml("[animation]\nframe_interval_ms = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_sub_millisecond_interval() {
        let err = LumenConfig::from_toml("[animation]\nframe_interval_ms = 1e-6\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut config = LumenConfig::default();
        config.animation.frame_interval_ms = 0.5;
        assert!(config.validate().is_err());
        config.animation.frame_interval_ms = MIN_FRAME_INTERVAL_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = LumenConfig::default();
        config.animation.max_ticks = 42;
        let text = config.to_toml().unwrap();
        assert_eq!(LumenConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("lumen-config-test-missing");
        let config = LumenConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config, LumenConfig::default());
    }
}
