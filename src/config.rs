//! Runtime settings for the frame driver, loadable from TOML.
//!
//! ```toml
//! tick_interval_ms = 16
//! axis_deadzone = 0.5
//! max_catch_up_ticks = 8
//! fps_window_ms = 1000
//! ```
//!
//! Missing files fall back to defaults so the driver can always start.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::controller::axis::DEFAULT_AXIS_DEADZONE;

const CONFIG_DIR: &str = "keybinder";
const CONFIG_FILE: &str = "input.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    /// Interval for [`FrameDriver::set_tick_handler_from_settings`](crate::FrameDriver::set_tick_handler_from_settings)
    pub tick_interval_ms: Option<u64>,

    /// Stick values with `|v| <= axis_deadzone` count as centered
    pub axis_deadzone: f32,

    /// Upper bound on tick handler runs per poll; unbounded when unset
    pub max_catch_up_ticks: Option<u32>,

    /// Width of the FPS measurement window
    pub fps_window_ms: u64,

    /// Overrides the number of joystick slots the device reports
    pub joystick_slots: Option<usize>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: None,
            axis_deadzone: DEFAULT_AXIS_DEADZONE,
            max_catch_up_ticks: None,
            fps_window_ms: 1000,
            joystick_slots: None,
        }
    }
}

impl InputSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: InputSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading input settings from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        info!("Loaded input settings from {}", path.display());
        Ok(settings)
    }

    /// Loads `path` if it exists, defaults otherwise. Parse and validation
    /// errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(
                "Input settings file {} does not exist, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// `<config dir>/keybinder/input.toml`, or a path relative to the working
    /// directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.axis_deadzone) {
            return Err(ConfigError::Invalid(format!(
                "axis_deadzone must be in [0, 1), got {}",
                self.axis_deadzone
            )));
        }
        if self.fps_window_ms == 0 {
            return Err(ConfigError::Invalid(
                "fps_window_ms must be greater than zero".to_string(),
            ));
        }
        if self.tick_interval_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_catch_up_ticks == Some(0) {
            return Err(ConfigError::Invalid(
                "max_catch_up_ticks must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = InputSettings::from_toml_str("").expect("empty config is valid");
        assert_eq!(settings, InputSettings::default());
        assert_eq!(settings.axis_deadzone, 0.5);
        assert_eq!(settings.max_catch_up_ticks, None);
    }

    #[test]
    fn parses_every_field() {
        let settings = InputSettings::from_toml_str(
            "tick_interval_ms = 16\naxis_deadzone = 0.25\nmax_catch_up_ticks = 4\nfps_window_ms = 500\njoystick_slots = 2\n",
        )
        .expect("config should parse");

        assert_eq!(settings.tick_interval_ms, Some(16));
        assert_eq!(settings.axis_deadzone, 0.25);
        assert_eq!(settings.max_catch_up_ticks, Some(4));
        assert_eq!(settings.fps_window_ms, 500);
        assert_eq!(settings.joystick_slots, Some(2));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            InputSettings::from_toml_str("axis_deadzone = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InputSettings::from_toml_str("fps_window_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InputSettings::from_toml_str("tick_interval_ms = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InputSettings::from_toml_str("axis_deadzone = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("keybinder-settings-that-do-not-exist.toml");
        let settings = InputSettings::load_or_default(&path).expect("defaults are used");
        assert_eq!(settings, InputSettings::default());
        assert!(matches!(InputSettings::load(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn default_path_ends_with_crate_config_file() {
        let path = InputSettings::default_path();
        assert!(path.ends_with("keybinder/input.toml"));
    }
}
