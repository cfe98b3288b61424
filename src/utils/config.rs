//! Configuration management for PlayerView
//!
//! This module handles loading and managing the view configuration
//! from config files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::scrubber::Color;
use crate::utils::error::{IntoPlayerError, PlayerViewError, Result};

/// Main view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controls overlay configuration
    pub overlay: OverlayConfig,

    /// Scrubber configuration
    pub scrubber: ScrubberConfig,

    /// Playback configuration
    pub playback: PlaybackConfig,

    /// Fullscreen configuration
    pub fullscreen: FullscreenConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Controls overlay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Idle time before the overlay hides during playback
    pub idle_hide_ms: u64,

    /// Duration of the hide/show fade
    pub fade_ms: u64,

    /// Animate the overlay when an interaction reveals it
    pub animate_show: bool,
}

/// Scrubber configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubberConfig {
    /// Emit value changes on every drag move
    pub continuous: bool,

    /// Minimum spacing between seeks issued during a continuous drag
    pub seek_debounce_ms: u64,

    /// Track outline colour (hex)
    pub stroke_color: String,

    /// Track fill colour (hex)
    pub fill_color: String,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Start playing as soon as the source is ready
    pub auto_play: bool,

    /// Seek step for the arrow keys, in seconds
    pub seek_step_secs: u64,
}

/// Fullscreen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullscreenConfig {
    /// Start in fullscreen mode
    pub start_fullscreen: bool,

    /// Force the status bar visibility regardless of fullscreen
    pub status_bar_override: Option<bool>,
}

/// General application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default(),
            scrubber: ScrubberConfig::default(),
            playback: PlaybackConfig::default(),
            fullscreen: FullscreenConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            idle_hide_ms: 3000,
            fade_ms: 300,
            animate_show: true,
        }
    }
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            seek_debounce_ms: 100,
            stroke_color: "#FFFFFF".to_string(),
            fill_color: "#FFFFFF".to_string(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            auto_play: false,
            seek_step_secs: 10,
        }
    }
}

impl Default for FullscreenConfig {
    fn default() -> Self {
        Self {
            start_fullscreen: false,
            status_bar_override: None,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl OverlayConfig {
    pub fn idle_hide(&self) -> Duration {
        Duration::from_millis(self.idle_hide_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl ScrubberConfig {
    pub fn seek_debounce(&self) -> Duration {
        Duration::from_millis(self.seek_debounce_ms)
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/playerview/config.toml on Linux)
    /// 3. User config file (~/.config/playerview/config.toml on Linux)
    /// 4. Environment variables (PLAYERVIEW_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config = Self::from_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).config_err("Failed to parse config file")
    }

    /// Read a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerViewError::Config("Cannot determine user config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;
        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Example: PLAYERVIEW_IDLE_HIDE_MS=5000
        if let Ok(idle) = std::env::var("PLAYERVIEW_IDLE_HIDE_MS") {
            self.overlay.idle_hide_ms = idle
                .parse()
                .map_err(|_| PlayerViewError::Config("Invalid PLAYERVIEW_IDLE_HIDE_MS".to_string()))?;
        }

        if let Ok(debounce) = std::env::var("PLAYERVIEW_SEEK_DEBOUNCE_MS") {
            self.scrubber.seek_debounce_ms = debounce
                .parse()
                .map_err(|_| PlayerViewError::Config("Invalid PLAYERVIEW_SEEK_DEBOUNCE_MS".to_string()))?;
        }

        if let Ok(continuous) = std::env::var("PLAYERVIEW_CONTINUOUS") {
            self.scrubber.continuous = continuous
                .parse()
                .map_err(|_| PlayerViewError::Config("Invalid PLAYERVIEW_CONTINUOUS".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("PLAYERVIEW_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.overlay.idle_hide_ms == 0 {
            return Err(PlayerViewError::Config("Idle hide duration must be non-zero".to_string()));
        }

        for (name, color) in [
            ("stroke_color", &self.scrubber.stroke_color),
            ("fill_color", &self.scrubber.fill_color),
        ] {
            if Color::from_hex(color).is_err() {
                return Err(PlayerViewError::Config(format!(
                    "Invalid {} '{}', expected #RRGGBB",
                    name, color
                )));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(PlayerViewError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level,
                valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/playerview/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA").ok()
            .map(|p| PathBuf::from(p).join("PlayerView").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/PlayerView/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return dirs::config_dir()
            .map(|p| p.join("playerview").join("config.toml"));

        #[cfg(not(target_os = "linux"))]
        return dirs::config_dir()
            .map(|p| p.join("PlayerView").join("config.toml"));
    }
}
