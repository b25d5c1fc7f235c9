//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use crate::sim::LevelSettings;
use config::{Config, ConfigError, Environment, File};
use rand::Rng;
use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL_WIDTH: i32 = 25;
const DEFAULT_LEVEL_HEIGHT: i32 = 19;
const DEFAULT_TILE_SIZE: i32 = 48;
const DEFAULT_HAZARD_DENSITY: f32 = 0.08;
const MAX_LAUNCH_HAZARD: f32 = 0.9;

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Whether to enable vsync
    pub vsync: bool,
}

/// Arena parameters used for the first generated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "default_level_width")]
    pub width: i32,
    #[serde(default = "default_level_height")]
    pub height: i32,
    #[serde(default = "default_tile_size")]
    pub tile_size: i32,
    #[serde(default = "default_hazard_density")]
    pub hazard_density: f32,
    /// Fixed seed; a random one is drawn at launch when absent
    #[serde(default)]
    pub seed: Option<i64>,
}

fn default_level_width() -> i32 {
    DEFAULT_LEVEL_WIDTH
}

fn default_level_height() -> i32 {
    DEFAULT_LEVEL_HEIGHT
}

fn default_tile_size() -> i32 {
    DEFAULT_TILE_SIZE
}

fn default_hazard_density() -> f32 {
    DEFAULT_HAZARD_DENSITY
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_LEVEL_WIDTH,
            height: DEFAULT_LEVEL_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            hazard_density: DEFAULT_HAZARD_DENSITY,
            seed: None,
        }
    }
}

impl LevelConfig {
    /// Converts launch parameters into normalised level settings
    ///
    /// Dimensions are bumped to the next odd number and the hazard density is
    /// clamped to `0..=0.9` before [`LevelSettings`] applies its own limits.
    /// An explicit seed is locked; otherwise a random one is drawn.
    pub fn to_settings(&self) -> LevelSettings {
        let hazard = if self.hazard_density.is_nan() {
            0.0
        } else {
            self.hazard_density.clamp(0.0, MAX_LAUNCH_HAZARD)
        };
        let (seed, locked) = match self.seed {
            Some(seed) => (seed, true),
            None => (rand::rng().random(), false),
        };
        LevelSettings::new(
            make_odd(self.width),
            make_odd(self.height),
            self.tile_size,
            hazard,
            seed,
            locked,
        )
    }
}

fn make_odd(value: i32) -> i32 {
    if value % 2 == 0 { value + 1 } else { value }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    pub window: WindowConfig,
    /// Launch arena
    #[serde(default)]
    pub level: LevelConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_LEVEL__WIDTH=31)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        // Find config directory - try relative to executable first, then current directory
        let config_dir = Self::find_config_dir();

        let mut builder = Config::builder();

        // Add profile-specific configuration
        if let Some(ref dir) = config_dir {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Add environment variables with APP_ prefix
        // Use __ as separator for nested fields (e.g., APP_WINDOW__WIDTH)
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        // Set the profile
        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<std::path::PathBuf> {
        // Try to find config dir relative to executable
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        // Fall back to current directory
        let cwd_config = std::path::PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            window: WindowConfig {
                title: "Isometric Hazard Run".to_string(),
                width: 1280.0,
                height: 900.0,
                fullscreen: false,
                resizable: true,
                decorated: true,
                vsync: true,
            },
            level: LevelConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_defaults() {
        let level = LevelConfig::default();
        assert_eq!((level.width, level.height), (25, 19));
        assert_eq!(level.tile_size, 48);
        assert!(level.seed.is_none());
    }

    #[test]
    fn test_explicit_seed_is_locked() {
        let level = LevelConfig {
            width: 20,
            height: 14,
            hazard_density: 3.0,
            seed: Some(-9),
            ..Default::default()
        };
        let settings = level.to_settings();
        assert_eq!((settings.width(), settings.height()), (21, 15));
        assert_eq!(settings.seed(), -9);
        assert!(settings.lock_seed());
        assert!(settings.hazard_density() <= MAX_LAUNCH_HAZARD);
    }

    #[test]
    fn test_oversized_launch_arena_is_capped() {
        let level = LevelConfig {
            width: 60_001,
            height: 60_001,
            ..Default::default()
        };
        let settings = level.to_settings();
        assert_eq!(settings.width(), crate::sim::settings::MAX_DIMENSION);
        assert_eq!(settings.height(), crate::sim::settings::MAX_DIMENSION);
    }

    #[test]
    fn test_missing_seed_is_unlocked() {
        let settings = LevelConfig::default().to_settings();
        assert!(!settings.lock_seed());
    }

    #[test]
    fn test_release_profile_loads() {
        // Missing files are optional, so this only fails on malformed input
        let config = AppConfig::load("release").unwrap();
        assert_eq!(config.profile, "release");
        assert!(config.level.width >= 5);
    }
}
