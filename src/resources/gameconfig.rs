//! Game configuration.
//!
//! Settings loaded from an INI configuration file, with defaults for a safe
//! startup when the file is missing.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 600
//! height = 600
//! fullscreen = false
//! target_fps = 120
//!
//! [game]
//! objects = 64
//! step_hz = 60
//!
//! [assets]
//! dir = assets
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 600;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_OBJECTS: i32 = 64;
const DEFAULT_STEP_HZ: u32 = 60;
/// Fastest accepted simulation rate. Keeps the step well above zero.
pub const MAX_STEP_HZ: u32 = 1000;
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Window, simulation and asset settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Initial number of tiles shown by the gameplay layer.
    pub objects: i32,
    /// Fixed simulation rate.
    pub step_hz: u32,
    /// Root directory of fonts, textures, levels, scripts and sounds.
    pub assets_dir: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            fullscreen: DEFAULT_FULLSCREEN,
            objects: DEFAULT_OBJECTS,
            step_hz: DEFAULT_STEP_HZ,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [game] section
        if let Some(objects) = config.getint("game", "objects").ok().flatten() {
            match i32::try_from(objects) {
                Ok(objects) => self.objects = objects,
                Err(_) => warn!("objects = {} is out of range, keeping {}", objects, self.objects),
            }
        }
        if let Some(hz) = config.getuint("game", "step_hz").ok().flatten() {
            match u32::try_from(hz) {
                Ok(hz) if (1..=MAX_STEP_HZ).contains(&hz) => self.step_hz = hz,
                _ => warn!(
                    "step_hz = {} is outside 1..={}, keeping {}",
                    hz, MAX_STEP_HZ, self.step_hz
                ),
            }
        }

        // [assets] section
        if let Some(dir) = config.get("assets", "dir") {
            self.assets_dir = PathBuf::from(dir);
        }

        info!(
            "Loaded config: {}x{} window, fps={}, fullscreen={}, objects={}, step={}Hz, assets={:?}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.fullscreen,
            self.objects,
            self.step_hz,
            self.assets_dir
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config.set("game", "objects", Some(self.objects.to_string()));
        config.set("game", "step_hz", Some(self.step_hz.to_string()));

        config.set(
            "assets",
            "dir",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Duration of one fixed simulation step. Never zero.
    pub fn step(&self) -> Duration {
        Duration::from_secs(1) / self.step_hz.clamp(1, MAX_STEP_HZ)
    }

    /// Path of an asset relative to the assets directory.
    pub fn asset(&self, relative: &str) -> PathBuf {
        self.assets_dir.join(relative)
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (600, 600));
        assert_eq!(config.objects, 64);
        assert!(!config.fullscreen);
        assert_eq!(config.step(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[window]\nwidth = 800\nfullscreen = true\n\n[game]\nobjects = 512\n\n[assets]\ndir = data\n",
            )
            .unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
        assert!(config.fullscreen);
        assert_eq!(config.objects, 512);
        assert_eq!(config.asset("fonts/x.ttf"), PathBuf::from("data/fonts/x.ttf"));
    }

    #[test]
    fn test_zero_step_rate_is_ignored() {
        let mut config = GameConfig::new();
        config.load_from_str("[game]\nstep_hz = 0\n").unwrap();
        assert_eq!(config.step_hz, 60);
    }

    #[test]
    fn test_huge_step_rate_is_ignored() {
        let mut config = GameConfig::new();
        config.load_from_str("[game]\nstep_hz = 2000000000\n").unwrap();
        assert_eq!(config.step_hz, 60);
        config.load_from_str("[game]\nstep_hz = 8589934652\n").unwrap();
        assert_eq!(config.step_hz, 60);
        assert!(config.step() > Duration::ZERO);

        // Set directly, bypassing the file
        config.step_hz = u32::MAX;
        assert_eq!(config.step(), Duration::from_millis(1));
    }

    #[test]
    fn test_out_of_range_object_count_is_ignored() {
        let mut config = GameConfig::new();
        config.load_from_str("[game]\nobjects = 4294967360\n").unwrap();
        assert_eq!(config.objects, 64);
        config.load_from_str("[game]\nobjects = 1024\n").unwrap();
        assert_eq!(config.objects, 1024);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = GameConfig::with_path("./does/not/exist.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config, GameConfig::with_path("./does/not/exist.ini"));
    }
}
