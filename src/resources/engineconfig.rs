//! Engine configuration resource.
//!
//! Settings loaded from an INI file. Every value has a safe default, and
//! keys missing from the file keep their current value.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//!
//! [input]
//! double_click_ms = 500
//!
//! [camera]
//! edge_threshold = 16
//! scroll_speed = 400
//!
//! [screen]
//! background = 6495edff
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};

use crate::components::tint::Color;
use crate::error::SceneError;
use crate::resources::input::DEFAULT_DOUBLE_CLICK_MS;

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_EDGE_THRESHOLD: f32 = 16.0;
const DEFAULT_SCROLL_SPEED: f32 = 400.0;
const DEFAULT_CONFIG_PATH: &str = "./strata.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Double-click window in milliseconds.
    pub double_click_ms: u32,
    /// Default edge-scroll trigger distance in pixels.
    pub edge_threshold: f32,
    /// Default edge-scroll speed in world units per second.
    pub scroll_speed: f32,
    /// Clear colour of newly created screens.
    pub background: Color,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            background: Color::CORNFLOWER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from `config_path`. Missing keys keep their current value.
    pub fn load_from_file(&mut self) -> Result<(), SceneError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SceneError::Config(format!("failed to load config file: {}", e)))?;

        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(ms) = config.getuint("input", "double_click_ms").ok().flatten() {
            self.double_click_ms = ms as u32;
        }
        if let Some(threshold) = config.getfloat("camera", "edge_threshold").ok().flatten() {
            self.edge_threshold = threshold as f32;
        }
        if let Some(speed) = config.getfloat("camera", "scroll_speed").ok().flatten() {
            self.scroll_speed = speed as f32;
        }
        if let Some(hex) = config.get("screen", "background") {
            match Color::from_hex(&hex) {
                Some(color) => self.background = color,
                None => warn!("Ignoring invalid background colour '{}'", hex),
            }
        }

        info!(
            "Loaded config: {}x{} window, double_click={}ms, edge_threshold={}, scroll_speed={}",
            self.window_width,
            self.window_height,
            self.double_click_ms,
            self.edge_threshold,
            self.scroll_speed
        );
        Ok(())
    }

    /// Write the current values to `config_path`.
    pub fn save_to_file(&self) -> Result<(), SceneError> {
        let mut config = Ini::new();
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("input", "double_click_ms", Some(self.double_click_ms.to_string()));
        config.set("camera", "edge_threshold", Some(self.edge_threshold.to_string()));
        config.set("camera", "scroll_speed", Some(self.scroll_speed.to_string()));
        config.set("screen", "background", Some(self.background.to_hex().trim_start_matches('#').to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SceneError::Config(format!("failed to save config file: {}", e)))?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("strata-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let mut cfg = EngineConfig::with_path(temp_path("does-not-exist"));
        assert!(matches!(cfg.load_from_file(), Err(SceneError::Config(_))));
        assert_eq!(cfg.window_size(), (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[window]\nwidth = 800\n\n[screen]\nbackground = 102030\n").unwrap();
        let mut cfg = EngineConfig::with_path(&path);
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.window_width, 800);
        assert_eq!(cfg.window_height, DEFAULT_WINDOW_HEIGHT);
        assert_eq!(cfg.background, Color::new(16, 32, 48, 255));
        assert_eq!(cfg.double_click_ms, DEFAULT_DOUBLE_CLICK_MS);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn saved_values_load_back() {
        let path = temp_path("saved");
        let mut cfg = EngineConfig::with_path(&path);
        cfg.window_width = 640;
        cfg.double_click_ms = 250;
        cfg.scroll_speed = 120.5;
        cfg.save_to_file().unwrap();

        let mut loaded = EngineConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_file(path);
    }
}
