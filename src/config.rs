//! Configuration management for Joystick Sounds
//!
//! Handles loading, parsing, and validating the YAML configuration file.
//! Every field has a default, so an empty file (or no file at all) gives a
//! working setup for the usual Base Hat wiring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::input::adc::{CHANNEL_COUNT, GROVE_ADC_ADDRESS};
use crate::input::Direction;

/// Longest accepted value for any `*_s` duration option (one day)
pub const MAX_DURATION_S: f64 = 86_400.0;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// ADC channel wired to the stick's X axis
    #[serde(default = "default_x_channel")]
    pub x_channel: u8,
    /// ADC channel wired to the stick's Y axis
    #[serde(default = "default_y_channel")]
    pub y_channel: u8,
    /// Normalized deflection needed to leave center, in (0, 1)
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// How far back the waggle detector looks
    #[serde(default = "default_gesture_window")]
    pub gesture_window_s: f64,
    /// Pause after a waggle before the stick is read again
    #[serde(default = "default_gesture_cooldown")]
    pub gesture_cooldown_s: f64,
    /// Poll period
    #[serde(default = "default_tick_interval")]
    pub tick_interval_s: f64,
    /// Collapse consecutive same-side ticks into one gesture event
    #[serde(default = "default_true")]
    pub gesture_dedup: bool,
    #[serde(default)]
    pub adc: AdcConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

/// I2C location of the ADC
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdcConfig {
    #[serde(default = "default_i2c_bus")]
    pub bus: PathBuf,
    #[serde(default = "default_adc_address")]
    pub address: u8,
}

/// Sound file locations
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SoundsConfig {
    /// Directory the file names below are relative to
    #[serde(default = "default_sounds_dir")]
    pub dir: PathBuf,
    /// One file per stick direction
    #[serde(default = "default_direction_sounds")]
    pub directions: BTreeMap<Direction, String>,
    /// File played when the waggle gesture fires
    #[serde(default = "default_gesture_sound")]
    pub gesture: Option<String>,
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        for (name, channel) in [("x_channel", self.x_channel), ("y_channel", self.y_channel)] {
            if channel >= CHANNEL_COUNT {
                anyhow::bail!(
                    "{} {} is invalid (must be 0-{})",
                    name,
                    channel,
                    CHANNEL_COUNT - 1
                );
            }
        }
        if self.x_channel == self.y_channel {
            anyhow::bail!("x_channel and y_channel must differ (both are {})", self.x_channel);
        }

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            anyhow::bail!("threshold {} is invalid (must be between 0 and 1)", self.threshold);
        }

        for (name, secs) in [
            ("gesture_window_s", self.gesture_window_s),
            ("tick_interval_s", self.tick_interval_s),
        ] {
            if !(secs.is_finite() && secs > 0.0) {
                anyhow::bail!("{} {} is invalid (must be a positive number of seconds)", name, secs);
            }
        }
        if !(self.gesture_cooldown_s.is_finite() && self.gesture_cooldown_s >= 0.0) {
            anyhow::bail!(
                "gesture_cooldown_s {} is invalid (must be zero or more seconds)",
                self.gesture_cooldown_s
            );
        }

        for (name, secs) in [
            ("gesture_window_s", self.gesture_window_s),
            ("gesture_cooldown_s", self.gesture_cooldown_s),
            ("tick_interval_s", self.tick_interval_s),
        ] {
            if secs > MAX_DURATION_S {
                anyhow::bail!(
                    "{} {} is invalid (must be at most {} seconds)",
                    name,
                    secs,
                    MAX_DURATION_S
                );
            }
        }

        if self.adc.address > 0x7F {
            anyhow::bail!("adc.address 0x{:02X} is not a 7-bit I2C address", self.adc.address);
        }

        if self.sounds.directions.contains_key(&Direction::Center) {
            anyhow::bail!("sounds.directions cannot map 'center' (centering stops playback)");
        }
        for (direction, file) in &self.sounds.directions {
            if file.trim().is_empty() {
                anyhow::bail!("sounds.directions.{} cannot be empty", direction);
            }
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_s)
    }

    pub fn gesture_window(&self) -> Duration {
        Duration::from_secs_f64(self.gesture_window_s)
    }

    pub fn gesture_cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.gesture_cooldown_s)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            x_channel: default_x_channel(),
            y_channel: default_y_channel(),
            threshold: default_threshold(),
            gesture_window_s: default_gesture_window(),
            gesture_cooldown_s: default_gesture_cooldown(),
            tick_interval_s: default_tick_interval(),
            gesture_dedup: true,
            adc: AdcConfig::default(),
            sounds: SoundsConfig::default(),
        }
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            bus: default_i2c_bus(),
            address: default_adc_address(),
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            dir: default_sounds_dir(),
            directions: default_direction_sounds(),
            gesture: default_gesture_sound(),
        }
    }
}

// Default value functions
fn default_x_channel() -> u8 { 2 }
fn default_y_channel() -> u8 { 6 }
fn default_threshold() -> f32 { 0.4 }
fn default_gesture_window() -> f64 { 2.0 }
fn default_gesture_cooldown() -> f64 { 30.0 }
fn default_tick_interval() -> f64 { 0.1 }
fn default_true() -> bool { true }
fn default_i2c_bus() -> PathBuf { PathBuf::from("/dev/i2c-1") }
fn default_adc_address() -> u8 { GROVE_ADC_ADDRESS }
fn default_sounds_dir() -> PathBuf { PathBuf::from("sounds") }
fn default_gesture_sound() -> Option<String> { Some("feyenoord.mp3".to_string()) }

fn default_direction_sounds() -> BTreeMap<Direction, String> {
    [
        (Direction::North, "cow.mp3"),
        (Direction::NorthEast, "horse.mp3"),
        (Direction::East, "pig.mp3"),
        (Direction::SouthEast, "bird.mp3"),
        (Direction::South, "elephant.mp3"),
        (Direction::SouthWest, "tiger.mp3"),
        (Direction::West, "frog.mp3"),
        (Direction::NorthWest, "owl.mp3"),
    ]
    .into_iter()
    .map(|(dir, file)| (dir, file.to_string()))
    .collect()
}
