//! Playback configuration.
//!
//! Settings loaded from an INI file. Every value has a safe default so a host
//! can start without a configuration file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playback]
//! speed = 1.0
//! start_paused = false
//! speed_up_factor = 1.25
//! slow_down_factor = 0.8
//! min_speed = 0.05
//! max_speed = 20.0
//!
//! [loop]
//! tick_rate = 60
//!
//! [scene]
//! spawn_x = 250
//! spawn_y = 250
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use glam::Vec2;
use log::{info, warn};

use crate::error::ConfigError;
use crate::resources::playbackclock::PlaybackClock;

/// Default safe values for startup
const DEFAULT_SPEED: f32 = 1.0;
const DEFAULT_START_PAUSED: bool = false;
const DEFAULT_SPEED_UP_FACTOR: f32 = 1.25;
const DEFAULT_SLOW_DOWN_FACTOR: f32 = 0.8;
const DEFAULT_MIN_SPEED: f32 = 0.05;
const DEFAULT_MAX_SPEED: f32 = 20.0;
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_SPAWN_X: f32 = 250.0;
const DEFAULT_SPAWN_Y: f32 = 250.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Initial speed factor of the clock.
    pub speed: f32,
    /// Whether the clock starts paused.
    pub start_paused: bool,
    /// Multiplier applied by "speed up".
    pub speed_up_factor: f32,
    /// Multiplier applied by "slow down".
    pub slow_down_factor: f32,
    /// Lower bound for stepped speed changes.
    pub min_speed: f32,
    /// Upper bound for stepped speed changes.
    pub max_speed: f32,
    /// Animation ticks per second of wall-clock time.
    pub tick_rate: u32,
    /// Where viewers place a freshly selected sprite.
    pub spawn_point: Vec2,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            start_paused: DEFAULT_START_PAUSED,
            speed_up_factor: DEFAULT_SPEED_UP_FACTOR,
            slow_down_factor: DEFAULT_SLOW_DOWN_FACTOR,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            tick_rate: DEFAULT_TICK_RATE,
            spawn_point: Vec2::new(DEFAULT_SPAWN_X, DEFAULT_SPAWN_Y),
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
    /// Missing or invalid values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|reason| ConfigError::Read {
            path: self.config_path.clone(),
            reason,
        })?;
        self.apply_ini(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|reason| ConfigError::Read {
                path: self.config_path.clone(),
                reason,
            })?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [playback] section
        if let Some(speed) = positive_float(config, "playback", "speed") {
            self.speed = speed;
        }
        if let Some(paused) = config.getbool("playback", "start_paused").ok().flatten() {
            self.start_paused = paused;
        }
        if let Some(factor) = positive_float(config, "playback", "speed_up_factor") {
            self.speed_up_factor = factor;
        }
        if let Some(factor) = positive_float(config, "playback", "slow_down_factor") {
            self.slow_down_factor = factor;
        }
        let min_speed = positive_float(config, "playback", "min_speed").unwrap_or(self.min_speed);
        let max_speed = positive_float(config, "playback", "max_speed").unwrap_or(self.max_speed);
        if min_speed <= max_speed {
            self.min_speed = min_speed;
            self.max_speed = max_speed;
        } else {
            warn!(
                "Ignoring speed bounds min={} max={}: min exceeds max",
                min_speed, max_speed
            );
        }

        // [loop] section
        match config.getuint("loop", "tick_rate").ok().flatten() {
            Some(0) => warn!("Ignoring tick_rate = 0"),
            Some(rate) => self.tick_rate = rate.min(u64::from(u32::MAX)) as u32,
            None => {}
        }

        // [scene] section
        if let Some(x) = config.getfloat("scene", "spawn_x").ok().flatten() {
            self.spawn_point.x = x as f32;
        }
        if let Some(y) = config.getfloat("scene", "spawn_y").ok().flatten() {
            self.spawn_point.y = y as f32;
        }

        info!(
            "Loaded config: speed={}, start_paused={}, steps={}/{}, bounds=[{}, {}], tick_rate={}, spawn=({}, {})",
            self.speed,
            self.start_paused,
            self.speed_up_factor,
            self.slow_down_factor,
            self.min_speed,
            self.max_speed,
            self.tick_rate,
            self.spawn_point.x,
            self.spawn_point.y
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [playback] section
        config.set("playback", "speed", Some(self.speed.to_string()));
        config.set("playback", "start_paused", Some(self.start_paused.to_string()));
        config.set(
            "playback",
            "speed_up_factor",
            Some(self.speed_up_factor.to_string()),
        );
        config.set(
            "playback",
            "slow_down_factor",
            Some(self.slow_down_factor.to_string()),
        );
        config.set("playback", "min_speed", Some(self.min_speed.to_string()));
        config.set("playback", "max_speed", Some(self.max_speed.to_string()));

        // [loop] section
        config.set("loop", "tick_rate", Some(self.tick_rate.to_string()));

        // [scene] section
        config.set("scene", "spawn_x", Some(self.spawn_point.x.to_string()));
        config.set("scene", "spawn_y", Some(self.spawn_point.y.to_string()));

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Write {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Build the initial clock described by this configuration.
    pub fn clock(&self) -> PlaybackClock {
        let mut clock = PlaybackClock::new();
        self.apply_to(&mut clock);
        clock
    }

    /// Set the speed and run state of `clock` from this configuration.
    pub fn apply_to(&self, clock: &mut PlaybackClock) {
        if let Err(e) = clock.set_speed(self.speed) {
            warn!("Keeping clock speed {}: {}", clock.speed(), e);
        }
        if self.start_paused {
            clock.pause();
        } else {
            clock.resume();
        }
    }

    /// Convert wall-clock seconds into animation ticks.
    pub fn ticks_for(&self, seconds: f32) -> f32 {
        seconds * self.tick_rate as f32
    }

    /// Speed after one "speed up" step.
    pub fn faster(&self, speed: f32) -> f32 {
        self.bounded(speed * self.speed_up_factor)
    }

    /// Speed after one "slow down" step.
    pub fn slower(&self, speed: f32) -> f32 {
        self.bounded(speed * self.slow_down_factor)
    }

    /// Clamp `speed` to `[min_speed, max_speed]`. Unusable bounds leave it
    /// unclamped.
    fn bounded(&self, speed: f32) -> f32 {
        if self.min_speed <= self.max_speed {
            speed.clamp(self.min_speed, self.max_speed)
        } else {
            warn!(
                "Ignoring speed bounds min={} max={}",
                self.min_speed, self.max_speed
            );
            speed
        }
    }
}

fn positive_float(config: &Ini, section: &str, key: &str) -> Option<f32> {
    let value = config.getfloat(section, key).ok().flatten()?;
    let value = value as f32;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        warn!("Ignoring {section}.{key} = {value}: must be greater than zero");
        None
    }
}
