//! Session configuration. Loaded from config.ron at startup.

use hover::HoverTuning;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::terrain::TerrainConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Physics rate in Hz.
    #[serde(default = "default_fixed_rate")]
    pub fixed_rate: f64,
    /// Length of the scripted session in seconds.
    #[serde(default = "default_session_seconds")]
    pub session_seconds: f32,
    /// Seed for terrain and the autopilot.
    #[serde(default)]
    pub seed: u64,
    /// Log at debug level.
    #[serde(default)]
    pub debug_mode: bool,
    /// Place the demo speed zone along the route.
    #[serde(default = "default_true")]
    pub enable_speed_zones: bool,
    /// Speed multiplier inside speed zones (1.1 to 3.0).
    #[serde(default = "default_speed_boost")]
    pub speed_boost_multiplier: f32,
    /// Equip speed boots and jump pack at start.
    #[serde(default = "default_true")]
    pub enable_equipment: bool,
    #[serde(default)]
    pub hover: HoverTuning,
    #[serde(default)]
    pub terrain: TerrainConfig,
}

fn default_fixed_rate() -> f64 {
    50.0
}
fn default_session_seconds() -> f32 {
    25.0
}
fn default_true() -> bool {
    true
}
fn default_speed_boost() -> f32 {
    1.5
}

/// Accepted range for the speed-zone multiplier.
pub const SPEED_BOOST_RANGE: (f32, f32) = (1.1, 3.0);

/// Accepted physics rates in Hz.
pub const FIXED_RATE_RANGE: (f64, f64) = (10.0, 1000.0);

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_rate: default_fixed_rate(),
            session_seconds: default_session_seconds(),
            seed: 0,
            debug_mode: false,
            enable_speed_zones: default_true(),
            speed_boost_multiplier: default_speed_boost(),
            enable_equipment: default_true(),
            hover: HoverTuning::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. A missing file yields the defaults.
    /// Values are not range-checked here; see [`GameConfig::validated`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => match std::fs::write(&path, s) {
                Ok(()) => log::info!("Wrote {:?}", path),
                Err(e) => log::warn!("Could not write config to {:?}: {}", path, e),
            },
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Clamp values into their accepted ranges.
    pub fn validated(mut self) -> Self {
        let (lo, hi) = SPEED_BOOST_RANGE;
        if !(lo..=hi).contains(&self.speed_boost_multiplier) {
            log::warn!(
                "speed_boost_multiplier {} outside {}..={}, clamping",
                self.speed_boost_multiplier,
                lo,
                hi
            );
            self.speed_boost_multiplier = self.speed_boost_multiplier.clamp(lo, hi);
        }
        let (lo, hi) = FIXED_RATE_RANGE;
        if self.fixed_rate.is_nan() || self.fixed_rate <= 0.0 {
            log::warn!("fixed_rate {} is not positive, using default", self.fixed_rate);
            self.fixed_rate = default_fixed_rate();
        } else if !(lo..=hi).contains(&self.fixed_rate) {
            log::warn!("fixed_rate {} outside {}..={} Hz, clamping", self.fixed_rate, lo, hi);
            self.fixed_rate = self.fixed_rate.clamp(lo, hi);
        }
        self.hover = self.hover.sanitized();
        self
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
