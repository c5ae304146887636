//! Configuration loading and file resolution
//!
//! Configuration is a single optional TOML file. Every field has a built-in
//! default, so a missing file is not an error: a warning is logged and the
//! defaults are used.
//!
//! # Config file priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `EAR_SHARPENER_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/ear-sharpener/config.toml` on Linux)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "EAR_SHARPENER_CONFIG";

const APP_DIR_NAME: &str = "ear-sharpener";

/// Complete configuration file contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub pacing: PacingConfig,
    pub audio: AudioConfig,

    /// Where level and step are saved between sessions
    ///
    /// Falls back to the platform data directory when not set.
    pub progress_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Delays that pace the present → guess → present cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after any piano game guess before presenting again
    pub piano_delay_ms: u64,

    /// Delay after a correct note name or note distance guess
    pub correct_delay_ms: u64,

    /// Pause between games after a correct combo guess
    pub combo_pause_ms: u64,

    /// Lower bound of the randomized gap between sequenced notes
    pub note_delay_min_ms: u64,

    /// Upper bound of the randomized gap between sequenced notes
    pub note_delay_max_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            piano_delay_ms: 1000,
            correct_delay_ms: 500,
            combo_pause_ms: 1000,
            note_delay_min_ms: 350,
            note_delay_max_ms: 1000,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero, for tests and scripted sessions
    pub fn instant() -> Self {
        Self {
            piano_delay_ms: 0,
            correct_delay_ms: 0,
            combo_pause_ms: 0,
            note_delay_min_ms: 0,
            note_delay_max_ms: 0,
        }
    }

    pub fn piano_delay(&self) -> Duration {
        Duration::from_millis(self.piano_delay_ms)
    }

    pub fn correct_delay(&self) -> Duration {
        Duration::from_millis(self.correct_delay_ms)
    }

    pub fn combo_pause(&self) -> Duration {
        Duration::from_millis(self.combo_pause_ms)
    }

    /// Random gap between two sequenced notes within the configured bounds
    pub fn random_note_delay(&self) -> Duration {
        use rand::Rng;

        let min = self.note_delay_min_ms.min(self.note_delay_max_ms);
        let max = self.note_delay_min_ms.max(self.note_delay_max_ms);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Audio playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Volume for a single note (0.0-1.0)
    pub single_volume: f32,

    /// Volume for each note when many play at once (0.0-1.0)
    pub concert_volume: f32,

    /// Directory holding the piano note files; assets are not checked when unset
    pub asset_dir: Option<PathBuf>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            single_volume: 0.9,
            concert_volume: 0.25,
            asset_dir: None,
        }
    }
}

impl TomlConfig {
    /// Parses configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.audio.single_volume = config.audio.single_volume.clamp(0.0, 1.0);
        config.audio.concert_volume = config.audio.concert_volume.clamp(0.0, 1.0);
        Ok(config)
    }

    /// Loads configuration from `path`
    ///
    /// A missing file yields the defaults with a warning. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolves the config file location and loads it
    pub fn load_resolved(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            Some(path) => Self::load(&path),
            None => {
                warn!("No config directory available on this platform, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Configured progress file, or the platform default
    pub fn progress_file(&self) -> Option<PathBuf> {
        self.progress_file.clone().or_else(default_progress_file)
    }
}

/// Picks the config file path by priority: CLI argument, environment, platform default.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

/// Platform default progress file location
pub fn default_progress_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME).join("progress.toml"))
}
