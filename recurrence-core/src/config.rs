//! Global recurrence configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::date::DayOverflow;
use crate::error::{RecurrenceError, RecurrenceResult};

static DEFAULT_DATA_FILE: &str = "~/.recurrence";

/// Days ahead of today that listings scan for upcoming occurrences.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

/// Global configuration at ~/.config/recurrence/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecurrenceConfig {
    /// Where reminders are stored. `~` is expanded.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    #[serde(default)]
    pub day_overflow: DayOverflow,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        RecurrenceConfig {
            data_file: default_data_file(),
            horizon_days: DEFAULT_HORIZON_DAYS,
            day_overflow: DayOverflow::default(),
        }
    }
}

impl RecurrenceConfig {
    pub fn config_path() -> RecurrenceResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RecurrenceError::Config("Could not determine config directory".into()))?
            .join("recurrence");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented-out default file first if
    /// there is none yet.
    pub fn load() -> RecurrenceResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> RecurrenceResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| RecurrenceError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RecurrenceError::Config(e.to_string()))
    }

    /// The data file path with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The effective settings, in config file syntax.
    pub fn to_toml(&self) -> RecurrenceResult<String> {
        toml::to_string_pretty(self).map_err(|e| RecurrenceError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> RecurrenceResult<()> {
        let contents = format!(
            "\
# recurrence configuration

# Where your reminders are stored:
# data_file = \"{}\"

# How many days ahead to list upcoming reminders:
# horizon_days = {}

# Monthly/yearly reminders on a day the month lacks (e.g. the 31st):
# \"clamp\" moves them to the month's last day, \"reject\" reports an error.
# day_overflow = \"clamp\"
",
            DEFAULT_DATA_FILE, DEFAULT_HORIZON_DAYS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecurrenceError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RecurrenceError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
