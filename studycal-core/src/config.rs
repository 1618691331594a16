//! Global studycal configuration.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StudycalError, StudycalResult};

static DEFAULT_EVENTS_FILE: &str = "~/.studycal/events.json";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

/// First column of the month grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Configuration at ~/.config/studycal/config.toml
///
/// Every key can also be set through a `STUDYCAL_`-prefixed environment
/// variable, e.g. `STUDYCAL_EVENTS_FILE`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StudycalConfig {
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for StudycalConfig {
    fn default() -> Self {
        StudycalConfig {
            events_file: default_events_file(),
            week_start: WeekStart::default(),
        }
    }
}

impl StudycalConfig {
    pub fn config_path() -> StudycalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StudycalError::Config("Could not determine config directory".into()))?
            .join("studycal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file on first run.
    pub fn load() -> StudycalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, Some(Environment::with_prefix("STUDYCAL")))
    }

    /// Load config from `path` (which may be missing) plus optional
    /// environment overrides.
    pub fn load_from(path: &Path, env: Option<Environment>) -> StudycalResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder
            .build()
            .map_err(|e| StudycalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StudycalError::Config(e.to_string()))
    }

    /// Event file path with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> StudycalResult<()> {
        let contents = format!(
            "\
# studycal configuration

# Where your events are stored:
# events_file = \"{}\"

# First day of the week in the month view (\"monday\" or \"sunday\"):
# week_start = \"monday\"
",
            DEFAULT_EVENTS_FILE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StudycalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StudycalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
