use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::words::DEFAULT_BATCH_SIZE;

/// Countdown length for a session. The set is deliberately small; changing
/// the mode always resets the session.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
    Default,
)]
pub enum DurationMode {
    #[value(name = "15")]
    #[strum(serialize = "15s")]
    Secs15,
    #[default]
    #[value(name = "30")]
    #[strum(serialize = "30s")]
    Secs30,
    #[value(name = "60")]
    #[strum(serialize = "60s")]
    Secs60,
}

impl DurationMode {
    pub fn as_secs(&self) -> u64 {
        match self {
            DurationMode::Secs15 => 15,
            DurationMode::Secs30 => 30,
            DurationMode::Secs60 => 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_mode: DurationMode,
    pub number_of_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_mode: DurationMode::default(),
            number_of_words: DEFAULT_BATCH_SIZE,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typero") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typero_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
