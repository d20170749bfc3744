use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::clicks::{DEFAULT_CLICK_CAPACITY, DEFAULT_SWEEP_INTERVAL_MS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Display refresh interval driving playback frames
    pub tick_rate_ms: u64,
    pub click_sweep_interval_ms: u64,
    pub click_capacity: usize,
    /// Percentage points moved by a single seek key press
    pub seek_step_percent: f64,
    pub mock_sessions: usize,
    /// Logical surface used when no terminal area is available
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            click_sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            click_capacity: DEFAULT_CLICK_CAPACITY,
            seek_step_percent: 5.0,
            mock_sessions: 25,
            surface_width: 1280,
            surface_height: 720,
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "rewind") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("rewind_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
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
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config")
                }
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
