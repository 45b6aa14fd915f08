use crate::{
    command::WorkerCommand,
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: [&str; 2] = [".forkboot.json", "forkboot.json"];

fn default_work_dir() -> PathBuf {
    PathBuf::from("target/forkboot")
}

/// Settings of the parent process, read from `.forkboot.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForkSettings {
    /// Directory that receives transport files.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Keep transport files after workers exit.
    #[serde(default)]
    pub keep_files: bool,

    /// How to start a worker. Callers supply a default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerCommand>,
}

impl Default for ForkSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            keep_files: false,
            worker: None,
        }
    }
}

impl ForkSettings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a settings file.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    /// Settings for `start_path`: the nearest settings file, or defaults.
    /// A relative `work_dir` is resolved against the file's directory.
    pub fn discover(start_path: &Path) -> Result<Self> {
        let Some(path) = Self::find_config_file(start_path) else {
            tracing::debug!("No settings file above {:?}, using defaults", start_path);
            return Ok(Self::default());
        };

        let mut settings = Self::load_from_file(&path)?;
        if settings.work_dir.is_relative() {
            if let Some(base) = path.parent() {
                settings.work_dir = base.join(&settings.work_dir);
            }
        }
        Ok(settings)
    }
}
