use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".npm-runner.json";

/// Where commands run: as tracked child processes, or inside an interactive terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Tracked,
    Terminal,
}

/// Per-root settings, read from `.npm-runner.json` in the workspace root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Settings {
    /// Look for a manifest in the root itself
    pub include_root: bool,
    /// Extra directories, relative to the root, that hold manifests
    pub include_directories: Vec<String>,
    /// Pass `--silent` to every invocation
    pub run_silent: bool,
    /// Package manager binary
    pub bin: String,
    /// Validate installed modules against the manifest
    pub validate: bool,
    /// Delegate commands to an interactive terminal instead of tracking them
    pub run_in_terminal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_root: true,
            include_directories: Vec::new(),
            run_silent: false,
            bin: "npm".to_string(),
            validate: true,
            run_in_terminal: false,
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Find the nearest settings file at or above `start_path`
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        if self.run_in_terminal {
            ExecutionMode::Terminal
        } else {
            ExecutionMode::Tracked
        }
    }
}
