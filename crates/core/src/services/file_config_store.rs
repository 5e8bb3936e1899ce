//! Settings read from `.npm-runner.json` in each workspace root

use std::path::Path;
use tracing::warn;

use crate::{
    config::{CONFIG_FILE, Settings},
    interfaces::ConfigStore,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct FileConfigStore;

impl ConfigStore for FileConfigStore {
    fn settings(&self, root: &Path) -> Settings {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Settings::default();
        }

        match Settings::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(FileConfigStore.settings(temp_dir.path()), Settings::default());
    }

    #[test]
    fn test_reads_root_settings() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{"include_directories": ["client"], "run_silent": true}"#,
        )
        .unwrap();

        let settings = FileConfigStore.settings(temp_dir.path());
        assert_eq!(settings.include_directories, vec!["client".to_string()]);
        assert!(settings.run_silent);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "{").unwrap();
        assert_eq!(FileConfigStore.settings(temp_dir.path()), Settings::default());
    }
}
