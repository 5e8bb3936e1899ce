use anyhow::{Context, Result};
use std::{env, path::Path, path::PathBuf};
use tracing::info;
use walkdir::WalkDir;

use npm_runner_core::{Settings, config::CONFIG_FILE, discovery::relative_to, manifest::MANIFEST_FILE};

/// Directories never searched for nested manifests
const SKIPPED_DIRECTORIES: [&str; 3] = ["node_modules", "target", "dist"];

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    // Determine the project root
    let project_root = if let Some(cwd) = cwd {
        PathBuf::from(cwd)
    } else {
        env::current_dir().context("Failed to get current directory")?
    };

    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    println!("🚀 Initializing npm-runner in: {}", project_root.display());

    let settings = discover_settings(&project_root);
    println!(
        "📦 Found {} nested {} files",
        settings.include_directories.len(),
        MANIFEST_FILE
    );

    settings
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Created config: {}", config_path.display());

    println!("\n✅ Created config: {}", config_path.display());
    if !settings.include_root {
        println!("   • No {} in the root; include_root is off", MANIFEST_FILE);
    }
    for directory in &settings.include_directories {
        println!("   • {}", directory);
    }

    Ok(())
}

/// Settings whose directory list covers every manifest below `project_root`
pub fn discover_settings(project_root: &Path) -> Settings {
    let mut include_directories = Vec::new();

    for entry in WalkDir::new(project_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            match e.file_name().to_str() {
                Some(name) => !name.starts_with('.') && !SKIPPED_DIRECTORIES.contains(&name),
                None => false,
            }
        })
        .filter_map(|e| e.ok())
    {
        if entry.file_name() != MANIFEST_FILE || entry.depth() <= 1 {
            continue;
        }
        if let Some(relative) = entry.path().parent().and_then(|dir| relative_to(dir, project_root)) {
            include_directories.push(relative);
        }
    }

    Settings {
        include_root: project_root.join(MANIFEST_FILE).exists(),
        include_directories,
        ..Settings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_settings_skips_node_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), "{}").unwrap();
        for dir in ["packages/web", "packages/api", "node_modules/left-pad", ".cache/x"] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("package.json"), "{}").unwrap();
        }

        let settings = discover_settings(root);
        assert!(settings.include_root);
        assert_eq!(settings.include_directories, vec!["packages/api", "packages/web"]);
    }

    #[test]
    fn test_discover_settings_without_root_manifest() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();
        fs::write(temp_dir.path().join("app/package.json"), "{}").unwrap();

        let settings = discover_settings(temp_dir.path());
        assert!(!settings.include_root);
        assert_eq!(settings.include_directories, vec!["app"]);
    }
}
