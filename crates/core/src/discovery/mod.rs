//! Directory set resolution
//!
//! Turns workspace roots plus their settings into the ordered list of
//! directories whose manifests are scanned. Nothing here touches the file
//! system; a directory without a manifest is dealt with by the reader.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::{
    config::Settings,
    interfaces::ConfigStore,
    types::{DirectoryEntry, WorkspaceRoot},
};

/// Resolve the directories of a single root: the root itself first (unless
/// `include_root` is off), then every extra directory in configuration order.
pub fn resolve_root(
    root: &WorkspaceRoot,
    settings: &Settings,
    known_roots: &[WorkspaceRoot],
) -> Vec<DirectoryEntry> {
    let mut directories = Vec::new();

    if settings.include_root {
        directories.push(entry_for(root.path.clone(), root, known_roots));
    }

    for extra in &settings.include_directories {
        let absolute = normalize(&root.path.join(extra));
        directories.push(entry_for(absolute, root, known_roots));
    }

    directories
}

/// Resolve every local root independently and concatenate the results.
/// Roots with a non-file scheme are skipped.
pub fn resolve_directories(roots: &[WorkspaceRoot], config: &dyn ConfigStore) -> Vec<DirectoryEntry> {
    let local_roots: Vec<WorkspaceRoot> = roots.iter().filter(|r| r.is_local()).cloned().collect();

    let directories: Vec<DirectoryEntry> = local_roots
        .iter()
        .flat_map(|root| {
            let settings = config.settings(&root.path);
            resolve_root(root, &settings, &local_roots)
        })
        .collect();

    debug!(
        "Resolved {} directories from {} roots ({} local)",
        directories.len(),
        roots.len(),
        local_roots.len()
    );

    directories
}

fn entry_for(absolute_path: PathBuf, owner: &WorkspaceRoot, known_roots: &[WorkspaceRoot]) -> DirectoryEntry {
    // Extra directories outside the owner fall back to the innermost root holding them
    let relative_path = relative_to(&absolute_path, &owner.path).or_else(|| {
        known_roots
            .iter()
            .filter(|root| absolute_path.starts_with(&root.path))
            .max_by_key(|root| root.path.components().count())
            .and_then(|root| relative_to(&absolute_path, &root.path))
    });

    DirectoryEntry {
        absolute_path,
        relative_path,
        root: owner.path.clone(),
        root_name: owner.name.clone(),
    }
}

/// `path` relative to `base` with `/` separators, if `path` lies under `base`
pub fn relative_to(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Lexically normalize a path (drop `.` and resolve `..`)
pub fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            Component::CurDir => {
                // Skip
            }
            c => {
                components.push(c);
            }
        }
    }

    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::entry_label;
    use crate::types::CommandDescriptor;
    use std::collections::HashMap;

    struct MapConfig(HashMap<PathBuf, Settings>);

    impl ConfigStore for MapConfig {
        fn settings(&self, root: &Path) -> Settings {
            self.0.get(root).cloned().unwrap_or_default()
        }
    }

    fn with_extras(extras: &[&str]) -> Settings {
        Settings {
            include_directories: extras.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_root_first_then_extras_in_order() {
        let root = WorkspaceRoot::local("/work/app");
        let settings = with_extras(&["packages/web", "packages/api"]);
        let dirs = resolve_root(&root, &settings, std::slice::from_ref(&root));

        let paths: Vec<_> = dirs.iter().map(|d| d.absolute_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/work/app"),
                PathBuf::from("/work/app/packages/web"),
                PathBuf::from("/work/app/packages/api"),
            ]
        );
        assert_eq!(dirs[0].relative_path.as_deref(), Some(""));
        assert_eq!(dirs[1].relative_path.as_deref(), Some("packages/web"));
    }

    #[test]
    fn test_exclude_root() {
        let root = WorkspaceRoot::local("/work/app");
        let settings = Settings {
            include_root: false,
            ..with_extras(&["client"])
        };
        let dirs = resolve_root(&root, &settings, std::slice::from_ref(&root));
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].absolute_path, PathBuf::from("/work/app/client"));
    }

    #[test]
    fn test_directory_outside_root_has_no_relative_path() {
        let root = WorkspaceRoot::local("/work/app");
        let dirs = resolve_root(&root, &with_extras(&["../shared"]), std::slice::from_ref(&root));
        assert_eq!(dirs[1].absolute_path, PathBuf::from("/work/shared"));
        assert_eq!(dirs[1].relative_path, None);
    }

    #[test]
    fn test_multi_root_concatenates_and_skips_remote() {
        let roots = vec![
            WorkspaceRoot::local("/work/a"),
            WorkspaceRoot::parse("vscode-remote://host/work/remote"),
            WorkspaceRoot::local("/work/b"),
        ];
        let config = MapConfig(HashMap::from([(
            PathBuf::from("/work/b"),
            with_extras(&["sub"]),
        )]));

        let dirs = resolve_directories(&roots, &config);
        let names: Vec<_> = dirs
            .iter()
            .map(|d| (d.root_name.as_str(), d.absolute_path.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a", PathBuf::from("/work/a")),
                ("b", PathBuf::from("/work/b")),
                ("b", PathBuf::from("/work/b/sub")),
            ]
        );
    }

    #[test]
    fn test_nested_roots_are_relative_to_their_owner() {
        let roots = vec![WorkspaceRoot::local("/w"), WorkspaceRoot::local("/w/pkg")];
        let config = MapConfig(HashMap::from([
            (PathBuf::from("/w"), with_extras(&["tools"])),
            (PathBuf::from("/w/pkg"), with_extras(&["../lib", "../../elsewhere"])),
        ]));

        let dirs = resolve_directories(&roots, &config);
        let relative: Vec<_> = dirs
            .iter()
            .map(|d| (d.root_name.as_str(), d.relative_path.as_deref()))
            .collect();
        assert_eq!(
            relative,
            vec![
                ("w", Some("")),
                ("w", Some("tools")),
                ("pkg", Some("")),
                ("pkg", Some("lib")),
                ("pkg", None),
            ]
        );

        let nested = &dirs[2];
        let descriptor = CommandDescriptor {
            absolute_path: nested.absolute_path.clone(),
            relative_path: nested.relative_path.clone(),
            name: "build".to_string(),
            command_line: "run-script tsc".to_string(),
            root: nested.root.clone(),
            root_name: nested.root_name.clone(),
        };
        assert_eq!(entry_label(&descriptor, true), "pkg: build");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("../x")), PathBuf::from("../x"));
    }
}
