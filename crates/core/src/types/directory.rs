use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const FILE_SCHEME: &str = "file";

/// A workspace root as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRoot {
    pub path: PathBuf,
    pub name: String,
    pub scheme: String,
}

impl WorkspaceRoot {
    /// Create a local (file scheme) root named after its last path component
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            scheme: FILE_SCHEME.to_string(),
        }
    }

    /// Parse a root given either as a plain path or as a `scheme://` URI.
    ///
    /// `file://` URIs are turned into local roots; any other scheme is kept
    /// as-is so the resolver can skip it.
    pub fn parse(input: &str) -> Self {
        match input.split_once("://") {
            Some((scheme, rest)) if scheme == FILE_SCHEME => Self::local(rest),
            Some((scheme, rest)) => Self {
                path: PathBuf::from(rest),
                name: rest.rsplit('/').next().unwrap_or(rest).to_string(),
                scheme: scheme.to_string(),
            },
            None => Self::local(input),
        }
    }

    pub fn is_local(&self) -> bool {
        self.scheme == FILE_SCHEME
    }
}

/// A directory believed to contain a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub absolute_path: PathBuf,
    /// Path relative to the owning root, absent when the directory lies outside every root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    pub root: PathBuf,
    pub root_name: String,
}

impl DirectoryEntry {
    pub fn manifest_path(&self) -> PathBuf {
        self.absolute_path.join(crate::manifest::MANIFEST_FILE)
    }

    pub fn is_root(&self) -> bool {
        self.absolute_path == self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let root = WorkspaceRoot::parse("/home/dev/app");
        assert_eq!(root.path, PathBuf::from("/home/dev/app"));
        assert_eq!(root.name, "app");
        assert!(root.is_local());
    }

    #[test]
    fn test_parse_file_uri() {
        let root = WorkspaceRoot::parse("file:///home/dev/app");
        assert_eq!(root.path, PathBuf::from("/home/dev/app"));
        assert!(root.is_local());
    }

    #[test]
    fn test_parse_remote_uri() {
        let root = WorkspaceRoot::parse("vscode-remote://ssh-host/srv/app");
        assert_eq!(root.scheme, "vscode-remote");
        assert_eq!(root.name, "app");
        assert!(!root.is_local());
    }
}
