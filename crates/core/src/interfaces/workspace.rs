//! Workspace root enumeration and per-root configuration

use std::path::Path;

use crate::{config::Settings, types::WorkspaceRoot};

pub trait RootEnumerator {
    /// All workspace roots, local or not, in host order
    fn roots(&self) -> Vec<WorkspaceRoot>;
}

pub trait ConfigStore {
    /// Settings that apply to the workspace root at `root`
    fn settings(&self, root: &Path) -> Settings;
}
