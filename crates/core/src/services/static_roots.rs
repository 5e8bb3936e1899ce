//! A fixed list of workspace roots

use crate::{interfaces::RootEnumerator, types::WorkspaceRoot};

#[derive(Debug, Default, Clone)]
pub struct StaticRoots {
    roots: Vec<WorkspaceRoot>,
}

impl StaticRoots {
    pub fn new(roots: Vec<WorkspaceRoot>) -> Self {
        Self { roots }
    }
}

impl RootEnumerator for StaticRoots {
    fn roots(&self) -> Vec<WorkspaceRoot> {
        self.roots.clone()
    }
}
