//! File-system manifest store

use crate::interfaces::ManifestStore;
use std::io;
use std::path::Path;

/// Reads manifests straight from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FsManifestStore;

impl ManifestStore for FsManifestStore {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
