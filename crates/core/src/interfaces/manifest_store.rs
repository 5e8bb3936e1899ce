//! Manifest store interface
//!
//! Abstracts file reads so manifests can come from disk, an editor buffer or memory.

use std::io;
use std::path::Path;

pub trait ManifestStore {
    /// Read the full text of the file at `path`
    fn read_file(&self, path: &Path) -> io::Result<String>;
}
