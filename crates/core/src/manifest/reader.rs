use std::path::Path;
use tracing::debug;

use super::{MANIFEST_FILE, Manifest};
use crate::{
    cache::ManifestCache,
    error::{Error, Result},
    interfaces::ManifestStore,
};

/// Reads and parses the manifest of a directory through a [`ManifestStore`]
pub struct ManifestReader<'a> {
    store: &'a dyn ManifestStore,
    cache: Option<&'a mut ManifestCache>,
}

impl<'a> ManifestReader<'a> {
    pub fn new(store: &'a dyn ManifestStore) -> Self {
        Self { store, cache: None }
    }

    pub fn with_cache(mut self, cache: &'a mut ManifestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Read the manifest in `directory`. Whether a failure is fatal is up to the caller.
    pub fn read(&mut self, directory: &Path) -> Result<Manifest> {
        let path = directory.join(MANIFEST_FILE);
        let text = self
            .store
            .read_file(&path)
            .map_err(|source| Error::ManifestRead {
                path: path.clone(),
                source,
            })?;

        if let Some(cache) = self.cache.as_deref_mut() {
            if let Some(manifest) = cache.get(&path, &text) {
                debug!("Manifest cache hit: {}", path.display());
                return Ok(manifest);
            }
        }

        let manifest = Manifest::parse(&text, &path)?;

        if let Some(cache) = self.cache.as_deref_mut() {
            cache.insert(path, &text, manifest.clone());
        }

        Ok(manifest)
    }

    /// Like [`read`](Self::read), but a missing or malformed manifest yields `None`
    pub fn read_lenient(&mut self, directory: &Path) -> Option<Manifest> {
        match self.read(directory) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                debug!("Skipping {}: {}", directory.display(), e);
                None
            }
        }
    }
}
