use crate::manifest::Manifest;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Parsed manifests keyed by path, validated against an md5 digest of the text
#[derive(Debug)]
pub struct ManifestCache {
    entries: LruCache<PathBuf, CacheEntry>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    manifest: Manifest,
    text_hash: String,
}

impl Default for ManifestCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ManifestCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Cached manifest for `path`, only if it was parsed from exactly `text`
    pub fn get(&mut self, path: &Path, text: &str) -> Option<Manifest> {
        let hash = compute_hash(text);
        let entry = self.entries.get(path)?;

        if entry.text_hash != hash {
            return None;
        }

        Some(entry.manifest.clone())
    }

    pub fn insert(&mut self, path: PathBuf, text: &str, manifest: Manifest) {
        let entry = CacheEntry {
            manifest,
            text_hash: compute_hash(text),
        };
        self.entries.put(path, entry);
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.pop(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compute_hash(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}
