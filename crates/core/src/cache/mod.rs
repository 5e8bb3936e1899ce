//! Caching of parsed manifests

pub mod manifest_cache;

// Re-export the main cache type
pub use manifest_cache::ManifestCache;
