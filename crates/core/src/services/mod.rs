//! Default capability implementations backed by the local machine

pub mod file_config_store;
pub mod fs_manifest_store;
pub mod signaler;
pub mod static_roots;
pub mod std_spawner;

pub use file_config_store::FileConfigStore;
pub use fs_manifest_store::FsManifestStore;
pub use signaler::SystemSignaler;
pub use static_roots::StaticRoots;
pub use std_spawner::StdProcessSpawner;
