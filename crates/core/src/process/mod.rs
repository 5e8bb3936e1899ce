//! Tracking of spawned package-manager processes

pub mod tracker;

pub use tracker::{ProcessTracker, TrackedProcess};

/// Signal sent when the user terminates a script
pub const TERMINATE_SIGNAL: &str = "SIGTERM";
