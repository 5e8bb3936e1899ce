//! Configuration management for npm-runner

mod settings;

// Re-export main types
pub use settings::{CONFIG_FILE, ExecutionMode, Settings};
