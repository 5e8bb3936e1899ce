//! npm-runner - Discover and run npm scripts across workspace folders
//!
//! This crate provides functionality to:
//! - Find the `package.json` manifests of a workspace and catalog their scripts
//! - Resolve a catalog into an action, including "run all", through a host prompt
//! - Track and terminate the package-manager processes it starts
//! - Validate installed modules against the manifest and report source-ranged diagnostics
pub mod cache;
pub mod catalog;
pub mod command;
pub mod config;
pub mod deps;
pub mod discovery;
pub mod error;
pub mod interfaces;
pub mod manifest;
pub mod parser;
pub mod process;
pub mod selection;
pub mod services;
pub mod session;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use catalog::CatalogBuilder;
pub use command::{Action, NpmCommand};
pub use config::{ExecutionMode, Settings};
pub use deps::{DependencyValidator, ValidationScheduler};
pub use manifest::{Manifest, ManifestReader};
pub use selection::Selection;
pub use session::{Dispatch, HostServices, PendingValidation, Session, Termination, ValidationOutcome};
