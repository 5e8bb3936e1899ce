//! Dependency validation against an installed-module report

pub mod report;
pub mod scheduler;
pub mod validator;

pub use report::{InstalledModuleReport, ModuleStatus};
pub use scheduler::ValidationScheduler;
pub use validator::{DependencyValidator, compute_diagnostics, has_problems};

use std::path::Path;

use crate::config::Settings;

/// Lockfiles of other package managers; their presence disables validation
pub const ALTERNATE_LOCKFILES: [&str; 2] = ["yarn.lock", "pnpm-lock.yaml"];

/// Whether the manifest in `directory` should be validated at all
pub fn should_validate(directory: &Path, settings: &Settings) -> bool {
    settings.validate
        && !ALTERNATE_LOCKFILES
            .iter()
            .any(|lockfile| directory.join(lockfile).exists())
}
