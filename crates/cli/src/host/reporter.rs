//! Installed-module report from `<bin> ls --depth 0 --json`

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use npm_runner_core::{
    error::{Error, Result},
    interfaces::InstalledModuleReporter,
};

pub const LS_ARGS: [&str; 4] = ["ls", "--depth", "0", "--json"];

#[derive(Debug, Default, Clone, Copy)]
pub struct NpmLsReporter;

impl InstalledModuleReporter for NpmLsReporter {
    fn invoke(&self, directory: &Path, bin: &str) -> Result<String> {
        let shell_cmd = format!("{} {}", bin, LS_ARGS.join(" "));
        debug!("Running '{}' in {}", shell_cmd, directory.display());

        let output = Command::new(bin)
            .args(LS_ARGS)
            .current_dir(directory)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: shell_cmd.clone(),
                source,
            })?;

        // A non-zero exit only means problems were found; the JSON is still on stdout
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(Error::Other(format!(
                "'{}' produced no report: {}",
                shell_cmd,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(stdout)
    }
}
