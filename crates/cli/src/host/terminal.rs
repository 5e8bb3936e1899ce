//! Commands delegated to the user's terminal

use tracing::{info, warn};

use npm_runner_core::{
    command::NpmCommand,
    error::{Error, Result},
    interfaces::Terminal,
};

/// Runs the command with inherited stdio and waits for it
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedTerminal;

impl Terminal for InheritedTerminal {
    fn run(&mut self, command: &NpmCommand) -> Result<()> {
        let shell_cmd = command.to_shell_command();
        info!("Running: {}", shell_cmd);
        info!("Working directory: {}", command.working_dir().display());

        let status = command.execute().map_err(|source| Error::Spawn {
            command: shell_cmd.clone(),
            source,
        })?;

        if !status.success() {
            warn!("'{}' exited with {}", shell_cmd, status);
        }
        Ok(())
    }
}
