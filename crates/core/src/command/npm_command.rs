use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// A package-manager invocation in a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmCommand {
    pub program: String,
    /// Arguments as they appear on the shell command line; script names with
    /// whitespace are already quoted
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl NpmCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = self.program.clone();
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        cmd
    }

    /// A `std::process::Command` running this invocation through the platform shell
    pub fn shell_command(&self) -> Command {
        let line = self.to_shell_command();

        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(line);
            cmd
        };
        // exec so the tracked pid is the package manager itself, not the shell
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(format!("exec {line}"));
            cmd
        };

        cmd.current_dir(&self.working_dir);
        cmd
    }

    /// Run to completion with inherited stdio
    pub fn execute(&self) -> io::Result<ExitStatus> {
        self.shell_command().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_shell_command() {
        let cmd = NpmCommand::new(
            "npm",
            vec!["run-script".to_string(), "\"build prod\"".to_string()],
            "/app",
        );
        assert_eq!(cmd.to_shell_command(), "npm run-script \"build prod\"");
        assert_eq!(cmd.working_dir(), Path::new("/app"));
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_runs_in_working_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let cmd = NpmCommand::new("test", vec!["-d".to_string(), ".".to_string()], temp_dir.path());
        let status = cmd.execute().unwrap();
        assert!(status.success());
    }
}
