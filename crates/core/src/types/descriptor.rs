use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const RUN_SCRIPT: &str = "run-script";

/// Single-word npm subcommands that run once per directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedCommand {
    Install,
    Test,
    Start,
    Build,
    Audit,
    Outdated,
}

impl FixedCommand {
    pub const ALL: [FixedCommand; 6] = [
        FixedCommand::Install,
        FixedCommand::Test,
        FixedCommand::Start,
        FixedCommand::Build,
        FixedCommand::Audit,
        FixedCommand::Outdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixedCommand::Install => "install",
            FixedCommand::Test => "test",
            FixedCommand::Start => "start",
            FixedCommand::Build => "build",
            FixedCommand::Audit => "audit",
            FixedCommand::Outdated => "outdated",
        }
    }
}

impl fmt::Display for FixedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixedCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FixedCommand::ALL
            .into_iter()
            .find(|command| command.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Other(format!("Unknown npm command: '{s}'")))
    }
}

/// The class of command a catalog is built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandFamily {
    /// `run-script`, optionally filtered to a single script name
    RunScript(Option<String>),
    Fixed(FixedCommand),
}

impl CommandFamily {
    pub fn all_scripts() -> Self {
        CommandFamily::RunScript(None)
    }

    pub fn script(name: impl Into<String>) -> Self {
        CommandFamily::RunScript(Some(name.into()))
    }

    /// Build a family from its argument form: `["run-script"]`,
    /// `["run-script", name]` or a one-word fixed command such as `["install"]`
    pub fn from_args(args: &[&str]) -> Result<Self> {
        match args {
            [RUN_SCRIPT] => Ok(Self::all_scripts()),
            [RUN_SCRIPT, name] => Ok(Self::script(*name)),
            [single] => Ok(CommandFamily::Fixed(single.parse()?)),
            _ => Err(Error::Other(format!(
                "Unsupported command family: '{}'",
                args.join(" ")
            ))),
        }
    }

    /// Base argument array shared by every entry of this family
    pub fn base_args(&self) -> Vec<String> {
        match self {
            CommandFamily::RunScript(_) => vec![RUN_SCRIPT.to_string()],
            CommandFamily::Fixed(command) => vec![command.as_str().to_string()],
        }
    }

    /// The error reported when a catalog for this family comes back empty
    pub fn not_found(&self) -> Error {
        match self {
            CommandFamily::RunScript(Some(name)) => Error::ScriptNotFound(name.clone()),
            CommandFamily::RunScript(None) => Error::NoScripts,
            CommandFamily::Fixed(command) => Error::NoDirectories(command.to_string()),
        }
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFamily::RunScript(Some(name)) => write!(f, "{RUN_SCRIPT} {name}"),
            CommandFamily::RunScript(None) => f.write_str(RUN_SCRIPT),
            CommandFamily::Fixed(command) => write!(f, "{command}"),
        }
    }
}

/// One runnable unit: a named script, or a fixed subcommand applied to one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub absolute_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    pub name: String,
    /// Literal command line shown to the user, e.g. `run-script tsc -p .`
    pub command_line: String,
    pub root: PathBuf,
    pub root_name: String,
}
