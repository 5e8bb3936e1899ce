//! Executable actions bound to catalog entries

use std::path::PathBuf;

use super::npm_command::NpmCommand;
use crate::{
    config::Settings,
    types::{CommandDescriptor, CommandFamily, FixedCommand},
};

/// What selecting an entry does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunScript {
        directory: PathBuf,
        root: PathBuf,
        name: String,
    },
    RunFixed {
        directory: PathBuf,
        root: PathBuf,
        command: FixedCommand,
    },
    /// Every real entry of a catalog. Built from descriptors only, so it can
    /// never contain itself.
    RunAll { members: Vec<Action> },
}

impl Action {
    pub fn for_descriptor(descriptor: &CommandDescriptor, family: &CommandFamily) -> Self {
        match family {
            CommandFamily::RunScript(_) => Action::RunScript {
                directory: descriptor.absolute_path.clone(),
                root: descriptor.root.clone(),
                name: descriptor.name.clone(),
            },
            CommandFamily::Fixed(command) => Action::RunFixed {
                directory: descriptor.absolute_path.clone(),
                root: descriptor.root.clone(),
                command: *command,
            },
        }
    }

    pub fn run_all(catalog: &[CommandDescriptor], family: &CommandFamily) -> Self {
        Action::RunAll {
            members: catalog
                .iter()
                .map(|descriptor| Action::for_descriptor(descriptor, family))
                .collect(),
        }
    }

    /// Only script actions can be rerun
    pub fn is_rerunnable(&self) -> bool {
        matches!(self, Action::RunScript { .. })
    }

    pub fn root(&self) -> Option<&PathBuf> {
        match self {
            Action::RunScript { root, .. } | Action::RunFixed { root, .. } => Some(root),
            Action::RunAll { .. } => None,
        }
    }

    /// The concrete invocation, `None` for [`Action::RunAll`] which has no working directory
    pub fn to_command(&self, settings: &Settings) -> Option<NpmCommand> {
        let (family, directory, name) = match self {
            Action::RunScript { directory, name, .. } => {
                (CommandFamily::all_scripts(), directory, Some(name))
            }
            Action::RunFixed {
                directory, command, ..
            } => (CommandFamily::Fixed(*command), directory, None),
            Action::RunAll { .. } => return None,
        };

        // Fresh copy of the family's base args for every invocation
        let mut args = family.base_args();
        if settings.run_silent {
            args.push("--silent".to_string());
        }
        if let Some(name) = name {
            args.push(quote_script_name(name));
        }

        Some(NpmCommand::new(settings.bin.clone(), args, directory.clone()))
    }
}

/// Quote a script name that contains whitespace so the shell passes it as one argument
pub fn quote_script_name(name: &str) -> String {
    if name.chars().any(char::is_whitespace) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> CommandDescriptor {
        CommandDescriptor {
            absolute_path: PathBuf::from("/app/web"),
            relative_path: Some("web".to_string()),
            name: name.to_string(),
            command_line: format!("run-script echo {name}"),
            root: PathBuf::from("/app"),
            root_name: "app".to_string(),
        }
    }

    #[test]
    fn test_script_command_quotes_whitespace() {
        let action = Action::for_descriptor(&descriptor("build prod"), &CommandFamily::all_scripts());
        let cmd = action.to_command(&Settings::default()).unwrap();
        assert_eq!(cmd.to_shell_command(), "npm run-script \"build prod\"");
        assert_eq!(cmd.working_dir, PathBuf::from("/app/web"));
    }

    #[test]
    fn test_silent_and_bin_override() {
        let settings = Settings {
            run_silent: true,
            bin: "pnpm".to_string(),
            ..Default::default()
        };
        let action = Action::for_descriptor(&descriptor("lint"), &CommandFamily::script("lint"));
        let cmd = action.to_command(&settings).unwrap();
        assert_eq!(cmd.to_shell_command(), "pnpm run-script --silent lint");
    }

    #[test]
    fn test_fixed_command() {
        let family = CommandFamily::Fixed(FixedCommand::Install);
        let action = Action::for_descriptor(&descriptor("install"), &family);
        assert!(!action.is_rerunnable());
        let cmd = action.to_command(&Settings::default()).unwrap();
        assert_eq!(cmd.to_shell_command(), "npm install");
    }

    #[test]
    fn test_run_all_has_no_command_and_no_self() {
        let catalog = vec![descriptor("a"), descriptor("b")];
        let action = Action::run_all(&catalog, &CommandFamily::all_scripts());
        assert!(action.to_command(&Settings::default()).is_none());
        match action {
            Action::RunAll { members } => {
                assert_eq!(members.len(), 2);
                assert!(members.iter().all(|m| !matches!(m, Action::RunAll { .. })));
            }
            other => panic!("expected RunAll, got {other:?}"),
        }
    }
}
