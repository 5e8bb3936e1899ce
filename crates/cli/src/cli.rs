use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    exec_command, init_command, list_command, run_command, session_command, validate_command, watch_command,
};

#[derive(Parser, Debug)]
#[command(name = "npm-runner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Workspace root; repeat for a multi-root workspace (defaults to the current directory)
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub roots: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scripts of every discovered package.json
    #[command(visible_alias = "ls")]
    List {
        /// Command family: run-script (default), install, test, start, build, audit or outdated
        #[arg(long, value_name = "FAMILY")]
        family: Option<String>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a script, choosing among all scripts when no name is given
    #[command(visible_alias = "r")]
    Run {
        /// Script name
        script: Option<String>,

        /// Offer "Run all" when there is more than one match
        #[arg(short, long)]
        all: bool,

        /// Only use the package.json in this directory
        #[arg(long, value_name = "DIR")]
        dir: Option<String>,

        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,

        /// Answer the pick list with this 1-based entry
        #[arg(long, value_name = "N")]
        pick: Option<usize>,
    },
    /// Run install, test, start, build, audit or outdated
    #[command(visible_alias = "x")]
    Exec {
        /// One of: install, test, start, build, audit, outdated
        command: String,

        /// Offer "Run all" when there is more than one directory
        #[arg(short, long)]
        all: bool,

        /// Only use the package.json in this directory
        #[arg(long, value_name = "DIR")]
        dir: Option<String>,

        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,

        /// Answer the pick list with this 1-based entry
        #[arg(long, value_name = "N")]
        pick: Option<usize>,
    },
    /// Check installed modules against the declared dependencies
    Validate {
        /// Manifests to check (defaults to every discovered package.json)
        manifests: Vec<String>,

        /// Read the installed-module report from this file instead of running `npm ls`
        #[arg(long, value_name = "FILE")]
        report: Option<String>,
    },
    /// Re-validate manifests whenever they change
    Watch {
        /// Quiet window before a changed manifest is validated, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 1000)]
        quiet_ms: u64,
    },
    /// Interactive session: run, rerun, list and terminate scripts
    Session,
    /// Create .npm-runner.json listing every nested package.json
    Init {
        /// Specify the current working directory
        #[arg(short, long)]
        cwd: Option<String>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        let roots = self.roots;
        match self.command {
            Commands::List { family, json } => list_command(&roots, family.as_deref(), json),
            Commands::Run {
                script,
                all,
                dir,
                dry_run,
                pick,
            } => run_command(&roots, script, all, dir.as_deref(), dry_run, pick),
            Commands::Exec {
                command,
                all,
                dir,
                dry_run,
                pick,
            } => exec_command(&roots, &command, all, dir.as_deref(), dry_run, pick),
            Commands::Validate { manifests, report } => validate_command(&roots, &manifests, report.as_deref()),
            Commands::Watch { quiet_ms } => watch_command(&roots, quiet_ms),
            Commands::Session => session_command(&roots),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force),
        }
    }
}
