use anyhow::{Context, Result};
use tracing::debug;

use npm_runner_core::{CommandFamily, Dispatch, FixedCommand, Selection};

use crate::display::format_command_preview;
use crate::host::{Host, absolute};

pub fn run_command(
    roots: &[String],
    script: Option<String>,
    all: bool,
    dir: Option<&str>,
    dry_run: bool,
    pick: Option<usize>,
) -> Result<()> {
    let family = match script {
        Some(name) => CommandFamily::script(name),
        None => CommandFamily::all_scripts(),
    };
    run_family(roots, &family, all, dir, dry_run, pick)
}

pub fn exec_command(
    roots: &[String],
    command: &str,
    all: bool,
    dir: Option<&str>,
    dry_run: bool,
    pick: Option<usize>,
) -> Result<()> {
    let command: FixedCommand = command.parse()?;
    run_family(roots, &CommandFamily::Fixed(command), all, dir, dry_run, pick)
}

fn run_family(
    roots: &[String],
    family: &CommandFamily,
    all: bool,
    dir: Option<&str>,
    dry_run: bool,
    pick: Option<usize>,
) -> Result<()> {
    debug!("Running '{}' (all: {}, dir: {:?})", family, all, dir);

    let mut host = Host::new(roots, pick)?;
    let directory = dir
        .map(|d| absolute(std::path::Path::new(d)))
        .transpose()
        .context("Invalid --dir")?;

    if dry_run {
        let selection = match &directory {
            Some(directory) => host.session.select_in_directory(family, directory, all)?,
            None => host.session.select(family, all)?,
        };

        if let Selection::Chosen(action) = selection {
            for command in host.session.commands_for(&action) {
                println!("{}", format_command_preview(&command));
            }
        }
        return Ok(());
    }

    let outcome = match &directory {
        Some(directory) => host.session.run_in_directory(family, directory, all),
        None => host.session.run(family, all),
    };
    host.wait_for_processes();

    match outcome {
        Dispatch::Executed { failed: 0, .. } | Dispatch::Cancelled => Ok(()),
        _ => std::process::exit(1),
    }
}
