use anyhow::Result;
use std::io::Write;
use tracing::debug;

use npm_runner_core::{CommandFamily, FixedCommand, Termination, process::TERMINATE_SIGNAL};

use crate::display::format_catalog;
use crate::host::{Host, HostEvent};

const HELP: &str = "\
Commands:
  run [SCRIPT]       run a script, choosing when several match
  all [SCRIPT]       like run, with a \"Run all\" entry
  exec COMMAND       install, test, start, build, audit or outdated
  rerun              run the last script again
  list               list every script
  ps                 show running scripts
  kill [PID]         terminate a running script
  validate           check installed modules of every package.json
  help               show this help
  quit               leave once running scripts have finished";

pub fn session_command(roots: &[String]) -> Result<()> {
    let mut host = Host::new(roots, None)?;
    host.queue.borrow_mut().start_input();

    println!("🚀 npm-runner session. Type 'help' for commands.");
    prompt();

    loop {
        let event = host.queue.borrow_mut().next();
        match event {
            Some(HostEvent::Process(event)) => host.session.handle_event(event),
            Some(HostEvent::Line(line)) => {
                if !handle_line(&mut host, line.trim()) {
                    break;
                }
                prompt();
            }
            Some(HostEvent::InputClosed) => {
                host.queue.borrow_mut().mark_input_closed();
                break;
            }
            Some(HostEvent::ManifestChanged(_) | HostEvent::ManifestRemoved(_)) => {}
            None => break,
        }
    }

    host.wait_for_processes();
    Ok(())
}

fn prompt() {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "npm-runner> ");
    let _ = stderr.flush();
}

/// Returns `false` when the session should end
fn handle_line(host: &mut Host, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return true;
    };
    let rest: Vec<&str> = words.collect();
    debug!("Session command: {} {:?}", word, rest);

    match word {
        "run" | "all" => {
            let family = if rest.is_empty() {
                CommandFamily::all_scripts()
            } else {
                CommandFamily::script(rest.join(" "))
            };
            host.session.run(&family, word == "all");
        }
        "exec" => match rest.first().map(|c| c.parse::<FixedCommand>()) {
            Some(Ok(command)) => {
                host.session.run(&CommandFamily::Fixed(command), true);
            }
            Some(Err(e)) => eprintln!("❌ {e}"),
            None => eprintln!("❌ exec needs a command"),
        },
        "rerun" => {
            host.session.rerun_last();
        }
        "list" => {
            let catalog = host.session.catalog(&CommandFamily::all_scripts());
            print!("{}", format_catalog(&catalog, host.session.is_multi_root()));
        }
        "ps" => {
            let running = host.session.running();
            if running.is_empty() {
                println!("No script is currently running");
            }
            for process in running {
                println!("{:>8}  {}  ({})", process.pid, process.invocation, process.working_dir.display());
            }
        }
        "kill" => {
            let outcome = match rest.first().map(|pid| pid.parse::<u32>()) {
                Some(Ok(pid)) => host.session.terminate(pid),
                Some(Err(_)) => {
                    eprintln!("❌ Not a pid: {}", rest.join(" "));
                    return true;
                }
                None => host.session.terminate_prompt(),
            };
            if let Termination::Signalled(pid) = outcome {
                println!("Sent {TERMINATE_SIGNAL} to {pid}");
            }
        }
        "validate" => {
            for document in host.session.manifest_documents() {
                if document.exists() {
                    host.session.validate_now(&document);
                }
            }
        }
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        other => eprintln!("❌ Unknown command '{other}'. Type 'help' for commands."),
    }

    true
}
