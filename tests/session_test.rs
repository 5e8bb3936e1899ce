//! Running, rerunning and terminating scripts through a session

use npm_runner_tests::Fixture;
use npm_runner_core::{
    Action, CommandFamily, Dispatch, FixedCommand, Settings, Termination,
    interfaces::{ExitDisposition, OutputStream, ProcessEvent},
};
use std::path::Path;
use tempfile::TempDir;

fn single_root(scripts: serde_json::Value) -> (TempDir, Fixture) {
    let temp_dir = TempDir::new().unwrap();
    let fixture = Fixture::new(&[temp_dir.path()]);
    fixture.manifest(temp_dir.path(), serde_json::json!({ "name": "app", "scripts": scripts }));
    (temp_dir, fixture)
}

#[test]
fn test_single_match_runs_without_prompt() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc", "lint": "eslint ." }));
    let mut session = fixture.session();

    let outcome = session.run(&CommandFamily::script("build"), true);

    assert_eq!(outcome, Dispatch::Executed { started: 1, failed: 0 });
    assert!(fixture.prompt.shown.borrow().is_empty());
    assert_eq!(fixture.spawned(), vec!["npm run-script build"]);
    assert_eq!(session.running().len(), 1);
    assert_eq!(session.running()[0].invocation, "npm run-script build");
}

#[test]
fn test_cancelled_prompt_runs_nothing() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc", "lint": "eslint ." }));
    fixture.answer(None);
    let mut session = fixture.session();

    assert_eq!(session.run(&CommandFamily::all_scripts(), false), Dispatch::Cancelled);
    assert!(fixture.spawned().is_empty());
    assert!(session.last_executed().is_none());
}

#[test]
fn test_run_all_is_offered_first_and_runs_every_member() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let fixture = Fixture::new(&[root]);
    fixture
        .manifest(root, serde_json::json!({ "scripts": { "test": "jest" } }))
        .manifest(&root.join("api"), serde_json::json!({ "scripts": { "test": "mocha" } }))
        .manifest(&root.join("web"), serde_json::json!({ "scripts": { "test": "vitest" } }))
        .settings(
            root,
            Settings {
                include_directories: vec!["api".to_string(), "web".to_string()],
                ..Default::default()
            },
        )
        .answer(Some(0));
    fixture.spawner.failing.borrow_mut().push(root.join("api"));
    let mut session = fixture.session();

    let outcome = session.run(&CommandFamily::script("test"), true);

    let shown = fixture.prompt.shown.borrow();
    let labels: Vec<&str> = shown[0].iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["Run all", "test", "api: test", "web: test"]);

    // The failing member does not stop the others
    assert_eq!(outcome, Dispatch::Executed { started: 2, failed: 1 });
    assert_eq!(fixture.spawned().len(), 3);
    assert_eq!(session.running().len(), 2);
    assert!(fixture.messages().iter().any(|m| m.contains("npm not found")));
}

#[test]
fn test_run_all_not_offered_when_disabled() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc", "lint": "eslint ." }));
    fixture.answer(Some(1));
    let mut session = fixture.session();

    session.run(&CommandFamily::all_scripts(), false);

    let shown = fixture.prompt.shown.borrow();
    let labels: Vec<&str> = shown[0].iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["build", "lint"]);
    assert_eq!(fixture.spawned(), vec!["npm run-script lint"]);
}

#[test]
fn test_multi_root_labels_carry_root_names() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let fixture = Fixture::new(&[first.path(), second.path()]);
    fixture
        .manifest(first.path(), serde_json::json!({ "scripts": { "build": "tsc" } }))
        .manifest(second.path(), serde_json::json!({ "scripts": { "build": "vite build" } }))
        .answer(None);
    let mut session = fixture.session();

    session.run(&CommandFamily::all_scripts(), false);

    let first_name = first.path().file_name().unwrap().to_string_lossy().into_owned();
    let shown = fixture.prompt.shown.borrow();
    assert_eq!(shown[0][0].label, format!("{first_name}: build"));
    assert_eq!(shown[0].len(), 2);
}

#[test]
fn test_missing_script_is_reported() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc" }));
    let mut session = fixture.session();

    assert_eq!(session.run(&CommandFamily::script("deploy"), true), Dispatch::NotFound);
    assert_eq!(fixture.messages(), vec!["Failed to find script: 'deploy'"]);
}

#[test]
fn test_no_directories_for_fixed_command() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = Fixture::new(&[temp_dir.path()]);
    fixture.settings(
        temp_dir.path(),
        Settings {
            include_root: false,
            ..Default::default()
        },
    );
    let mut session = fixture.session();

    let outcome = session.run(&CommandFamily::Fixed(FixedCommand::Install), true);

    assert_eq!(outcome, Dispatch::NotFound);
    assert_eq!(fixture.messages(), vec!["No directories found to run 'npm install'"]);
}

#[test]
fn test_explicit_directory_without_manifest_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = Fixture::new(&[temp_dir.path()]);
    let mut session = fixture.session();

    let outcome = session.run_in_directory(&CommandFamily::all_scripts(), temp_dir.path(), false);

    assert_eq!(outcome, Dispatch::Aborted);
    assert!(fixture.messages()[0].starts_with("Failed to read manifest"));
}

#[test]
fn test_rerun_last_script() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc" }));
    let mut session = fixture.session();

    assert_eq!(session.rerun_last(), Dispatch::NotFound);
    assert_eq!(fixture.messages(), vec!["No script has been run yet"]);

    session.run(&CommandFamily::script("build"), false);
    session.run(&CommandFamily::Fixed(FixedCommand::Install), false);
    assert!(matches!(session.last_executed(), Some(Action::RunScript { name, .. }) if name == "build"));

    assert_eq!(session.rerun_last(), Dispatch::Executed { started: 1, failed: 0 });
    assert_eq!(
        fixture.spawned(),
        vec!["npm run-script build", "npm install", "npm run-script build"]
    );
}

#[test]
fn test_events_forward_output_and_untrack_on_exit() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "build": "tsc" }));
    let mut session = fixture.session();
    session.run(&CommandFamily::script("build"), false);
    let pid = session.running()[0].pid;

    session.handle_event(ProcessEvent::Output {
        pid,
        stream: OutputStream::Stdout,
        chunk: "compiled\n".to_string(),
    });
    assert_eq!(
        fixture.output.chunks.borrow().as_slice(),
        &[(pid, OutputStream::Stdout, "compiled\n".to_string())]
    );
    assert!(session.has_running());

    session.handle_event(ProcessEvent::Exited {
        pid,
        disposition: ExitDisposition::Code(2),
    });
    assert!(!session.has_running());
    assert_eq!(fixture.messages(), vec!["'npm run-script build' exited with code 2"]);
}

#[test]
fn test_terminate_sends_signal_and_waits_for_exit() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "dev": "vite" }));
    let mut session = fixture.session();
    session.run(&CommandFamily::script("dev"), false);
    let pid = session.running()[0].pid;

    assert_eq!(session.terminate(pid), Termination::Signalled(pid));
    assert_eq!(fixture.signaler.sent.borrow().as_slice(), &[(pid, "SIGTERM".to_string())]);
    assert!(session.has_running());

    session.handle_event(ProcessEvent::Exited {
        pid,
        disposition: ExitDisposition::Signal(15),
    });
    assert!(!session.has_running());
}

#[test]
fn test_terminate_prompt() {
    let (_temp_dir, fixture) = single_root(serde_json::json!({ "dev": "vite" }));
    let mut session = fixture.session();

    assert_eq!(session.terminate_prompt(), Termination::NothingRunning);
    assert_eq!(fixture.messages(), vec!["No script is currently running"]);

    session.run(&CommandFamily::script("dev"), false);
    let pid = session.running()[0].pid;
    fixture.answer(Some(0));
    assert_eq!(session.terminate_prompt(), Termination::Signalled(pid));
    assert_eq!(session.terminate(pid + 1000), Termination::UnknownProcess(pid + 1000));
}

#[test]
fn test_terminal_mode_runs_in_terminal_and_refuses_termination() {
    let (temp_dir, fixture) = single_root(serde_json::json!({ "dev": "vite" }));
    let mut session = fixture.session();

    session.run(&CommandFamily::script("dev"), false);
    let before = session.running();
    assert_eq!(before.len(), 1);
    let pid = before[0].pid;

    fixture.settings(
        temp_dir.path(),
        Settings {
            run_in_terminal: true,
            ..Default::default()
        },
    );

    session.run(&CommandFamily::script("dev"), false);
    assert_eq!(fixture.terminal.commands.borrow().len(), 1);
    assert_eq!(fixture.spawned().len(), 1);

    assert_eq!(session.terminate(pid), Termination::Refused);
    assert_eq!(session.terminate_prompt(), Termination::Refused);
    assert_eq!(session.running(), before);
    assert!(fixture.signaler.sent.borrow().is_empty());
    assert!(fixture
        .messages()
        .contains(&"Killing is only supported when the setting 'run_in_terminal' is 'false'".to_string()));
}

#[test]
fn test_dry_run_commands() {
    let (temp_dir, fixture) = single_root(serde_json::json!({ "build app": "tsc" }));
    fixture.settings(
        temp_dir.path(),
        Settings {
            run_silent: true,
            bin: "pnpm".to_string(),
            ..Default::default()
        },
    );
    let session = fixture.session();

    let action = Action::RunScript {
        directory: temp_dir.path().to_path_buf(),
        root: temp_dir.path().to_path_buf(),
        name: "build app".to_string(),
    };
    let commands = session.commands_for(&action);

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].to_shell_command(), "pnpm run-script --silent \"build app\"");
    assert_eq!(commands[0].working_dir(), Path::new(temp_dir.path()));
    assert!(fixture.spawned().is_empty());
}
