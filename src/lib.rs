//! In-memory capability implementations for driving a [`Session`] in tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use npm_runner_core::{
    Diagnostic, Error, HostServices, Result, Session, Settings, ValidationScheduler, WorkspaceRoot,
    command::NpmCommand,
    interfaces::{
        ConfigStore, DiagnosticSink, InstalledModuleReporter, ManifestStore, Notifier, OutputSink, OutputStream,
        PickItem, ProcessSignaler, ProcessSpawner, SelectionPrompt, Terminal,
    },
    services::StaticRoots,
};

pub type Shared<T> = Rc<RefCell<T>>;

#[derive(Default, Clone)]
pub struct MemoryStore {
    pub files: Shared<HashMap<PathBuf, String>>,
}

impl ManifestStore for MemoryStore {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

#[derive(Default, Clone)]
pub struct MemoryConfig {
    pub settings: Shared<HashMap<PathBuf, Settings>>,
}

impl ConfigStore for MemoryConfig {
    fn settings(&self, root: &Path) -> Settings {
        self.settings.borrow().get(root).cloned().unwrap_or_default()
    }
}

#[derive(Default, Clone)]
pub struct ScriptedPrompt {
    pub answers: Shared<VecDeque<Option<usize>>>,
    pub shown: Shared<Vec<Vec<PickItem>>>,
}

impl SelectionPrompt for ScriptedPrompt {
    fn present(&mut self, items: &[PickItem]) -> Option<usize> {
        self.shown.borrow_mut().push(items.to_vec());
        self.answers.borrow_mut().pop_front().flatten()
    }
}

#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Shared<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn inform(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[derive(Default, Clone)]
pub struct RecordingOutput {
    pub chunks: Shared<Vec<(u32, OutputStream, String)>>,
}

impl OutputSink for RecordingOutput {
    fn append(&mut self, pid: u32, stream: OutputStream, chunk: &str) {
        self.chunks.borrow_mut().push((pid, stream, chunk.to_string()));
    }
}

/// Hands out increasing pids; fails for commands whose working directory is listed in `failing`
#[derive(Clone)]
pub struct FakeSpawner {
    pub next_pid: Shared<u32>,
    pub spawned: Shared<Vec<NpmCommand>>,
    pub failing: Shared<Vec<PathBuf>>,
}

impl Default for FakeSpawner {
    fn default() -> Self {
        Self {
            next_pid: Rc::new(RefCell::new(100)),
            spawned: Shared::default(),
            failing: Shared::default(),
        }
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn(&mut self, command: &NpmCommand) -> Result<u32> {
        self.spawned.borrow_mut().push(command.clone());
        if self.failing.borrow().iter().any(|dir| dir == command.working_dir()) {
            return Err(Error::Spawn {
                command: command.to_shell_command(),
                source: io::Error::new(io::ErrorKind::NotFound, "npm not found"),
            });
        }

        let mut next = self.next_pid.borrow_mut();
        *next += 1;
        Ok(*next)
    }
}

#[derive(Default, Clone)]
pub struct RecordingSignaler {
    pub sent: Shared<Vec<(u32, String)>>,
}

impl ProcessSignaler for RecordingSignaler {
    fn send_signal(&self, pid: u32, signal: &str) -> Result<()> {
        self.sent.borrow_mut().push((pid, signal.to_string()));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct RecordingTerminal {
    pub commands: Shared<Vec<NpmCommand>>,
}

impl Terminal for RecordingTerminal {
    fn run(&mut self, command: &NpmCommand) -> Result<()> {
        self.commands.borrow_mut().push(command.clone());
        Ok(())
    }
}

/// Returns the canned report, or fails when none is set
#[derive(Default, Clone)]
pub struct CannedReporter {
    pub report: Shared<Option<String>>,
    pub calls: Shared<usize>,
}

impl InstalledModuleReporter for CannedReporter {
    fn invoke(&self, _directory: &Path, _bin: &str) -> Result<String> {
        *self.calls.borrow_mut() += 1;
        self.report
            .borrow()
            .clone()
            .ok_or_else(|| Error::Other("npm ls failed".to_string()))
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    pub published: Shared<Vec<(PathBuf, Vec<Diagnostic>)>>,
    pub texts: Shared<Vec<String>>,
}

impl DiagnosticSink for RecordingSink {
    fn publish(&mut self, document: &Path, text: &str, diagnostics: Vec<Diagnostic>) {
        self.published.borrow_mut().push((document.to_path_buf(), diagnostics));
        self.texts.borrow_mut().push(text.to_string());
    }
}

/// Handles on every fake a session was built with
#[derive(Default, Clone)]
pub struct Fixture {
    pub roots: Vec<WorkspaceRoot>,
    pub store: MemoryStore,
    pub config: MemoryConfig,
    pub prompt: ScriptedPrompt,
    pub notifier: RecordingNotifier,
    pub output: RecordingOutput,
    pub spawner: FakeSpawner,
    pub signaler: RecordingSignaler,
    pub terminal: RecordingTerminal,
    pub reporter: CannedReporter,
    pub sink: RecordingSink,
}

impl Fixture {
    pub fn new(roots: &[&Path]) -> Self {
        Self {
            roots: roots.iter().map(|root| WorkspaceRoot::local(*root)).collect(),
            ..Default::default()
        }
    }

    pub fn manifest(&self, directory: &Path, manifest: serde_json::Value) -> &Self {
        self.manifest_text(directory, &serde_json::to_string_pretty(&manifest).unwrap())
    }

    pub fn manifest_text(&self, directory: &Path, text: &str) -> &Self {
        self.store
            .files
            .borrow_mut()
            .insert(directory.join("package.json"), text.to_string());
        self
    }

    pub fn settings(&self, root: &Path, settings: Settings) -> &Self {
        self.config.settings.borrow_mut().insert(root.to_path_buf(), settings);
        self
    }

    pub fn answer(&self, answer: Option<usize>) -> &Self {
        self.prompt.answers.borrow_mut().push_back(answer);
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifier.messages.borrow().clone()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawner
            .spawned
            .borrow()
            .iter()
            .map(NpmCommand::to_shell_command)
            .collect()
    }

    pub fn session(&self) -> Session {
        self.session_with_window(Duration::from_millis(1000))
    }

    pub fn session_with_window(&self, quiet_window: Duration) -> Session {
        let services = HostServices {
            store: Box::new(self.store.clone()),
            config: Box::new(self.config.clone()),
            roots: Box::new(StaticRoots::new(self.roots.clone())),
            prompt: Box::new(self.prompt.clone()),
            notifier: Box::new(self.notifier.clone()),
            output: Box::new(self.output.clone()),
            spawner: Box::new(self.spawner.clone()),
            signaler: Box::new(self.signaler.clone()),
            terminal: Box::new(self.terminal.clone()),
            reporter: Box::new(self.reporter.clone()),
            diagnostics: Box::new(self.sink.clone()),
        };
        Session::with_scheduler(services, ValidationScheduler::new(quiet_window)).unwrap()
    }
}
