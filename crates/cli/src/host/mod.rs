//! Console host: wires the engine's capability interfaces to stdio, child
//! processes and the local file system

pub mod console;
pub mod events;
pub mod prompt;
pub mod reporter;
pub mod terminal;

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use npm_runner_core::{
    HostServices, Session, Settings, ValidationScheduler, WorkspaceRoot,
    deps::scheduler::DEFAULT_QUIET_WINDOW,
    services::{FileConfigStore, FsManifestStore, StaticRoots, StdProcessSpawner, SystemSignaler},
};

pub use console::{ConsoleDiagnostics, ConsoleNotifier, ConsoleOutput};
pub use events::{EventQueue, HostEvent};
pub use prompt::ConsolePrompt;
pub use reporter::NpmLsReporter;
pub use terminal::InheritedTerminal;

/// Turn `--root` arguments into workspace roots. Without arguments the root is
/// the nearest directory holding `.npm-runner.json`, else the current directory.
pub fn workspace_roots(args: &[String]) -> Result<Vec<WorkspaceRoot>> {
    if args.is_empty() {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let root = Settings::find_config_file(&cwd)
            .and_then(|config| config.parent().map(Path::to_path_buf))
            .unwrap_or(cwd);
        return Ok(vec![WorkspaceRoot::local(root)]);
    }

    args.iter()
        .map(|arg| {
            let root = WorkspaceRoot::parse(arg);
            if !root.is_local() {
                return Ok(root);
            }
            let path = absolute(&root.path)?;
            Ok(WorkspaceRoot::local(path))
        })
        .collect()
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

pub struct Host {
    pub session: Session,
    pub queue: Rc<RefCell<EventQueue>>,
}

impl Host {
    pub fn new(roots: &[String], pick: Option<usize>) -> Result<Self> {
        Self::with_quiet_window(roots, pick, DEFAULT_QUIET_WINDOW)
    }

    pub fn with_quiet_window(roots: &[String], pick: Option<usize>, quiet_window: Duration) -> Result<Self> {
        let roots = workspace_roots(roots)?;
        let multi_root = roots.iter().filter(|r| r.is_local()).count() > 1;
        debug!("Workspace roots: {:?}", roots);

        let queue = Rc::new(RefCell::new(EventQueue::new()));
        let sender = queue.borrow().sender();

        let services = HostServices {
            store: Box::new(FsManifestStore),
            config: Box::new(FileConfigStore),
            roots: Box::new(StaticRoots::new(roots)),
            prompt: Box::new(ConsolePrompt::new(Rc::clone(&queue)).with_preset(pick)),
            notifier: Box::new(ConsoleNotifier),
            output: Box::new(ConsoleOutput::new(multi_root)),
            spawner: Box::new(StdProcessSpawner::<HostEvent>::new(sender)),
            signaler: Box::new(SystemSignaler),
            terminal: Box::new(InheritedTerminal),
            reporter: Box::new(NpmLsReporter),
            diagnostics: Box::new(ConsoleDiagnostics),
        };

        Ok(Self {
            session: Session::with_scheduler(services, ValidationScheduler::new(quiet_window))?,
            queue,
        })
    }

    /// Handle process events until every tracked process has exited
    pub fn wait_for_processes(&mut self) {
        while self.session.has_running() {
            let event = self.queue.borrow_mut().next();
            match event {
                Some(HostEvent::Process(event)) => self.session.handle_event(event),
                Some(_) => {}
                None => break,
            }
        }
    }
}
