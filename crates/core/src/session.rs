//! Session context
//!
//! One explicit value holding everything that lives for the duration of a
//! host session: the capability services, the process tracker, the last
//! executed script, the validation scheduler and the manifest cache. All
//! entry points go through it; every failure reachable by a user action ends
//! up as a notification instead of an error returned to the host.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    cache::ManifestCache,
    catalog::CatalogBuilder,
    command::{Action, NpmCommand},
    config::{ExecutionMode, Settings},
    deps::{DependencyValidator, ValidationScheduler, should_validate},
    discovery::{relative_to, resolve_directories},
    error::{Error, Result},
    interfaces::{
        ConfigStore, DiagnosticSink, ExitDisposition, InstalledModuleReporter, ManifestStore, Notifier,
        OutputSink, PickItem, ProcessEvent, ProcessSignaler, ProcessSpawner, RootEnumerator, SelectionPrompt,
        Terminal,
    },
    manifest::{MANIFEST_FILE, ManifestReader},
    process::{ProcessTracker, TERMINATE_SIGNAL, TrackedProcess},
    selection::{self, Selection},
    types::{CommandDescriptor, CommandFamily, DirectoryEntry, WorkspaceRoot},
};

/// The host collaborators a session works with
pub struct HostServices {
    pub store: Box<dyn ManifestStore>,
    pub config: Box<dyn ConfigStore>,
    pub roots: Box<dyn RootEnumerator>,
    pub prompt: Box<dyn SelectionPrompt>,
    pub notifier: Box<dyn Notifier>,
    pub output: Box<dyn OutputSink>,
    pub spawner: Box<dyn ProcessSpawner>,
    pub signaler: Box<dyn ProcessSignaler>,
    pub terminal: Box<dyn Terminal>,
    pub reporter: Box<dyn InstalledModuleReporter>,
    pub diagnostics: Box<dyn DiagnosticSink>,
}

/// Result of a run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing matched; the user was told what was missing
    NotFound,
    /// The single explicit manifest could not be loaded
    Aborted,
    Cancelled,
    Executed { started: usize, failed: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Commands run in an interactive terminal; nothing to signal
    Refused,
    NothingRunning,
    Cancelled,
    UnknownProcess(u32),
    Signalled(u32),
    Failed(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Published(usize),
    /// Validation is off for this manifest, or another package manager owns it
    Disabled,
    /// The report or the manifest could not be obtained; diagnostics left untouched
    Abandoned,
    /// The document was closed while the pass was running
    Stale,
}

/// A validation pass between reading the manifest and receiving the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingValidation {
    pub document: PathBuf,
    pub directory: PathBuf,
    pub bin: String,
    pub manifest_text: String,
}

pub struct Session {
    services: HostServices,
    tracker: ProcessTracker,
    last_executed: Option<Action>,
    scheduler: ValidationScheduler,
    validator: DependencyValidator,
    cache: ManifestCache,
}

impl Session {
    pub fn new(services: HostServices) -> Result<Self> {
        Self::with_scheduler(services, ValidationScheduler::default())
    }

    pub fn with_scheduler(services: HostServices, scheduler: ValidationScheduler) -> Result<Self> {
        Ok(Self {
            services,
            tracker: ProcessTracker::new(),
            last_executed: None,
            scheduler,
            validator: DependencyValidator::new()?,
            cache: ManifestCache::default(),
        })
    }

    fn local_roots(&self) -> Vec<WorkspaceRoot> {
        self.services
            .roots
            .roots()
            .into_iter()
            .filter(WorkspaceRoot::is_local)
            .collect()
    }

    pub fn is_multi_root(&self) -> bool {
        self.local_roots().len() > 1
    }

    /// Settings of the root that owns `path`, or of the first root
    fn settings_for(&self, path: &Path) -> Settings {
        let roots = self.local_roots();
        let owner = roots
            .iter()
            .filter(|root| path.starts_with(&root.path))
            .max_by_key(|root| root.path.components().count())
            .or(roots.first());

        match owner {
            Some(root) => self.services.config.settings(&root.path),
            None => Settings::default(),
        }
    }

    /// Execution mode of the primary root
    pub fn execution_mode(&self) -> ExecutionMode {
        match self.local_roots().first() {
            Some(root) => self.services.config.settings(&root.path).execution_mode(),
            None => ExecutionMode::Tracked,
        }
    }

    pub fn directories(&self) -> Vec<DirectoryEntry> {
        resolve_directories(&self.services.roots.roots(), self.services.config.as_ref())
    }

    /// Catalog across every resolved directory; unreadable manifests are skipped
    pub fn catalog(&mut self, family: &CommandFamily) -> Vec<CommandDescriptor> {
        let directories = self.directories();
        let reader = ManifestReader::new(self.services.store.as_ref()).with_cache(&mut self.cache);
        CatalogBuilder::new(reader).build(family, &directories)
    }

    pub fn select(&mut self, family: &CommandFamily, allow_all: bool) -> Result<Selection> {
        let catalog = self.catalog(family);
        let multi_root = self.is_multi_root();
        selection::resolve(&catalog, family, allow_all, multi_root, self.services.prompt.as_mut())
    }

    /// Build the catalog, let the user pick, and execute the pick
    pub fn run(&mut self, family: &CommandFamily, allow_all: bool) -> Dispatch {
        match self.select(family, allow_all) {
            Ok(Selection::Chosen(action)) => self.dispatch(&action),
            Ok(Selection::Cancelled) => Dispatch::Cancelled,
            Err(e) => {
                self.services.notifier.warn(&e.to_string());
                Dispatch::NotFound
            }
        }
    }

    /// Resolve against the manifest of one explicit directory. Unlike
    /// [`Session::select`], a missing or malformed manifest is an error.
    pub fn select_in_directory(
        &mut self,
        family: &CommandFamily,
        directory: &Path,
        allow_all: bool,
    ) -> Result<Selection> {
        let roots = self.local_roots();
        let owner = roots
            .iter()
            .filter(|root| directory.starts_with(&root.path))
            .max_by_key(|root| root.path.components().count());
        let entry = DirectoryEntry {
            absolute_path: directory.to_path_buf(),
            relative_path: owner.and_then(|root| relative_to(directory, &root.path)),
            root: owner.map(|r| r.path.clone()).unwrap_or_else(|| directory.to_path_buf()),
            root_name: owner.map(|r| r.name.clone()).unwrap_or_default(),
        };

        let reader = ManifestReader::new(self.services.store.as_ref()).with_cache(&mut self.cache);
        let catalog = CatalogBuilder::new(reader).build_strict(family, &entry)?;
        selection::resolve(&catalog, family, allow_all, false, self.services.prompt.as_mut())
    }

    /// Single explicit target: a missing or malformed manifest aborts with a message
    pub fn run_in_directory(&mut self, family: &CommandFamily, directory: &Path, allow_all: bool) -> Dispatch {
        match self.select_in_directory(family, directory, allow_all) {
            Ok(Selection::Chosen(action)) => self.dispatch(&action),
            Ok(Selection::Cancelled) => Dispatch::Cancelled,
            Err(e @ (Error::ManifestRead { .. } | Error::ManifestParse { .. })) => {
                self.services.notifier.warn(&e.to_string());
                Dispatch::Aborted
            }
            Err(e) => {
                self.services.notifier.warn(&e.to_string());
                Dispatch::NotFound
            }
        }
    }

    /// The invocations an action would start, without starting them
    pub fn commands_for(&self, action: &Action) -> Vec<NpmCommand> {
        let members: Vec<&Action> = match action {
            Action::RunAll { members } => members.iter().collect(),
            single => vec![single],
        };

        members
            .into_iter()
            .filter_map(|member| {
                let settings = self.settings_for(member.root()?);
                member.to_command(&settings)
            })
            .collect()
    }

    /// Execute an action. Members of "run all" are started independently; a
    /// failing member does not stop the others.
    pub fn dispatch(&mut self, action: &Action) -> Dispatch {
        let members: Vec<&Action> = match action {
            Action::RunAll { members } => members.iter().collect(),
            single => vec![single],
        };

        let mut started = 0;
        let mut failed = 0;
        for member in members {
            match self.execute(member) {
                Ok(()) => started += 1,
                Err(e) => {
                    failed += 1;
                    self.services.notifier.warn(&e.to_string());
                }
            }
        }

        Dispatch::Executed { started, failed }
    }

    fn execute(&mut self, action: &Action) -> Result<()> {
        if action.is_rerunnable() {
            self.last_executed = Some(action.clone());
        }

        let settings = match action.root() {
            Some(root) => self.settings_for(root),
            None => return Err(Error::Other("Nested run-all actions are not executable".to_string())),
        };
        let command = action
            .to_command(&settings)
            .ok_or_else(|| Error::Other("Action has no command".to_string()))?;

        match settings.execution_mode() {
            ExecutionMode::Terminal => {
                info!("Running in terminal: {}", command.to_shell_command());
                self.services.terminal.run(&command)
            }
            ExecutionMode::Tracked => {
                let pid = self.services.spawner.spawn(&command)?;
                info!("Started pid {}: {}", pid, command.to_shell_command());
                self.tracker.register(TrackedProcess {
                    pid,
                    invocation: command.to_shell_command(),
                    working_dir: command.working_dir().to_path_buf(),
                });
                Ok(())
            }
        }
    }

    pub fn last_executed(&self) -> Option<&Action> {
        self.last_executed.as_ref()
    }

    pub fn rerun_last(&mut self) -> Dispatch {
        match self.last_executed.clone() {
            Some(action) => self.dispatch(&action),
            None => {
                self.services.notifier.inform("No script has been run yet");
                Dispatch::NotFound
            }
        }
    }

    /// Handle one spawner event. Output is forwarded as received; an exit
    /// removes the process from the tracker.
    pub fn handle_event(&mut self, event: ProcessEvent) {
        match event {
            ProcessEvent::Output { pid, stream, chunk } => {
                self.services.output.append(pid, stream, &chunk);
            }
            ProcessEvent::Exited { pid, disposition } => {
                let Some(process) = self.tracker.remove(pid) else {
                    debug!("Exit of untracked pid {}", pid);
                    return;
                };

                match disposition {
                    ExitDisposition::Code(0) => debug!("'{}' finished", process.invocation),
                    ExitDisposition::Code(code) => self
                        .services
                        .notifier
                        .warn(&format!("'{}' exited with code {}", process.invocation, code)),
                    ExitDisposition::Signal(signal) => self
                        .services
                        .notifier
                        .inform(&format!("'{}' was terminated by signal {}", process.invocation, signal)),
                    ExitDisposition::Unknown => warn!("'{}' exited with unknown status", process.invocation),
                }
            }
        }
    }

    pub fn running(&self) -> Vec<TrackedProcess> {
        self.tracker.snapshot()
    }

    pub fn has_running(&self) -> bool {
        !self.tracker.is_empty()
    }

    /// Send the termination signal to a tracked process. The tracker entry is
    /// only removed once the exit event arrives.
    pub fn terminate(&mut self, pid: u32) -> Termination {
        if self.execution_mode() == ExecutionMode::Terminal {
            self.services.notifier.inform(&Error::TerminalMode.to_string());
            return Termination::Refused;
        }

        if !self.tracker.contains(pid) {
            self.services.notifier.warn(&Error::UnknownProcess(pid).to_string());
            return Termination::UnknownProcess(pid);
        }

        match self.services.signaler.send_signal(pid, TERMINATE_SIGNAL) {
            Ok(()) => Termination::Signalled(pid),
            Err(e) => {
                self.services.notifier.warn(&e.to_string());
                Termination::Failed(pid)
            }
        }
    }

    /// Let the user pick one of the tracked processes and terminate it
    pub fn terminate_prompt(&mut self) -> Termination {
        if self.execution_mode() == ExecutionMode::Terminal {
            self.services.notifier.inform(&Error::TerminalMode.to_string());
            return Termination::Refused;
        }

        let running = self.tracker.snapshot();
        if running.is_empty() {
            self.services.notifier.inform("No script is currently running");
            return Termination::NothingRunning;
        }

        let items: Vec<PickItem> = running
            .iter()
            .map(|process| PickItem {
                label: process.invocation.clone(),
                description: format!("pid {} in {}", process.pid, process.working_dir.display()),
            })
            .collect();

        match self.services.prompt.present(&items) {
            Some(index) if index < running.len() => self.terminate(running[index].pid),
            _ => Termination::Cancelled,
        }
    }

    /// Manifests of every resolved directory
    pub fn manifest_documents(&self) -> Vec<PathBuf> {
        self.directories().iter().map(DirectoryEntry::manifest_path).collect()
    }

    pub fn request_validation(&mut self, document: &Path, now: Instant) {
        self.scheduler.request(document, now);
    }

    /// Mark a document as shown, so results for it are still wanted
    pub fn open_document(&mut self, document: &Path) {
        self.scheduler.open(document);
    }

    pub fn close_document(&mut self, document: &Path) {
        self.scheduler.close(document);
        self.cache.invalidate(document);
    }

    pub fn next_validation_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run every validation whose quiet window has elapsed
    pub fn poll_validations(&mut self, now: Instant) -> Vec<(PathBuf, ValidationOutcome)> {
        let due = self.scheduler.due(now);
        let mut outcomes = Vec::with_capacity(due.len());

        for document in due {
            let outcome = self.validate_document(&document);
            self.scheduler.finish(&document);
            outcomes.push((document, outcome));
        }

        outcomes
    }

    /// Validate immediately, bypassing the debounce
    pub fn validate_now(&mut self, document: &Path) -> ValidationOutcome {
        self.scheduler.open(document);
        self.validate_document(document)
    }

    fn validate_document(&mut self, document: &Path) -> ValidationOutcome {
        let pending = match self.begin_validation(document) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let report = self.services.reporter.invoke(&pending.directory, &pending.bin);
        self.complete_validation(pending, report)
    }

    /// First half of a pass: check the settings and read the current manifest text
    pub fn begin_validation(&mut self, document: &Path) -> std::result::Result<PendingValidation, ValidationOutcome> {
        let directory = document
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let settings = self.settings_for(&directory);

        if !should_validate(&directory, &settings) {
            debug!("Validation disabled for {}", directory.display());
            return Err(ValidationOutcome::Disabled);
        }

        let manifest_path = if document.file_name().is_some_and(|name| name == MANIFEST_FILE) {
            document.to_path_buf()
        } else {
            directory.join(MANIFEST_FILE)
        };

        match self.services.store.read_file(&manifest_path) {
            Ok(manifest_text) => Ok(PendingValidation {
                document: document.to_path_buf(),
                directory,
                bin: settings.bin,
                manifest_text,
            }),
            Err(e) => {
                debug!("Cannot read {}: {}", manifest_path.display(), e);
                Err(ValidationOutcome::Abandoned)
            }
        }
    }

    /// Second half of a pass: classify the report and publish, unless the
    /// report is unusable or the document is no longer relevant
    pub fn complete_validation(&mut self, pending: PendingValidation, report: Result<String>) -> ValidationOutcome {
        let report = match report {
            Ok(report) => report,
            Err(e) => {
                debug!("Installed-module report unavailable for {}: {}", pending.directory.display(), e);
                return ValidationOutcome::Abandoned;
            }
        };

        let diagnostics = match self.validator.validate(&report, &pending.manifest_text) {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                debug!("Abandoning validation of {}: {}", pending.document.display(), e);
                return ValidationOutcome::Abandoned;
            }
        };

        if !self.scheduler.is_relevant(&pending.document) {
            debug!("Dropping results for closed document {}", pending.document.display());
            return ValidationOutcome::Stale;
        }

        let count = diagnostics.len();
        self.services
            .diagnostics
            .publish(&pending.document, &pending.manifest_text, diagnostics);
        ValidationOutcome::Published(count)
    }
}
