//! Capability interfaces consumed by the engine
//!
//! The host (an editor integration, the bundled CLI, or a test harness)
//! provides these; the engine never touches the UI, the terminal or the
//! package manager directly.

pub mod manifest_store;
pub mod process;
pub mod prompt;
pub mod reporter;
pub mod workspace;

pub use manifest_store::ManifestStore;
pub use process::{ExitDisposition, OutputStream, ProcessEvent, ProcessSignaler, ProcessSpawner, Terminal};
pub use prompt::{Notifier, OutputSink, PickItem, SelectionPrompt};
pub use reporter::{DiagnosticSink, InstalledModuleReporter};
pub use workspace::{ConfigStore, RootEnumerator};
