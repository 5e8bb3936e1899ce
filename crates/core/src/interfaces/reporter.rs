//! Installed-module reporting and diagnostic publishing

use std::path::Path;

use crate::{error::Result, types::Diagnostic};

pub trait InstalledModuleReporter {
    /// Produce the JSON text of the installed-module listing for `directory`
    /// (top-level dependencies only)
    fn invoke(&self, directory: &Path, bin: &str) -> Result<String>;
}

pub trait DiagnosticSink {
    /// Replace every diagnostic previously published for `document`.
    /// `text` is the manifest text the spans were computed against.
    fn publish(&mut self, document: &Path, text: &str, diagnostics: Vec<Diagnostic>);
}
