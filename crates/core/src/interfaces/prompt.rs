//! User-facing collaborators: selection prompt, notifications and output

use super::process::OutputStream;

/// One row of a selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: String,
}

pub trait SelectionPrompt {
    /// Present `items` for single selection. `None` means the user cancelled.
    fn present(&mut self, items: &[PickItem]) -> Option<usize>;
}

pub trait Notifier {
    fn inform(&self, message: &str);
    fn warn(&self, message: &str);
}

pub trait OutputSink {
    /// Forward a chunk of process output as soon as it arrives
    fn append(&mut self, pid: u32, stream: OutputStream, chunk: &str);
}
