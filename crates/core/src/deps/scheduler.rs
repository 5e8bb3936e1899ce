//! Debounced scheduling of validation passes
//!
//! Each document has at most one pending request. A new request replaces the
//! pending one and restarts its quiet window; a document whose pass is in
//! flight is not handed out again until that pass finishes.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct ValidationScheduler {
    quiet_window: Duration,
    pending: HashMap<PathBuf, Instant>,
    in_flight: HashSet<PathBuf>,
    open: HashSet<PathBuf>,
}

impl Default for ValidationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

impl ValidationScheduler {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            pending: HashMap::new(),
            in_flight: HashSet::new(),
            open: HashSet::new(),
        }
    }

    /// Record a validation request. Coalesces with any pending request for the same document.
    pub fn request(&mut self, document: &Path, now: Instant) {
        self.open.insert(document.to_path_buf());
        if self
            .pending
            .insert(document.to_path_buf(), now + self.quiet_window)
            .is_some()
        {
            debug!("Coalesced validation request for {}", document.display());
        }
    }

    /// Documents whose quiet window has elapsed. They are marked in flight and
    /// their pending slot is cleared.
    pub fn due(&mut self, now: Instant) -> Vec<PathBuf> {
        let ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(document, deadline)| **deadline <= now && !self.in_flight.contains(*document))
            .map(|(document, _)| document.clone())
            .collect();

        for document in &ready {
            self.pending.remove(document);
            self.in_flight.insert(document.clone());
        }

        ready
    }

    pub fn finish(&mut self, document: &Path) {
        self.in_flight.remove(document);
    }

    pub fn open(&mut self, document: &Path) {
        self.open.insert(document.to_path_buf());
    }

    /// Forget a document. A pass still in flight for it must not publish.
    pub fn close(&mut self, document: &Path) {
        self.open.remove(document);
        self.pending.remove(document);
    }

    /// Checked right before publishing results
    pub fn is_relevant(&self, document: &Path) -> bool {
        self.open.contains(document)
    }

    pub fn is_in_flight(&self, document: &Path) -> bool {
        self.in_flight.contains(document)
    }

    /// Earliest pending deadline, for hosts that arm a timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
