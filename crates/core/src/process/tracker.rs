use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A running process the user can terminate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProcess {
    pub pid: u32,
    pub invocation: String,
    pub working_dir: PathBuf,
}

/// pid → tracked process. The only record of what can currently be terminated.
///
/// Mutated only by "spawned" and "exited" events, which the session handles
/// one at a time.
#[derive(Debug, Default)]
pub struct ProcessTracker {
    processes: BTreeMap<u32, TrackedProcess>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, process: TrackedProcess) {
        debug!("Tracking pid {}: {}", process.pid, process.invocation);
        if let Some(previous) = self.processes.insert(process.pid, process) {
            // pid reuse after a missed exit event
            warn!("Replaced stale entry for pid {}: {}", previous.pid, previous.invocation);
        }
    }

    pub fn remove(&mut self, pid: u32) -> Option<TrackedProcess> {
        let removed = self.processes.remove(&pid);
        if removed.is_some() {
            debug!("Stopped tracking pid {}", pid);
        }
        removed
    }

    pub fn get(&self, pid: u32) -> Option<&TrackedProcess> {
        self.processes.get(&pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Snapshot of every tracked process, ordered by pid
    pub fn snapshot(&self) -> Vec<TrackedProcess> {
        self.processes.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
