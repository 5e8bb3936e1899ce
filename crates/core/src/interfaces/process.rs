//! Process spawning and signalling interfaces

use crate::{command::NpmCommand, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// How a process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitDisposition {
    Code(i32),
    Signal(i32),
    Unknown,
}

/// Events delivered by a spawner, consumed one at a time by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Output {
        pid: u32,
        stream: OutputStream,
        chunk: String,
    },
    Exited {
        pid: u32,
        disposition: ExitDisposition,
    },
}

pub trait ProcessSpawner {
    /// Start `command` and return its process id. Output and exit are reported
    /// later as [`ProcessEvent`]s.
    fn spawn(&mut self, command: &NpmCommand) -> Result<u32>;
}

pub trait ProcessSignaler {
    fn send_signal(&self, pid: u32, signal: &str) -> Result<()>;
}

/// An interactive terminal that owns the processes it runs
pub trait Terminal {
    fn run(&mut self, command: &NpmCommand) -> Result<()>;
}
