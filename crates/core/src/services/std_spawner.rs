//! Child-process spawner using `std::process`
//!
//! Output is read on helper threads and forwarded chunk by chunk through a
//! channel; the receiving side handles one event at a time.

use std::io::{ErrorKind, Read};
use std::process::{ExitStatus, Stdio};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, warn};

use crate::{
    command::NpmCommand,
    error::{Error, Result},
    interfaces::{ExitDisposition, OutputStream, ProcessEvent, ProcessSpawner},
};

const CHUNK_SIZE: usize = 4096;

pub struct StdProcessSpawner<E = ProcessEvent> {
    events: Sender<E>,
}

impl<E> StdProcessSpawner<E>
where
    E: From<ProcessEvent> + Send + 'static,
{
    pub fn new(events: Sender<E>) -> Self {
        Self { events }
    }
}

impl<E> ProcessSpawner for StdProcessSpawner<E>
where
    E: From<ProcessEvent> + Send + 'static,
{
    fn spawn(&mut self, command: &NpmCommand) -> Result<u32> {
        let mut child = command
            .shell_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.to_shell_command(),
                source,
            })?;

        let pid = child.id();
        debug!("Spawned pid {} for '{}'", pid, command.to_shell_command());

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let events = self.events.clone();
            readers.push(thread::spawn(move || forward(stdout, pid, OutputStream::Stdout, events)));
        }
        if let Some(stderr) = child.stderr.take() {
            let events = self.events.clone();
            readers.push(thread::spawn(move || forward(stderr, pid, OutputStream::Stderr, events)));
        }

        let events = self.events.clone();
        thread::spawn(move || {
            // Drain output before reporting the exit
            for reader in readers {
                let _ = reader.join();
            }

            let disposition = match child.wait() {
                Ok(status) => disposition_of(status),
                Err(e) => {
                    warn!("Failed to wait for pid {}: {}", pid, e);
                    ExitDisposition::Unknown
                }
            };

            let _ = events.send(ProcessEvent::Exited { pid, disposition }.into());
        });

        Ok(pid)
    }
}

fn forward<R, E>(mut reader: R, pid: u32, stream: OutputStream, events: Sender<E>)
where
    R: Read,
    E: From<ProcessEvent>,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut pending = Vec::new();
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                pending.extend_from_slice(&buffer[..n]);
                let chunk = take_decoded(&mut pending);
                if chunk.is_empty() {
                    continue;
                }
                let event = ProcessEvent::Output { pid, stream, chunk };
                if events.send(event.into()).is_err() {
                    // Receiver is gone, nobody is listening anymore
                    return;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    if !pending.is_empty() {
        let chunk = String::from_utf8_lossy(&pending).into_owned();
        let _ = events.send(ProcessEvent::Output { pid, stream, chunk }.into());
    }
}

/// Decode as much of `pending` as possible. An incomplete sequence at the end
/// stays in `pending` for the next read; invalid bytes become U+FFFD.
fn take_decoded(pending: &mut Vec<u8>) -> String {
    let mut decoded = String::new();
    loop {
        match std::str::from_utf8(&pending[..]) {
            Ok(text) => {
                decoded.push_str(text);
                pending.clear();
                return decoded;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                decoded.push_str(&String::from_utf8_lossy(&pending[..valid]));
                match e.error_len() {
                    Some(len) => {
                        decoded.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid + len);
                    }
                    None => {
                        pending.drain(..valid);
                        return decoded;
                    }
                }
            }
        }
    }
}

fn disposition_of(status: ExitStatus) -> ExitDisposition {
    if let Some(code) = status.code() {
        return ExitDisposition::Code(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitDisposition::Signal(signal);
        }
    }

    ExitDisposition::Unknown
}
