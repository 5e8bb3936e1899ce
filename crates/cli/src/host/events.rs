//! Single event queue for everything the host reacts to
//!
//! Process output, typed input lines and file-system changes all arrive on
//! one channel and are handled one at a time on the main thread.

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use npm_runner_core::interfaces::ProcessEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Process(ProcessEvent),
    Line(String),
    InputClosed,
    ManifestChanged(PathBuf),
    ManifestRemoved(PathBuf),
}

impl From<ProcessEvent> for HostEvent {
    fn from(event: ProcessEvent) -> Self {
        HostEvent::Process(event)
    }
}

pub struct EventQueue {
    sender: Sender<HostEvent>,
    receiver: Receiver<HostEvent>,
    backlog: VecDeque<HostEvent>,
    input_started: bool,
    input_closed: bool,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            backlog: VecDeque::new(),
            input_started: false,
            input_closed: false,
        }
    }

    pub fn sender(&self) -> Sender<HostEvent> {
        self.sender.clone()
    }

    /// Start forwarding stdin lines. Only the first call spawns a reader.
    pub fn start_input(&mut self) {
        if self.input_started {
            return;
        }
        self.input_started = true;

        let sender = self.sender.clone();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if sender.send(HostEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = sender.send(HostEvent::InputClosed);
        });
    }

    /// Next event, blocking
    pub fn next(&mut self) -> Option<HostEvent> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        self.receiver.recv().ok()
    }

    /// Next event, or `None` once `timeout` has passed
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<HostEvent> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Next typed line. Other events received meanwhile are kept, in order,
    /// for [`EventQueue::next`].
    pub fn next_line(&mut self) -> Option<String> {
        if self.input_closed {
            return None;
        }
        self.start_input();

        if let Some(index) = self
            .backlog
            .iter()
            .position(|event| matches!(event, HostEvent::Line(_) | HostEvent::InputClosed))
        {
            return match self.backlog.remove(index) {
                Some(HostEvent::Line(line)) => Some(line),
                _ => {
                    self.input_closed = true;
                    None
                }
            };
        }

        loop {
            match self.receiver.recv() {
                Ok(HostEvent::Line(line)) => return Some(line),
                Ok(HostEvent::InputClosed) | Err(_) => {
                    self.input_closed = true;
                    return None;
                }
                Ok(other) => self.backlog.push_back(other),
            }
        }
    }

    pub fn is_input_closed(&self) -> bool {
        self.input_closed
    }

    pub fn mark_input_closed(&mut self) {
        self.input_closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npm_runner_core::interfaces::OutputStream;

    #[test]
    fn test_next_line_keeps_other_events() {
        let mut queue = EventQueue::new();
        queue.input_started = true;
        let sender = queue.sender();

        let output = HostEvent::Process(ProcessEvent::Output {
            pid: 7,
            stream: OutputStream::Stdout,
            chunk: "hello".to_string(),
        });
        sender.send(output.clone()).unwrap();
        sender.send(HostEvent::Line("2".to_string())).unwrap();

        assert_eq!(queue.next_line(), Some("2".to_string()));
        assert_eq!(queue.next(), Some(output));
    }

    #[test]
    fn test_closed_input_yields_no_lines() {
        let mut queue = EventQueue::new();
        queue.input_started = true;
        queue.sender().send(HostEvent::InputClosed).unwrap();

        assert_eq!(queue.next_line(), None);
        assert!(queue.is_input_closed());
        assert_eq!(queue.next_line(), None);
    }

    #[test]
    fn test_next_timeout_expires() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.next_timeout(Duration::from_millis(10)), None);
    }
}
