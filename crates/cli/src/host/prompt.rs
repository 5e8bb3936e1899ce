//! Numbered pick list on the console

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use npm_runner_core::interfaces::{PickItem, SelectionPrompt};

use super::events::EventQueue;

/// Prints the items to stderr and reads the answer from the event queue.
///
/// An answer is a 1-based index or an exact label. Anything else, an empty
/// line or closed input cancels.
pub struct ConsolePrompt {
    queue: Rc<RefCell<EventQueue>>,
    preset: Option<usize>,
}

impl ConsolePrompt {
    pub fn new(queue: Rc<RefCell<EventQueue>>) -> Self {
        Self { queue, preset: None }
    }

    /// Answer the next prompt with `index` (1-based) without reading input
    pub fn with_preset(mut self, index: Option<usize>) -> Self {
        self.preset = index;
        self
    }
}

pub fn parse_answer(answer: &str, items: &[PickItem]) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    match answer.parse::<usize>() {
        Ok(number) if (1..=items.len()).contains(&number) => Some(number - 1),
        Ok(_) => None,
        Err(_) => items.iter().position(|item| item.label == answer),
    }
}

impl SelectionPrompt for ConsolePrompt {
    fn present(&mut self, items: &[PickItem]) -> Option<usize> {
        if let Some(number) = self.preset.take() {
            return parse_answer(&number.to_string(), items);
        }

        let mut stderr = std::io::stderr().lock();
        for (index, item) in items.iter().enumerate() {
            if item.description.is_empty() {
                let _ = writeln!(stderr, "  {:>2}) {}", index + 1, item.label);
            } else {
                let _ = writeln!(stderr, "  {:>2}) {}  {}", index + 1, item.label, item.description);
            }
        }
        let _ = write!(stderr, "Select [1-{}]: ", items.len());
        let _ = stderr.flush();
        drop(stderr);

        let answer = self.queue.borrow_mut().next_line()?;
        parse_answer(&answer, items)
    }
}
