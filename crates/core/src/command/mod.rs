//! npm command construction and execution

pub mod action;
pub mod npm_command;

// Re-export commonly used types
pub use action::{Action, quote_script_name};
pub use npm_command::NpmCommand;
