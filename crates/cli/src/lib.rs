pub mod cli;
pub mod commands;
pub mod display;
pub mod host;

// Re-export commonly used items
pub use cli::{Cli, Commands};
pub use host::Host;
