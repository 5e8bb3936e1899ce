pub mod formatter;

pub use formatter::{format_catalog, format_command_preview, format_diagnostic};
