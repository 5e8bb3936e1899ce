//! Manifest source-range parsing using tree-sitter

pub mod json_parser;
pub mod utils;

// Re-export commonly used items
pub use json_parser::{DependencyRange, ManifestParser, SourceRangeMap};
pub use utils::{node_to_span, string_value};
