pub mod descriptor;
pub mod diagnostic;
pub mod directory;
pub mod span;

// Re-export commonly used types
pub use descriptor::{CommandDescriptor, CommandFamily, FixedCommand};
pub use diagnostic::{Diagnostic, Severity};
pub use directory::{DirectoryEntry, WorkspaceRoot};
pub use span::{Position, Range, TextSpan};
