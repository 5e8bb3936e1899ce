use std::path::Path;

use npm_runner_core::{
    command::NpmCommand,
    selection::entry_label,
    types::{CommandDescriptor, Diagnostic},
};

/// One line per catalog entry: label, then the command line it runs
pub fn format_catalog(catalog: &[CommandDescriptor], multi_root: bool) -> String {
    let labels: Vec<String> = catalog
        .iter()
        .map(|descriptor| entry_label(descriptor, multi_root))
        .collect();
    let width = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, descriptor) in labels.iter().zip(catalog) {
        out.push_str(&format!("{:<width$}  npm {}\n", label, descriptor.command_line));
    }
    out
}

/// `path:line:column: warning: message [npm]`, one-based like compiler output
pub fn format_diagnostic(document: &Path, text: &str, diagnostic: &Diagnostic) -> String {
    let range = diagnostic.span.to_range(text);
    format!(
        "{}:{}:{}: warning: {} [{}]",
        document.display(),
        range.start.line + 1,
        range.start.character + 1,
        diagnostic.message,
        diagnostic.source
    )
}

pub fn format_command_preview(command: &NpmCommand) -> String {
    format!(
        "{}\n   📂 Working directory: {}",
        command.to_shell_command(),
        command.working_dir().display()
    )
}
