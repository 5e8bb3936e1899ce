//! Console notifications, process output and diagnostics

use std::io::Write;
use std::path::Path;

use npm_runner_core::{
    interfaces::{DiagnosticSink, Notifier, OutputSink, OutputStream},
    types::Diagnostic,
};

use crate::display::formatter::format_diagnostic;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn inform(&self, message: &str) {
        eprintln!("ℹ️  {message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }
}

/// Writes process output through unchanged, optionally prefixed with the pid
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    prefix_pid: bool,
}

impl ConsoleOutput {
    pub fn new(prefix_pid: bool) -> Self {
        Self { prefix_pid }
    }
}

impl OutputSink for ConsoleOutput {
    fn append(&mut self, pid: u32, stream: OutputStream, chunk: &str) {
        let text = if self.prefix_pid {
            chunk
                .split_inclusive('\n')
                .map(|line| format!("[{pid}] {line}"))
                .collect::<String>()
        } else {
            chunk.to_string()
        };

        match stream {
            OutputStream::Stdout => {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(text.as_bytes());
                let _ = stdout.flush();
            }
            OutputStream::Stderr => {
                let mut stderr = std::io::stderr().lock();
                let _ = stderr.write_all(text.as_bytes());
                let _ = stderr.flush();
            }
        }
    }
}

/// Prints each published set as `path:line:column: warning: message`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDiagnostics;

impl ConsoleDiagnostics {
    fn render(document: &Path, text: &str, diagnostics: &[Diagnostic]) -> Vec<String> {
        if diagnostics.is_empty() {
            return vec![format!("✅ {}: no dependency problems", document.display())];
        }

        diagnostics
            .iter()
            .map(|diagnostic| format_diagnostic(document, text, diagnostic))
            .collect()
    }
}

impl DiagnosticSink for ConsoleDiagnostics {
    fn publish(&mut self, document: &Path, text: &str, diagnostics: Vec<Diagnostic>) {
        for line in Self::render(document, text, &diagnostics) {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npm_runner_core::types::TextSpan;

    #[test]
    fn test_positions_come_from_the_validated_text() {
        let text = "{\n  \"dependencies\": {\n    \"lodash\": \"^4.17.0\"\n  }\n}";
        let offset = text.find("\"lodash\"").unwrap();
        let diagnostic = Diagnostic::warning(TextSpan::new(offset, 8), "Module 'lodash' is not installed");

        let lines = ConsoleDiagnostics::render(Path::new("/app/package.json"), text, &[diagnostic]);
        assert_eq!(
            lines,
            vec!["/app/package.json:3:5: warning: Module 'lodash' is not installed [npm]"]
        );
    }

    #[test]
    fn test_clean_result() {
        let lines = ConsoleDiagnostics::render(Path::new("/app/package.json"), "{}", &[]);
        assert_eq!(lines, vec!["✅ /app/package.json: no dependency problems"]);
    }
}
