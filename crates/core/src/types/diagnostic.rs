use serde::{Deserialize, Serialize};

use super::span::TextSpan;

/// Source tag attached to every dependency diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "npm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
}

/// A flagged dependency anchored at a span of the manifest text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: TextSpan,
    pub message: String,
    pub severity: Severity,
    pub source: String,
}

impl Diagnostic {
    pub fn warning(span: TextSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Warning,
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }
}
