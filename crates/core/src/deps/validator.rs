//! Classification of declared dependencies into diagnostics

use tracing::debug;

use super::report::{InstalledModuleReport, ModuleStatus};
use crate::{
    error::Result,
    parser::{DependencyRange, ManifestParser, SourceRangeMap},
    types::{Diagnostic, TextSpan},
};

/// Whether the report carries anything actionable
pub fn has_problems(report: &InstalledModuleReport) -> bool {
    report.tagged_problems().next().is_some()
}

/// Diagnostics for every flagged package of `report`, anchored in `ranges`.
///
/// Classification is exclusive per package: missing, then invalid, then
/// extraneous. Only the report's `dependencies` bucket is consulted.
pub fn compute_diagnostics(report: &InstalledModuleReport, ranges: &SourceRangeMap) -> Vec<Diagnostic> {
    if report.invalid || !has_problems(report) {
        return Vec::new();
    }

    report
        .dependencies
        .iter()
        .filter_map(|(name, status)| classify(name, status, ranges))
        .collect()
}

fn classify(name: &str, status: &ModuleStatus, ranges: &SourceRangeMap) -> Option<Diagnostic> {
    if status.missing {
        let range = declared_range(name, ranges)?;
        return Some(Diagnostic::warning(
            range.name,
            format!("Module '{name}' is not installed"),
        ));
    }

    if status.invalid {
        let range = declared_range(name, ranges)?;
        let message = match status.version.as_deref() {
            Some(version) => format!("Module '{name}' the installed version '{version}' is invalid"),
            None => format!("Module '{name}' the installed version is invalid or has errors"),
        };
        return Some(Diagnostic::warning(range.version, message));
    }

    if status.extraneous {
        return Some(Diagnostic::warning(
            attribute_span(ranges),
            format!("Module '{name}' is extraneous"),
        ));
    }

    None
}

fn declared_range<'a>(name: &str, ranges: &'a SourceRangeMap) -> Option<&'a DependencyRange> {
    let range = ranges.dependency(name);
    if range.is_none() {
        debug!("Dependency '{}' is not declared in the manifest text, no diagnostic", name);
    }
    range
}

/// Anchor for packages that have no declaration of their own
fn attribute_span(ranges: &SourceRangeMap) -> TextSpan {
    ["dependencies", "devDependencies", "name"]
        .iter()
        .find_map(|property| ranges.property(property))
        .unwrap_or_else(TextSpan::document_start)
}

/// Parses manifest text and classifies a report against it
pub struct DependencyValidator {
    parser: ManifestParser,
}

impl DependencyValidator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: ManifestParser::new()?,
        })
    }

    /// Validate `manifest_text` against the raw JSON report. An undecodable
    /// report is an error so the caller can leave existing diagnostics alone.
    pub fn validate(&mut self, report_json: &str, manifest_text: &str) -> Result<Vec<Diagnostic>> {
        let report = InstalledModuleReport::from_json(report_json)?;
        self.validate_report(&report, manifest_text)
    }

    pub fn validate_report(&mut self, report: &InstalledModuleReport, manifest_text: &str) -> Result<Vec<Diagnostic>> {
        if report.invalid || !has_problems(report) {
            return Ok(Vec::new());
        }

        let ranges = self.parser.source_ranges(manifest_text)?;
        Ok(compute_diagnostics(report, &ranges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn span_of(text: &str, token: &str) -> TextSpan {
        TextSpan::new(text.find(token).unwrap(), token.len())
    }

    #[test]
    fn test_missing_dependency() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0"}}"#;
        let report = r#"{"problems":["missing: foo@^1.0.0"],"dependencies":{"foo":{"missing":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let diagnostics = validator.validate(report, manifest).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span, span_of(manifest, "\"foo\""));
        assert_eq!(diagnostics[0].message, "Module 'foo' is not installed");
        assert_eq!(diagnostics[0].source, "npm");
    }

    #[test]
    fn test_invalid_version_anchors_at_version() {
        let manifest = r#"{"dependencies":{"X":"^1.0.0"}}"#;
        let report = r#"{"problems":["invalid: X@2.0.0"],"dependencies":{"X":{"version":"2.0.0","invalid":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let diagnostics = validator.validate(report, manifest).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].span, span_of(manifest, "\"^1.0.0\""));
        assert_eq!(diagnostics[0].message, "Module 'X' the installed version '2.0.0' is invalid");
    }

    #[test]
    fn test_invalid_without_version() {
        let manifest = r#"{"dependencies":{"X":"^1.0.0"}}"#;
        let report = r#"{"problems":["invalid: X"],"dependencies":{"X":{"invalid":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let diagnostics = validator.validate(report, manifest).unwrap();
        assert_eq!(
            diagnostics[0].message,
            "Module 'X' the installed version is invalid or has errors"
        );
    }

    #[test]
    fn test_missing_wins_over_invalid() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0"}}"#;
        let report = r#"{"problems":["missing: foo"],"dependencies":{"foo":{"missing":true,"invalid":true,"version":"0.1.0"}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let diagnostics = validator.validate(report, manifest).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Module 'foo' is not installed");
    }

    #[test]
    fn test_extraneous_fallback_chain() {
        let report = InstalledModuleReport::from_json(
            r#"{"problems":["extraneous: left-pad@1.3.0"],"dependencies":{"left-pad":{"version":"1.3.0","extraneous":true}}}"#,
        )
        .unwrap();
        let mut parser = ManifestParser::new().unwrap();

        let with_deps = r#"{"name":"demo","devDependencies":{},"dependencies":{}}"#;
        let diagnostics = compute_diagnostics(&report, &parser.source_ranges(with_deps).unwrap());
        assert_eq!(diagnostics[0].span, span_of(with_deps, "\"dependencies\""));
        assert_eq!(diagnostics[0].message, "Module 'left-pad' is extraneous");

        let with_dev = r#"{"name":"demo","devDependencies":{}}"#;
        let diagnostics = compute_diagnostics(&report, &parser.source_ranges(with_dev).unwrap());
        assert_eq!(diagnostics[0].span, span_of(with_dev, "\"devDependencies\""));

        let name_only = r#"{"name":"demo"}"#;
        let diagnostics = compute_diagnostics(&report, &parser.source_ranges(name_only).unwrap());
        assert_eq!(diagnostics[0].span, span_of(name_only, "\"name\""));

        let diagnostics = compute_diagnostics(&report, &parser.source_ranges("{}").unwrap());
        assert_eq!(diagnostics[0].span, TextSpan::new(0, 1));
    }

    #[test]
    fn test_mixed_report_positions() {
        let manifest = "{\n  \"name\": \"demo\",\n  \"dependencies\": {\n    \"a\": \"^1.0.0\",\n    \"b\": \"^2.0.0\"\n  }\n}\n";
        let report = r#"{
            "problems": ["missing: a@^1.0.0", "invalid: b@1.0.0", "extraneous: c@0.1.0"],
            "dependencies": {
                "a": {"missing": true},
                "b": {"version": "1.0.0", "invalid": true},
                "c": {"version": "0.1.0", "extraneous": true}
            }
        }"#;

        let mut validator = DependencyValidator::new().unwrap();
        let rendered = validator
            .validate(report, manifest)
            .unwrap()
            .iter()
            .map(|d| {
                let range = d.span.to_range(manifest);
                format!("{}:{} {}", range.start.line, range.start.character, d.message)
            })
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(rendered, @r"
        3:4 Module 'a' is not installed
        4:9 Module 'b' the installed version '1.0.0' is invalid
        2:2 Module 'c' is extraneous
        ");
    }

    #[test]
    fn test_no_problems_short_circuits() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0"}}"#;
        let report = r#"{"invalid":false,"problems":[],"dependencies":{"foo":{"missing":true,"invalid":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        assert!(validator.validate(report, manifest).unwrap().is_empty());
    }

    #[test]
    fn test_overall_invalid_short_circuits() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0"}}"#;
        let report = r#"{"invalid":true,"problems":["missing: foo"],"dependencies":{"foo":{"missing":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        assert!(validator.validate(report, manifest).unwrap().is_empty());
    }

    #[test]
    fn test_undeclared_dependency_is_skipped() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0"}}"#;
        let report = r#"{"problems":["missing: bar"],"dependencies":{"bar":{"missing":true},"foo":{"missing":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let diagnostics = validator.validate(report, manifest).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Module 'foo' is not installed");
    }

    #[test]
    fn test_report_order_is_preserved() {
        let manifest = r#"{"dependencies":{"a":"1","b":"1"}}"#;
        let report = r#"{"problems":["missing: b","missing: a"],"dependencies":{"b":{"missing":true},"a":{"missing":true}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let messages: Vec<_> = validator
            .validate(report, manifest)
            .unwrap()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, vec!["Module 'b' is not installed", "Module 'a' is not installed"]);
    }

    #[test]
    fn test_idempotent() {
        let manifest = r#"{"dependencies":{"foo":"^1.0.0","bar":"2"}}"#;
        let report = r#"{"problems":["missing: foo","invalid: bar"],"dependencies":{"foo":{"missing":true},"bar":{"invalid":true,"version":"3.0.0"}}}"#;

        let mut validator = DependencyValidator::new().unwrap();
        let first = validator.validate(report, manifest).unwrap();
        let second = validator.validate(report, manifest).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_unparsable_report_is_error() {
        let mut validator = DependencyValidator::new().unwrap();
        let result = validator.validate("not json", "{}");
        assert!(matches!(result, Err(Error::Report(_))));
    }
}
