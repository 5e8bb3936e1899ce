use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use npm_runner_core::{Session, ValidationOutcome, manifest::MANIFEST_FILE};

use crate::host::{Host, absolute};

pub fn validate_command(roots: &[String], manifests: &[String], report: Option<&str>) -> Result<()> {
    let mut host = Host::new(roots, None)?;

    let documents: Vec<PathBuf> = if manifests.is_empty() {
        host.session
            .manifest_documents()
            .into_iter()
            .filter(|path| path.exists())
            .collect()
    } else {
        manifests
            .iter()
            .map(|m| {
                let path = absolute(Path::new(m))?;
                Ok(if path.is_dir() { path.join(MANIFEST_FILE) } else { path })
            })
            .collect::<Result<_>>()?
    };

    if documents.is_empty() {
        println!("❌ No package.json found");
        return Ok(());
    }

    let report = report
        .map(|path| std::fs::read_to_string(path).with_context(|| format!("Failed to read report {path}")))
        .transpose()?;

    let mut problems = 0;
    for document in &documents {
        let outcome = match &report {
            Some(report) => validate_with_report(&mut host.session, document, report),
            None => host.session.validate_now(document),
        };

        match outcome {
            ValidationOutcome::Published(count) => problems += count,
            ValidationOutcome::Disabled => println!("⏭️  {}: validation disabled", document.display()),
            ValidationOutcome::Abandoned => {
                println!("⚠️  {}: could not obtain the installed-module report", document.display())
            }
            ValidationOutcome::Stale => {}
        }
    }

    if problems > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Validate against a report captured earlier instead of running the reporter
fn validate_with_report(session: &mut Session, document: &Path, report: &str) -> ValidationOutcome {
    session.open_document(document);
    match session.begin_validation(document) {
        Ok(pending) => session.complete_validation(pending, Ok(report.to_string())),
        Err(outcome) => outcome,
    }
}
