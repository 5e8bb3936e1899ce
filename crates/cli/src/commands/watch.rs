use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use npm_runner_core::{ValidationOutcome, manifest::MANIFEST_FILE};

use crate::host::{Host, HostEvent};

const IDLE_WAIT: Duration = Duration::from_secs(3600);

pub fn watch_command(roots: &[String], quiet_ms: u64) -> Result<()> {
    let mut host = Host::with_quiet_window(roots, None, Duration::from_millis(quiet_ms))?;
    let documents = host.session.manifest_documents();

    let directories: BTreeSet<PathBuf> = documents
        .iter()
        .filter_map(|document| document.parent().map(PathBuf::from))
        .filter(|directory| directory.is_dir())
        .collect();

    if directories.is_empty() {
        println!("❌ No directories to watch");
        return Ok(());
    }

    let sender = host.queue.borrow().sender();
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for path in event.paths {
                    if path.file_name().is_none_or(|name| name != MANIFEST_FILE) {
                        continue;
                    }
                    let host_event = match &event.kind {
                        EventKind::Remove(_) => HostEvent::ManifestRemoved(path),
                        EventKind::Create(_) | EventKind::Modify(_) => HostEvent::ManifestChanged(path),
                        _ => continue,
                    };
                    let _ = sender.send(host_event);
                }
            }
            Err(e) => warn!("Watch error: {}", e),
        },
        notify::Config::default(),
    )
    .context("Failed to create file watcher")?;

    for directory in &directories {
        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", directory.display()))?;
        println!("👀 Watching {}", directory.join(MANIFEST_FILE).display());
    }

    let now = Instant::now();
    for document in documents.iter().filter(|document| document.exists()) {
        host.session.request_validation(document, now);
    }

    loop {
        let timeout = host
            .session
            .next_validation_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        let event = host.queue.borrow_mut().next_timeout(timeout);
        match event {
            Some(HostEvent::ManifestChanged(path)) => {
                debug!("Changed: {}", path.display());
                host.session.request_validation(&path, Instant::now());
            }
            Some(HostEvent::ManifestRemoved(path)) => {
                info!("Removed: {}", path.display());
                host.session.close_document(&path);
            }
            Some(HostEvent::Process(event)) => host.session.handle_event(event),
            Some(HostEvent::Line(_) | HostEvent::InputClosed) | None => {}
        }

        for (document, outcome) in host.session.poll_validations(Instant::now()) {
            if outcome == ValidationOutcome::Abandoned {
                debug!("Validation of {} abandoned", document.display());
            }
        }
    }
}
