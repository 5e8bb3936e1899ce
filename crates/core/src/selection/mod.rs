//! Selection resolution
//!
//! Turns a catalog into a choice list, short-circuits singletons and maps the
//! user's pick back to an [`Action`].

use tracing::debug;

use crate::{
    command::Action,
    error::Result,
    interfaces::{PickItem, SelectionPrompt},
    types::{CommandDescriptor, CommandFamily},
};

pub const RUN_ALL_LABEL: &str = "Run all";

/// A presentable entry with its bound action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableEntry {
    pub label: String,
    pub description: String,
    pub action: Action,
}

impl SelectableEntry {
    fn pick_item(&self) -> PickItem {
        PickItem {
            label: self.label.clone(),
            description: self.description.clone(),
        }
    }
}

/// Outcome of a selection that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(Action),
    Cancelled,
}

/// `<root>/<relative path>: <name>`, where the root name only appears when
/// more than one root is active and an empty prefix is dropped
pub fn entry_label(descriptor: &CommandDescriptor, multi_root: bool) -> String {
    let mut prefix = Vec::new();
    if multi_root {
        prefix.push(descriptor.root_name.as_str());
    }
    if let Some(relative) = descriptor.relative_path.as_deref().filter(|r| !r.is_empty()) {
        prefix.push(relative);
    }

    if prefix.is_empty() {
        descriptor.name.clone()
    } else {
        format!("{}: {}", prefix.join("/"), descriptor.name)
    }
}

/// The full choice list. The synthetic "run all" entry, when enabled and there
/// is something to aggregate, is always first.
pub fn selectable_entries(
    catalog: &[CommandDescriptor],
    family: &CommandFamily,
    allow_all: bool,
    multi_root: bool,
) -> Vec<SelectableEntry> {
    let mut entries = Vec::with_capacity(catalog.len() + 1);

    if allow_all && catalog.len() >= 2 {
        entries.push(SelectableEntry {
            label: RUN_ALL_LABEL.to_string(),
            description: format!("Run '{family}' in all {} entries", catalog.len()),
            action: Action::run_all(catalog, family),
        });
    }

    entries.extend(catalog.iter().map(|descriptor| SelectableEntry {
        label: entry_label(descriptor, multi_root),
        description: descriptor.command_line.clone(),
        action: Action::for_descriptor(descriptor, family),
    }));

    entries
}

/// Resolve a catalog into an action.
///
/// An empty catalog is an error naming what was sought; a single entry is
/// chosen without prompting; otherwise the prompt decides.
pub fn resolve(
    catalog: &[CommandDescriptor],
    family: &CommandFamily,
    allow_all: bool,
    multi_root: bool,
    prompt: &mut dyn SelectionPrompt,
) -> Result<Selection> {
    match catalog {
        [] => Err(family.not_found()),
        [only] => {
            debug!("Single candidate for '{}', running without prompt", family);
            Ok(Selection::Chosen(Action::for_descriptor(only, family)))
        }
        _ => {
            let mut entries = selectable_entries(catalog, family, allow_all, multi_root);
            let items: Vec<PickItem> = entries.iter().map(SelectableEntry::pick_item).collect();

            match prompt.present(&items) {
                Some(index) if index < entries.len() => {
                    Ok(Selection::Chosen(entries.swap_remove(index).action))
                }
                _ => Ok(Selection::Cancelled),
            }
        }
    }
}
