//! Command catalog building
//!
//! Combines resolved directories with their manifests into a flat list of
//! [`CommandDescriptor`]s for one command family.

use tracing::debug;

use crate::{
    error::Result,
    manifest::{Manifest, ManifestReader},
    types::{CommandDescriptor, CommandFamily, DirectoryEntry},
};

pub struct CatalogBuilder<'a> {
    reader: ManifestReader<'a>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(reader: ManifestReader<'a>) -> Self {
        Self { reader }
    }

    /// Build the catalog across many directories. A directory whose manifest
    /// cannot be read or parsed contributes nothing.
    pub fn build(&mut self, family: &CommandFamily, directories: &[DirectoryEntry]) -> Vec<CommandDescriptor> {
        let mut catalog = Vec::new();

        for directory in directories {
            match family {
                CommandFamily::Fixed(_) => catalog.push(fixed_descriptor(family, directory)),
                CommandFamily::RunScript(filter) => {
                    if let Some(manifest) = self.reader.read_lenient(&directory.absolute_path) {
                        catalog.extend(script_descriptors(family, filter.as_deref(), directory, &manifest));
                    }
                }
            }
        }

        debug!("Catalog for '{}' has {} entries", family, catalog.len());
        catalog
    }

    /// Build the catalog for one explicit directory. A manifest failure is
    /// returned to the caller instead of being skipped.
    pub fn build_strict(&mut self, family: &CommandFamily, directory: &DirectoryEntry) -> Result<Vec<CommandDescriptor>> {
        let manifest = self.reader.read(&directory.absolute_path)?;

        Ok(match family {
            CommandFamily::Fixed(_) => vec![fixed_descriptor(family, directory)],
            CommandFamily::RunScript(filter) => script_descriptors(family, filter.as_deref(), directory, &manifest),
        })
    }
}

fn script_descriptors(
    family: &CommandFamily,
    filter: Option<&str>,
    directory: &DirectoryEntry,
    manifest: &Manifest,
) -> Vec<CommandDescriptor> {
    let base = family.base_args().join(" ");

    manifest
        .scripts
        .iter()
        .filter(|script| filter.is_none_or(|wanted| script.name == wanted))
        .map(|script| CommandDescriptor {
            absolute_path: directory.absolute_path.clone(),
            relative_path: directory.relative_path.clone(),
            name: script.name.clone(),
            command_line: format!("{base} {}", script.body),
            root: directory.root.clone(),
            root_name: directory.root_name.clone(),
        })
        .collect()
}

fn fixed_descriptor(family: &CommandFamily, directory: &DirectoryEntry) -> CommandDescriptor {
    CommandDescriptor {
        absolute_path: directory.absolute_path.clone(),
        relative_path: directory.relative_path.clone(),
        name: family.to_string(),
        command_line: family.base_args().join(" "),
        root: directory.root.clone(),
        root_name: directory.root_name.clone(),
    }
}
