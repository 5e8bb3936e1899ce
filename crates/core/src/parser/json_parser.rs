use std::collections::HashMap;
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use super::utils::{node_to_span, string_value};
use crate::{
    error::{Error, Result},
    manifest::DependencyKind,
    types::TextSpan,
};

/// Name and version token spans of one declared dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRange {
    pub name: TextSpan,
    pub version: TextSpan,
    pub kind: DependencyKind,
}

/// Token spans of a manifest's top-level properties and dependency entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRangeMap {
    pub properties: HashMap<String, TextSpan>,
    pub dependencies: HashMap<String, DependencyRange>,
}

impl SourceRangeMap {
    pub fn property(&self, name: &str) -> Option<TextSpan> {
        self.properties.get(name).copied()
    }

    pub fn dependency(&self, name: &str) -> Option<&DependencyRange> {
        self.dependencies.get(name)
    }
}

pub struct ManifestParser {
    parser: Parser,
}

impl ManifestParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_json::LANGUAGE.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::Other("Failed to parse manifest text".to_string()))
    }

    /// Extract the range map. Malformed text still yields whatever could be recovered.
    pub fn source_ranges(&mut self, source: &str) -> Result<SourceRangeMap> {
        let tree = self.parse(source)?;
        let root = tree.root_node();

        if root.has_error() {
            debug!("Manifest text has syntax errors, using partial tree");
        }

        let mut map = SourceRangeMap::default();

        for pair in top_level_pairs(&root) {
            let Some(key) = pair.child_by_field_name("key") else {
                continue;
            };
            let Some(name) = string_value(&key, source) else {
                continue;
            };

            map.properties.insert(name.clone(), node_to_span(&key));

            let kind = match name.as_str() {
                "dependencies" => DependencyKind::Production,
                "devDependencies" => DependencyKind::Development,
                _ => continue,
            };

            let Some(block) = pair.child_by_field_name("value") else {
                continue;
            };

            for entry in pairs_of(&block) {
                let (Some(dep_key), Some(dep_value)) = (
                    entry.child_by_field_name("key"),
                    entry.child_by_field_name("value"),
                ) else {
                    continue;
                };
                let Some(dep_name) = string_value(&dep_key, source) else {
                    continue;
                };

                // Later declarations win
                map.dependencies.insert(
                    dep_name,
                    DependencyRange {
                        name: node_to_span(&dep_key),
                        version: node_to_span(&dep_value),
                        kind,
                    },
                );
            }
        }

        Ok(map)
    }
}

/// Pairs of the document's top-level object, looking through error nodes
fn top_level_pairs<'tree>(root: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut pairs = Vec::new();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "object" => pairs.extend(pairs_of(&child)),
            "ERROR" => {
                let mut inner = child.walk();
                for grandchild in child.named_children(&mut inner) {
                    match grandchild.kind() {
                        "object" => pairs.extend(pairs_of(&grandchild)),
                        "pair" => pairs.push(grandchild),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    pairs
}

/// Direct pairs of an object node, including pairs wrapped in error nodes
fn pairs_of<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut pairs = Vec::new();
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "pair" => pairs.push(child),
            "ERROR" => pairs.extend(pairs_of(&child)),
            _ => {}
        }
    }

    pairs
}
