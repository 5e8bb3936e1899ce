use crate::types::TextSpan;
use tree_sitter::Node;

/// Byte span of a node, including the quotes of string tokens
pub fn node_to_span(node: &Node) -> TextSpan {
    TextSpan::new(node.start_byte(), node.end_byte() - node.start_byte())
}

/// Decoded value of a JSON string token. Falls back to stripping the quotes
/// when the token is incomplete or holds an invalid escape.
pub fn string_value(node: &Node, source: &str) -> Option<String> {
    let raw = node.utf8_text(source.as_bytes()).ok()?;

    if let Ok(decoded) = serde_json::from_str::<String>(raw) {
        return Some(decoded);
    }

    let trimmed = raw.strip_prefix('"').unwrap_or(raw);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    Some(trimmed.to_string())
}
