use serde::{Deserialize, Serialize};

/// Represents a position in a text document using 0-based line and character indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Byte offset and length of a token in a manifest's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub offset: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Last-resort anchor at the start of the document
    pub fn document_start() -> Self {
        Self::new(0, 1)
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Slice the covered text, if the span still fits inside `text`
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.offset..self.end())
    }

    /// Convert to a line/character range. Offsets past the end clamp to the end of `text`.
    pub fn to_range(&self, text: &str) -> Range {
        Range {
            start: position_at(text, self.offset),
            end: position_at(text, self.end()),
        }
    }
}

fn position_at(text: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;

    for (index, ch) in text.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            character = 0;
        } else {
            character += 1;
        }
    }

    Position::new(line, character)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_range_single_line() {
        let text = r#"{"name": "demo"}"#;
        let span = TextSpan::new(2, 6);
        let range = span.to_range(text);
        assert_eq!(range.start, Position::new(0, 2));
        assert_eq!(range.end, Position::new(0, 8));
    }

    #[test]
    fn test_to_range_multi_line() {
        let text = "{\n  \"dependencies\": {\n    \"foo\": \"^1.0.0\"\n  }\n}";
        let offset = text.find("\"foo\"").unwrap();
        let range = TextSpan::new(offset, 5).to_range(text);
        assert_eq!(range.start, Position::new(2, 4));
        assert_eq!(range.end, Position::new(2, 9));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let span = TextSpan::new(10, 4);
        assert_eq!(span.slice("short"), None);
        assert_eq!(TextSpan::new(0, 5).slice("short"), Some("short"));
    }
}
