//! Host-side result types

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// 0-based line/character position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open span between two positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span on a single line
    pub fn on_line(line: u32, start: u32, end: u32) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}

/// One match in the host's coordinate model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMatch {
    /// Document the match lives in
    pub uri: Url,
    /// Location in the document
    pub range: Range,
    /// Text shown in the results view
    pub preview_text: String,
    /// Highlight inside `preview_text`
    pub preview_match_range: Range,
}
