//! Backend result to host coordinate adapter
//!
//! Backends number lines from 1; the host numbers them from 0. This is the
//! only place that conversion happens. Nothing here fails: unusable optional
//! fields fall back to whole-line or whole-block spans.

use super::types::{HostMatch, Position, Range};
use crate::backends::{KeywordResult, SemanticResult};
use tracing::warn;
use url::Url;

/// End column for spans that run to the end of the line
pub const REST_OF_LINE: u32 = u32::MAX;

/// Convert a 1-based backend line into a 0-based host line, clamping at 0
pub fn line_index(one_based: i64) -> u32 {
    clamp_u32(one_based.saturating_sub(1))
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn char_len(text: &str) -> u32 {
    clamp_u32(text.chars().count() as i64)
}

/// Resolve a backend file path against the workspace folder
pub fn resolve_uri(folder: &Url, file_path: &str) -> Url {
    let mut base = folder.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let relative = file_path
        .replace('\\', "/")
        .replace('%', "%25")
        .replace('#', "%23")
        .replace('?', "%3F");

    match base.join(&relative) {
        Ok(uri) => uri,
        Err(e) => {
            warn!("Could not resolve {} against {}: {}", file_path, base, e);
            base
        }
    }
}

/// Map a keyword hit onto a single-line host match
pub fn adapt_keyword(result: &KeywordResult, folder: &Url) -> HostMatch {
    let line = line_index(result.line_number);
    let (start, end) = keyword_span(result);
    // Offsets may point past a truncated preview; the document range keeps them
    let preview_len = char_len(&result.content);

    HostMatch {
        uri: resolve_uri(folder, &result.file_path),
        range: Range::on_line(line, start, end),
        preview_text: result.content.clone(),
        preview_match_range: Range::on_line(0, start.min(preview_len), end.min(preview_len)),
    }
}

/// Match columns within the preview line, defaulting to the whole line
fn keyword_span(result: &KeywordResult) -> (u32, u32) {
    let start = result.match_start.map(clamp_u32).unwrap_or(0);
    let end = result
        .match_end
        .map(clamp_u32)
        .unwrap_or_else(|| char_len(&result.content));
    (start, end.max(start))
}

/// Map a semantic chunk onto a multi-line host match
pub fn adapt_semantic(result: &SemanticResult, folder: &Url) -> HostMatch {
    let start = line_index(result.start_line);
    let end = line_index(result.end_line).max(start);

    HostMatch {
        uri: resolve_uri(folder, &result.file_path),
        range: Range::new(Position::new(start, 0), Position::new(end, REST_OF_LINE)),
        preview_text: result.content.clone(),
        preview_match_range: whole_block(&result.content),
    }
}

/// Range covering all of `text`
fn whole_block(text: &str) -> Range {
    let mut last_line = 0u32;
    let mut last_len = 0u32;
    for (i, line) in text.lines().enumerate() {
        last_line = clamp_u32(i as i64);
        last_len = char_len(line);
    }
    Range::new(Position::new(0, 0), Position::new(last_line, last_len))
}
