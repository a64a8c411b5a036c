//! Syntax module for Templex templates
//!
//! This module provides the source-location types and the structural decomposition of a
//! template into literal and expression segments.

use serde::{Deserialize, Serialize};

pub mod scanner;
pub mod segmenter;

pub use segmenter::{segment, Segment};

/// Represents a span in the template text, in byte offsets.
///
/// Error messages report character offsets; see [`char_offset`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Converts the span's byte offsets to 1-based `(line, column)` pairs.
    ///
    /// Returns `None` when the span lies outside `source` or splits a character.
    pub fn byte_to_line_col(&self, source: &str) -> Option<((usize, usize), (usize, usize))> {
        Some((
            line_col_at(source, self.start)?,
            line_col_at(source, self.end)?,
        ))
    }
}

/// Number of characters in `text` before byte offset `byte`.
pub fn char_offset(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or(byte, |before| before.chars().count())
}

fn line_col_at(source: &str, offset: usize) -> Option<(usize, usize)> {
    let before = source.get(..offset)?;
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    Some((line, col))
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::from(span.start..span.end)
    }
}
