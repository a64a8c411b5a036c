//! Delimiter-aware span scanning.
//!
//! Finds the suffix that really terminates an embedded expression. Brackets `()`, `[]`
//! and `{}` must pair up inside the expression, and string literals quoted with `'` or
//! `"` may contain anything, including unmatched brackets and suffix-like text. The scan
//! is a single non-recursive pass with an explicit bracket stack.

use crate::errors::{ErrorKind, TemplateError};
use crate::syntax::Span;

/// An open bracket and the position it was seen at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub bracket: char,
    pub pos: usize,
}

impl Bracket {
    pub fn new(bracket: char, pos: usize) -> Self {
        Self { bracket, pos }
    }

    pub fn is_compatible_with(&self, close: char) -> bool {
        Self::close_for(self.bracket) == close
    }

    pub fn open_for(close: char) -> char {
        match close {
            '}' => '{',
            ']' => '[',
            _ => '(',
        }
    }

    pub fn close_for(open: char) -> char {
        match open {
            '{' => '}',
            '[' => ']',
            _ => ')',
        }
    }
}

/// Returns true if `suffix` occurs in `text` starting exactly at byte `pos`.
///
/// A text that ends before the suffix completes, or a `pos` past the end or inside a
/// multi-byte character, simply does not match.
pub fn is_suffix_here(text: &str, pos: usize, suffix: &str) -> bool {
    text.get(pos..)
        .map_or(false, |rest| rest.starts_with(suffix))
}

/// Finds the suffix terminating the expression that starts at `after_prefix`.
///
/// Copes with nesting: for `${...${...}}` the correct end for the first `${` is the final
/// `}`, because the inner `{` is tracked as an open bracket.
///
/// Returns `Ok(None)` when no live suffix exists, and an error for unbalanced brackets or
/// an unterminated string literal. The returned position is a byte offset; error
/// positions are character offsets.
pub fn skip_to_correct_end_suffix(
    text: &str,
    after_prefix: usize,
    suffix: &str,
) -> Result<Option<usize>, TemplateError> {
    scan(text, after_prefix, suffix).map_err(|e| e.with_char_positions(text))
}

fn scan(text: &str, after_prefix: usize, suffix: &str) -> Result<Option<usize>, TemplateError> {
    if !text[after_prefix..].contains(suffix) {
        return Ok(None);
    }

    let bytes = text.as_bytes();
    let mut stack: Vec<Bracket> = Vec::new();
    let mut pos = after_prefix;

    // Tracked characters are all ASCII, so continuation bytes of multi-byte characters
    // fall through to the default arm.
    while pos < bytes.len() {
        if stack.is_empty() && is_suffix_here(text, pos, suffix) {
            break;
        }
        match bytes[pos] {
            ch @ (b'{' | b'[' | b'(') => stack.push(Bracket::new(ch as char, pos)),
            ch @ (b'}' | b']' | b')') => {
                let found = ch as char;
                let Some(open) = stack.pop() else {
                    return Err(TemplateError::new(
                        ErrorKind::UnbalancedCloser {
                            pos,
                            found,
                            expected: Bracket::open_for(found),
                        },
                        Span::at(pos, 1),
                    ));
                };
                if !open.is_compatible_with(found) {
                    // A closer that is also the expression suffix means the opener ran
                    // off the end of the expression rather than meeting the wrong partner.
                    if is_suffix_here(text, pos, suffix) {
                        return Err(unclosed(open));
                    }
                    return Err(TemplateError::new(
                        ErrorKind::MismatchedCloser {
                            pos,
                            found,
                            opener: open.bracket,
                            opener_pos: open.pos,
                        },
                        Span::at(pos, 1),
                    ));
                }
            }
            quote @ (b'\'' | b'"') => {
                // Jump to the end of the literal.
                let Some(len) = text[pos + 1..].find(quote as char) else {
                    return Err(TemplateError::new(
                        ErrorKind::UnterminatedLiteral {
                            pos,
                            quote: quote as char,
                        },
                        Span::at(pos, 1),
                    )
                    .with_help("string literals must be closed with the same quote character"));
                };
                pos += len + 1;
            }
            _ => {}
        }
        pos += 1;
    }

    if let Some(open) = stack.pop() {
        return Err(unclosed(open));
    }
    if !is_suffix_here(text, pos, suffix) {
        return Ok(None);
    }
    Ok(Some(pos))
}

fn unclosed(open: Bracket) -> TemplateError {
    TemplateError::new(
        ErrorKind::UnbalancedOpener {
            pos: open.pos,
            opener: open.bracket,
            expected: Bracket::close_for(open.bracket),
        },
        Span::at(open.pos, 1),
    )
}
