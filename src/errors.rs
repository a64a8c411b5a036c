//! Templex Error Handling
//!
//! Every failure produced while segmenting, parsing, or evaluating a template is a
//! [`TemplateError`]: a structured [`ErrorKind`] discriminant carrying the offsets and
//! bracket/quote characters involved, the primary [`Span`] in template coordinates, and
//! (once attached) the template text so `miette` can render a labelled snippet.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource};
use thiserror::Error;

use crate::syntax::{char_offset, Span};

// ============================================================================
// ERROR KINDS
// ============================================================================

/// All error kinds as a clean enum.
///
/// `pos` fields are character offsets into the template; the error's [`Span`] holds the
/// same location in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Template structure errors
    #[error("No ending suffix '{suffix}' for expression starting at character {pos}: {remainder}")]
    UnterminatedSpan {
        pos: usize,
        suffix: String,
        remainder: String,
    },
    #[error("No expression defined within delimiter '{prefix}{suffix}' at character {pos}")]
    EmptySpan {
        pos: usize,
        prefix: String,
        suffix: String,
    },
    #[error("Found closing '{found}' at position {pos} without an opening '{expected}'")]
    UnbalancedCloser {
        pos: usize,
        found: char,
        expected: char,
    },
    #[error("Found closing '{found}' at position {pos} but most recent opening is '{opener}' at position {opener_pos}")]
    MismatchedCloser {
        pos: usize,
        found: char,
        opener: char,
        opener_pos: usize,
    },
    #[error("Missing closing '{expected}' for '{opener}' at position {pos}")]
    UnbalancedOpener {
        pos: usize,
        opener: char,
        expected: char,
    },
    #[error("Found non terminating string literal starting at position {pos}")]
    UnterminatedLiteral { pos: usize, quote: char },
    #[error("{message} (at position {pos})")]
    SubParser { pos: usize, message: String },

    // Configuration and API misuse
    #[error("Invalid delimiter: the expression {which} must not be empty")]
    InvalidDelimiter { which: &'static str },
    #[error("Expression string must not be blank")]
    BlankExpression,
    #[error("Invalid parser context: {message}")]
    InvalidConfig { message: String },

    // Evaluation
    #[error("Cannot set value on read-only expression '{expression}'")]
    NotWritable { expression: String },
    #[error("Evaluation failed: {message}")]
    Evaluation { message: String },

    // Tooling
    #[error("I/O error: {message}")]
    Io { message: String },
}

/// One auxiliary value attached to an error, in message order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    Offset(usize),
    Char(char),
    Token(String),
}

impl ErrorKind {
    /// The offset that triggered the error, if it is tied to a template position.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnterminatedSpan { pos, .. }
            | Self::EmptySpan { pos, .. }
            | Self::UnbalancedCloser { pos, .. }
            | Self::MismatchedCloser { pos, .. }
            | Self::UnbalancedOpener { pos, .. }
            | Self::UnterminatedLiteral { pos, .. }
            | Self::SubParser { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    /// The ordered auxiliary values of this error, as they appear in its message.
    pub fn inserts(&self) -> Vec<Insert> {
        use Insert::*;
        match self {
            Self::UnterminatedSpan {
                pos,
                suffix,
                remainder,
            } => vec![Token(suffix.clone()), Offset(*pos), Token(remainder.clone())],
            Self::EmptySpan {
                pos,
                prefix,
                suffix,
            } => vec![Token(format!("{prefix}{suffix}")), Offset(*pos)],
            Self::UnbalancedCloser {
                pos,
                found,
                expected,
            } => vec![Char(*found), Offset(*pos), Char(*expected)],
            Self::MismatchedCloser {
                pos,
                found,
                opener,
                opener_pos,
            } => vec![Char(*found), Offset(*pos), Char(*opener), Offset(*opener_pos)],
            Self::UnbalancedOpener {
                pos,
                opener,
                expected,
            } => vec![Char(*expected), Char(*opener), Offset(*pos)],
            Self::UnterminatedLiteral { pos, quote } => vec![Char(*quote), Offset(*pos)],
            Self::SubParser { pos, message } => vec![Token(message.clone()), Offset(*pos)],
            Self::InvalidDelimiter { which } => vec![Token((*which).to_string())],
            Self::NotWritable { expression } => vec![Token(expression.clone())],
            Self::InvalidConfig { message }
            | Self::Evaluation { message }
            | Self::Io { message } => vec![Token(message.clone())],
            Self::BlankExpression => vec![],
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnterminatedSpan { .. } => "unterminated_span",
            Self::EmptySpan { .. } => "empty_span",
            Self::UnbalancedCloser { .. } => "unbalanced_closer",
            Self::MismatchedCloser { .. } => "mismatched_closer",
            Self::UnbalancedOpener { .. } => "unbalanced_opener",
            Self::UnterminatedLiteral { .. } => "unterminated_literal",
            Self::SubParser { .. } => "expression",
            Self::InvalidDelimiter { .. } => "invalid_delimiter",
            Self::BlankExpression => "blank_expression",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::NotWritable { .. } => "not_writable",
            Self::Evaluation { .. } => "evaluation",
            Self::Io { .. } => "io",
        }
    }

    /// True for the seven kinds a template parse can fail with.
    pub fn is_parse_error(&self) -> bool {
        self.offset().is_some()
    }

    fn map_positions(&mut self, f: impl Fn(usize) -> usize) {
        match self {
            Self::MismatchedCloser {
                pos, opener_pos, ..
            } => {
                *pos = f(*pos);
                *opener_pos = f(*opener_pos);
            }
            Self::UnterminatedSpan { pos, .. }
            | Self::EmptySpan { pos, .. }
            | Self::UnbalancedCloser { pos, .. }
            | Self::UnbalancedOpener { pos, .. }
            | Self::UnterminatedLiteral { pos, .. }
            | Self::SubParser { pos, .. } => *pos = f(*pos),
            _ => {}
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnterminatedSpan { .. } => "expression starts here",
            Self::EmptySpan { .. } => "empty expression",
            Self::UnbalancedCloser { .. } => "unexpected closing bracket",
            Self::MismatchedCloser { .. } => "mismatched closing bracket",
            Self::UnbalancedOpener { .. } => "never closed",
            Self::UnterminatedLiteral { .. } => "string literal starts here",
            Self::SubParser { .. } => "invalid expression",
            _ => "here",
        }
    }
}

// ============================================================================
// TEMPLATE ERROR
// ============================================================================

/// The single error type: what went wrong, where, and in which text.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct TemplateError {
    pub kind: ErrorKind,
    pub span: Span,
    pub help: Option<String>,
    source_code: Option<Arc<NamedSource<String>>>,
}

impl TemplateError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            help: None,
            source_code: None,
        }
    }

    /// An error not tied to a position, such as I/O or configuration failures.
    pub fn unspanned(kind: ErrorKind) -> Self {
        Self::new(kind, Span::default())
    }

    pub fn io(err: impl fmt::Display) -> Self {
        Self::unspanned(ErrorKind::Io {
            message: err.to_string(),
        })
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::unspanned(ErrorKind::Evaluation {
            message: message.into(),
        })
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach the text the span refers to, replacing any previously attached text.
    pub fn with_source(mut self, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.source_code = Some(Arc::new(NamedSource::new(name, text.into())));
        self
    }

    /// Move this error forward by `bytes` in its span and `chars` in its positions.
    ///
    /// Sub-parser errors are positioned relative to the extracted expression; the
    /// template parser calls this with the expression's start offset so users see
    /// template coordinates.
    pub fn rebased(mut self, bytes: usize, chars: usize) -> Self {
        self.kind.map_positions(|pos| pos + chars);
        self.span = Span {
            start: self.span.start + bytes,
            end: self.span.end + bytes,
        };
        self
    }

    /// Convert positions that were recorded as byte offsets into `text` to character
    /// offsets. The span is left in bytes.
    pub fn with_char_positions(mut self, text: &str) -> Self {
        self.kind.map_positions(|pos| char_offset(text, pos));
        self
    }

    pub fn offset(&self) -> Option<usize> {
        self.kind.offset()
    }

    pub fn inserts(&self) -> Vec<Insert> {
        self.kind.inserts()
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source_code.as_deref().map(|s| s.inner().as_str())
    }
}

impl PartialEq for TemplateError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.span == other.span
    }
}

impl Diagnostic for TemplateError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("templex::{}", self.kind.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source_code.as_ref()?;
        let mut labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            miette::SourceSpan::from(self.span),
        )];
        if let ErrorKind::MismatchedCloser {
            opener, opener_pos, ..
        } = &self.kind
        {
            labels.push(LabeledSpan::new_with_span(
                Some(format!("'{opener}' opened here")),
                miette::SourceSpan::from(Span::at(*opener_pos, 1)),
            ));
        }
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_code
            .as_deref()
            .map(|s| s as &dyn miette::SourceCode)
    }
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_inserts_follow_message_order() {
        let kind = ErrorKind::MismatchedCloser {
            pos: 7,
            found: ']',
            opener: '(',
            opener_pos: 3,
        };
        assert_eq!(
            kind.inserts(),
            vec![
                Insert::Char(']'),
                Insert::Offset(7),
                Insert::Char('('),
                Insert::Offset(3)
            ]
        );
        assert_eq!(
            kind.to_string(),
            "Found closing ']' at position 7 but most recent opening is '(' at position 3"
        );
    }

    #[test]
    fn test_rebased_shifts_every_position() {
        let err = TemplateError::new(
            ErrorKind::MismatchedCloser {
                pos: 2,
                found: ')',
                opener: '[',
                opener_pos: 0,
            },
            Span::at(2, 1),
        )
        .rebased(10, 8);
        assert_eq!(err.offset(), Some(10));
        assert_eq!(err.span, Span { start: 12, end: 13 });
        assert!(matches!(
            err.kind,
            ErrorKind::MismatchedCloser { opener_pos: 8, .. }
        ));
    }

    #[test]
    fn test_byte_positions_become_char_positions() {
        let text = "ñé (x]";
        let err = TemplateError::new(
            ErrorKind::MismatchedCloser {
                pos: 7,
                found: ']',
                opener: '(',
                opener_pos: 5,
            },
            Span::at(7, 1),
        )
        .with_char_positions(text);
        assert_eq!(
            err.kind,
            ErrorKind::MismatchedCloser {
                pos: 5,
                found: ']',
                opener: '(',
                opener_pos: 3
            }
        );
        assert_eq!(err.span, Span::at(7, 1));
    }

    #[test]
    fn test_invalid_config_code() {
        let err = TemplateError::unspanned(ErrorKind::InvalidConfig {
            message: "expected value".into(),
        });
        assert_eq!(err.kind.code_suffix(), "invalid_config");
        assert_eq!(err.offset(), None);
    }

    #[test]
    fn test_report_renders_code_and_label() {
        let err = TemplateError::new(
            ErrorKind::UnterminatedLiteral { pos: 4, quote: '\'' },
            Span::at(4, 1),
        )
        .with_source("template", "#{ 'abc }")
        .with_help("close the string literal with a matching quote");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("templex::unterminated_literal"));
        assert!(output.contains("string literal starts here"));
        assert!(output.contains("close the string literal"));
    }

    #[test]
    fn test_unspanned_errors_have_no_offset() {
        let err = TemplateError::io("disk on fire");
        assert_eq!(err.offset(), None);
        assert!(!err.kind.is_parse_error());
        assert_eq!(err.to_string(), "I/O error: disk on fire");
    }
}
