//! Template segmentation.
//!
//! Splits a template such as `foo${expr0}bar${expr1}` into its static text and the
//! expressions enclosed by the configured delimiters. Only the outermost delimiters are
//! recognised, so `hello ${foo${abc}}` yields `hello ` and `foo${abc}`.

use serde::Serialize;

use crate::context::ParserContext;
use crate::errors::{ErrorKind, TemplateError};
use crate::syntax::scanner::skip_to_correct_end_suffix;
use crate::syntax::{char_offset, Span};

/// One piece of a template, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Static text, copied to the output as-is.
    Literal { text: String, span: Span },
    /// Trimmed expression text; `span` covers exactly the trimmed text.
    Expression { raw: String, span: Span },
}

impl Segment {
    pub fn span(&self) -> Span {
        match self {
            Segment::Literal { span, .. } | Segment::Expression { span, .. } => *span,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Segment::Literal { text, .. } => text,
            Segment::Expression { raw, .. } => raw,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Segment::Expression { .. })
    }
}

/// Splits `text` into literal and expression segments without parsing the expressions.
///
/// An empty template yields a single empty literal.
pub fn segment(text: &str, context: &ParserContext) -> Result<Vec<Segment>, TemplateError> {
    context.validate()?;
    if text.is_empty() {
        return Ok(vec![Segment::Literal {
            text: String::new(),
            span: Span::default(),
        }]);
    }
    scan_segments(
        text,
        context,
        |literal, span| Segment::Literal {
            text: literal.to_string(),
            span,
        },
        |raw, span| {
            Ok(Segment::Expression {
                raw: raw.to_string(),
                span,
            })
        },
    )
}

/// Drives the decomposition, handing each literal and each trimmed expression to the
/// supplied builders in document order. The first failure aborts the whole scan.
pub(crate) fn scan_segments<T>(
    text: &str,
    context: &ParserContext,
    mut literal: impl FnMut(&str, Span) -> T,
    mut expression: impl FnMut(&str, Span) -> Result<T, TemplateError>,
) -> Result<Vec<T>, TemplateError> {
    let prefix = context.prefix();
    let suffix = context.suffix();
    let mut segments = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let Some(found) = text[start..].find(prefix) else {
            segments.push(literal(&text[start..], Span { start, end: text.len() }));
            break;
        };
        let prefix_pos = start + found;
        if prefix_pos > start {
            segments.push(literal(
                &text[start..prefix_pos],
                Span {
                    start,
                    end: prefix_pos,
                },
            ));
        }

        let after_prefix = prefix_pos + prefix.len();
        let Some(suffix_pos) = skip_to_correct_end_suffix(text, after_prefix, suffix)? else {
            return Err(TemplateError::new(
                ErrorKind::UnterminatedSpan {
                    pos: char_offset(text, prefix_pos),
                    suffix: suffix.to_string(),
                    remainder: text[prefix_pos..].to_string(),
                },
                Span::at(prefix_pos, prefix.len()),
            )
            .with_help(format!("close the expression with '{suffix}'")));
        };
        log::trace!("expression span {after_prefix}..{suffix_pos} for prefix at {prefix_pos}");

        let raw = &text[after_prefix..suffix_pos];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TemplateError::new(
                ErrorKind::EmptySpan {
                    pos: char_offset(text, prefix_pos),
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                },
                Span {
                    start: prefix_pos,
                    end: suffix_pos + suffix.len(),
                },
            ));
        }
        let leading = raw.len() - raw.trim_start().len();
        segments.push(expression(
            trimmed,
            Span::at(after_prefix + leading, trimmed.len()),
        )?);

        start = suffix_pos + suffix.len();
    }

    Ok(segments)
}
