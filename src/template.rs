//! Template-aware expression parsing.
//!
//! [`TemplateParser`] wraps a [`SubParser`] that understands a single expression and adds
//! template support on top: the template is segmented by the context's delimiters, each
//! embedded expression goes through the sub-parser, and the pieces are assembled into a
//! [`Template`].

use crate::context::ParserContext;
use crate::errors::{ErrorKind, TemplateError};
use crate::expression::{CompositeExpression, LiteralExpression, Part, SubParser, Template};
use crate::syntax::char_offset;
use crate::syntax::segmenter::scan_segments;

/// Name under which template text is attached to errors for rendering.
pub const TEMPLATE_SOURCE_NAME: &str = "template";

/// Parses templates, delegating embedded expressions to `P`.
///
/// Holds no per-parse state, so one parser can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct TemplateParser<P> {
    sub_parser: P,
}

impl<P: SubParser> TemplateParser<P> {
    pub fn new(sub_parser: P) -> Self {
        Self { sub_parser }
    }

    /// Parses `text` as a template if `context` says so, otherwise as one raw expression.
    ///
    /// Raw expressions must not be blank.
    pub fn parse_expression(
        &self,
        text: &str,
        context: Option<&ParserContext>,
    ) -> Result<Template<P::Expr>, TemplateError> {
        match context {
            Some(context) if context.is_template() => self.parse_template(text, context),
            _ => {
                if text.trim().is_empty() {
                    return Err(TemplateError::unspanned(ErrorKind::BlankExpression));
                }
                let raw = ParserContext::raw();
                let context = context.unwrap_or(&raw);
                self.sub_parser
                    .parse_expression(text, context)
                    .map(Template::Expression)
                    .map_err(|e| e.with_source(TEMPLATE_SOURCE_NAME, text))
            }
        }
    }

    /// Parses `text` as a template with the delimiters of `context`.
    ///
    /// An empty template is the empty literal. A template that is exactly one expression
    /// is returned as that expression, unwrapped, so it keeps the expression's behaviour
    /// (writability included). Anything else becomes a composite.
    pub fn parse_template(
        &self,
        text: &str,
        context: &ParserContext,
    ) -> Result<Template<P::Expr>, TemplateError> {
        context.validate()?;
        if text.is_empty() {
            return Ok(Template::Literal(LiteralExpression::new("")));
        }

        let mut parts = scan_segments(
            text,
            context,
            |literal, _| Part::Literal(LiteralExpression::new(literal)),
            |raw, span| {
                self.sub_parser
                    .parse_expression(raw, context)
                    .map(Part::Expression)
                    .map_err(|e| e.rebased(span.start, char_offset(text, span.start)))
            },
        )
        .map_err(|e| e.with_source(TEMPLATE_SOURCE_NAME, text))?;
        log::debug!("parsed template into {} part(s)", parts.len());

        if parts.len() == 1 {
            return Ok(match parts.pop() {
                Some(Part::Expression(expr)) => Template::Expression(expr),
                Some(Part::Literal(literal)) => Template::Literal(literal),
                None => Template::Literal(LiteralExpression::new("")),
            });
        }
        Ok(Template::Composite(CompositeExpression::new(text, parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::expression::Evaluable;
    use crate::runtime::EvaluationContext;
    use crate::syntax::Span;
    use crate::value::Value;

    /// Echoes the expression text back, upper-cased, and rejects `!`.
    #[derive(Debug, Clone, PartialEq)]
    struct Shout(String);

    impl Evaluable for Shout {
        fn value(&self, _ctx: &EvaluationContext) -> Result<Value, TemplateError> {
            Ok(Value::String(self.0.to_uppercase()))
        }

        fn expression_string(&self) -> &str {
            &self.0
        }
    }

    fn shout(text: &str, _ctx: &ParserContext) -> Result<Shout, TemplateError> {
        match text.find('!') {
            Some(byte) => Err(TemplateError::new(
                ErrorKind::SubParser {
                    pos: text[..byte].chars().count(),
                    message: "unexpected '!'".into(),
                },
                Span::at(byte, 1),
            )),
            None => Ok(Shout(text.to_string())),
        }
    }

    fn parser() -> TemplateParser<fn(&str, &ParserContext) -> Result<Shout, TemplateError>> {
        TemplateParser::new(shout)
    }

    #[test]
    fn test_empty_template() {
        let template = parser().parse_template("", &ParserContext::dollar()).unwrap();
        assert_eq!(template, Template::Literal(LiteralExpression::new("")));
    }

    #[test]
    fn test_single_expression_is_unwrapped() {
        let template = parser().parse_template("${abc}", &ParserContext::dollar()).unwrap();
        assert_eq!(template, Template::Expression(Shout("abc".into())));
    }

    #[test]
    fn test_composite_evaluation() {
        let template = parser()
            .parse_template("hello ${abc}!", &ParserContext::dollar())
            .unwrap();
        assert!(template.is_composite());
        let ctx = EvaluationContext::new();
        assert_eq!(template.value_as_string(&ctx).unwrap(), "hello ABC!");
    }

    #[test]
    fn test_sub_parser_errors_are_rebased() {
        let err = parser()
            .parse_template("ab ${  x!y }", &ParserContext::dollar())
            .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::SubParser {
                pos: 8,
                message: "unexpected '!'".into()
            }
        );
        assert_eq!(err.span, Span::at(8, 1));
        assert_eq!(err.source_text(), Some("ab ${  x!y }"));
    }

    #[test]
    fn test_rebased_positions_count_characters() {
        let err = parser()
            .parse_template("ñ ${ x!y }", &ParserContext::dollar())
            .unwrap_err();
        assert_eq!(err.offset(), Some(6));
        assert_eq!(err.span, Span::at(7, 1));
    }

    #[test]
    fn test_raw_mode_requires_text() {
        let err = parser().parse_expression("   ", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BlankExpression);
        let template = parser().parse_expression("${abc}", None).unwrap();
        assert_eq!(template, Template::Expression(Shout("${abc}".into())));
    }

    #[test]
    fn test_template_mode_via_context() {
        let ctx = ParserContext::dollar();
        let template = parser().parse_expression("", Some(&ctx)).unwrap();
        assert_eq!(template, Template::Literal(LiteralExpression::new("")));
    }

    #[test]
    fn test_invalid_delimiters_rejected() {
        let err = parser()
            .parse_template("x", &ParserContext::new("", "}"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDelimiter { which: "prefix" });
    }
}
