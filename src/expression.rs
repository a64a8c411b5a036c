//! The evaluable surface of a parsed template.
//!
//! A template parses into a [`Template`]: a plain literal, a single pass-through
//! expression, or a composite of literal and expression parts that evaluates to the
//! concatenation of its parts.

use crate::context::ParserContext;
use crate::errors::{ErrorKind, TemplateError};
use crate::runtime::EvaluationContext;
use crate::value::Value;

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Something that can be evaluated against an [`EvaluationContext`].
pub trait Evaluable {
    /// Evaluate and return the resulting value.
    fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError>;

    /// The text this evaluable was parsed from.
    fn expression_string(&self) -> &str;

    /// Evaluate and render the result as template text.
    fn value_as_string(&self, ctx: &EvaluationContext) -> Result<String, TemplateError> {
        Ok(self.value(ctx)?.to_template_string())
    }

    /// Whether [`Evaluable::set_value`] can succeed for this expression.
    fn is_writable(&self, _ctx: &EvaluationContext) -> bool {
        false
    }

    fn set_value(&self, _ctx: &mut EvaluationContext, _value: Value) -> Result<(), TemplateError> {
        Err(TemplateError::unspanned(ErrorKind::NotWritable {
            expression: self.expression_string().to_string(),
        }))
    }
}

/// Turns the text of one embedded expression into an evaluable unit.
///
/// Errors should be positioned relative to `text`; the template parser re-bases them to
/// template coordinates.
pub trait SubParser {
    type Expr: Evaluable;

    fn parse_expression(
        &self,
        text: &str,
        context: &ParserContext,
    ) -> Result<Self::Expr, TemplateError>;
}

impl<E, F> SubParser for F
where
    E: Evaluable,
    F: Fn(&str, &ParserContext) -> Result<E, TemplateError>,
{
    type Expr = E;

    fn parse_expression(&self, text: &str, context: &ParserContext) -> Result<E, TemplateError> {
        self(text, context)
    }
}

// ============================================================================
// RESULT SHAPES
// ============================================================================

/// A piece of static text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralExpression {
    literal: String,
}

impl LiteralExpression {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

impl Evaluable for LiteralExpression {
    fn value(&self, _ctx: &EvaluationContext) -> Result<Value, TemplateError> {
        Ok(Value::String(self.literal.clone()))
    }

    fn expression_string(&self) -> &str {
        &self.literal
    }
}

/// One child of a composite template.
#[derive(Debug, Clone, PartialEq)]
pub enum Part<E> {
    Literal(LiteralExpression),
    Expression(E),
}

impl<E: Evaluable> Evaluable for Part<E> {
    fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
        match self {
            Part::Literal(literal) => literal.value(ctx),
            Part::Expression(expr) => expr.value(ctx),
        }
    }

    fn expression_string(&self) -> &str {
        match self {
            Part::Literal(literal) => literal.expression_string(),
            Part::Expression(expr) => expr.expression_string(),
        }
    }
}

/// A template with more than one part, evaluated by concatenation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeExpression<E> {
    source: String,
    parts: Vec<Part<E>>,
}

impl<E: Evaluable> CompositeExpression<E> {
    pub fn new(source: impl Into<String>, parts: Vec<Part<E>>) -> Self {
        Self {
            source: source.into(),
            parts,
        }
    }

    pub fn parts(&self) -> &[Part<E>] {
        &self.parts
    }
}

impl<E: Evaluable> Evaluable for CompositeExpression<E> {
    fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&part.value_as_string(ctx)?);
        }
        Ok(Value::String(out))
    }

    fn expression_string(&self) -> &str {
        &self.source
    }
}

/// The result of parsing a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Template<E> {
    /// No embedded expressions (including the empty template).
    Literal(LiteralExpression),
    /// Exactly one expression and no surrounding text; behaves as the expression itself.
    Expression(E),
    Composite(CompositeExpression<E>),
}

impl<E: Evaluable> Template<E> {
    /// The children in document order: one for literal and single-expression templates.
    pub fn parts(&self) -> Vec<&dyn Evaluable> {
        match self {
            Template::Literal(literal) => vec![literal as &dyn Evaluable],
            Template::Expression(expr) => vec![expr as &dyn Evaluable],
            Template::Composite(composite) => composite
                .parts()
                .iter()
                .map(|part| part as &dyn Evaluable)
                .collect(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Template::Composite(_))
    }
}

impl<E: Evaluable> Evaluable for Template<E> {
    fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
        match self {
            Template::Literal(literal) => literal.value(ctx),
            Template::Expression(expr) => expr.value(ctx),
            Template::Composite(composite) => composite.value(ctx),
        }
    }

    fn expression_string(&self) -> &str {
        match self {
            Template::Literal(literal) => literal.expression_string(),
            Template::Expression(expr) => expr.expression_string(),
            Template::Composite(composite) => composite.expression_string(),
        }
    }

    fn is_writable(&self, ctx: &EvaluationContext) -> bool {
        match self {
            Template::Expression(expr) => expr.is_writable(ctx),
            _ => false,
        }
    }

    fn set_value(&self, ctx: &mut EvaluationContext, value: Value) -> Result<(), TemplateError> {
        match self {
            Template::Expression(expr) => expr.set_value(ctx, value),
            _ => Err(TemplateError::unspanned(ErrorKind::NotWritable {
                expression: self.expression_string().to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Var(String);

    impl Evaluable for Var {
        fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
            Ok(ctx.get_var(&self.0).cloned().unwrap_or_default())
        }

        fn expression_string(&self) -> &str {
            &self.0
        }
    }

    #[test]
    fn test_composite_concatenates_and_skips_nil() {
        let mut ctx = EvaluationContext::new();
        ctx.set_var("n", Value::Number(7.0));
        let composite = CompositeExpression::new(
            "a #{n} #{missing}b",
            vec![
                Part::Literal(LiteralExpression::new("a ")),
                Part::Expression(Var("n".into())),
                Part::Literal(LiteralExpression::new(" ")),
                Part::Expression(Var("missing".into())),
                Part::Literal(LiteralExpression::new("b")),
            ],
        );
        assert_eq!(composite.value_as_string(&ctx).unwrap(), "a 7 b");
        assert_eq!(composite.expression_string(), "a #{n} #{missing}b");
    }

    #[test]
    fn test_literal_is_read_only() {
        let template: Template<Var> = Template::Literal(LiteralExpression::new("x"));
        let mut ctx = EvaluationContext::new();
        assert!(!template.is_writable(&ctx));
        let err = template.set_value(&mut ctx, Value::Nil).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::NotWritable {
                expression: "x".into()
            }
        );
    }

    #[test]
    fn test_single_expression_returns_raw_value() {
        let mut ctx = EvaluationContext::new();
        ctx.set_var("n", Value::Number(1.5));
        let template = Template::Expression(Var("n".into()));
        assert_eq!(template.value(&ctx).unwrap(), Value::Number(1.5));
        assert_eq!(template.parts().len(), 1);
    }
}
