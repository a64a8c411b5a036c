//! A small expression language for template bodies.
//!
//! Supports string, number, boolean and `null` literals, property paths such as
//! `user.tags[0]` or `user['first name']`, parenthesised groups and lists `(a, b)`.
//! Paths resolve against the [`EvaluationContext`]; an unknown root variable is `null`.
//! Paths are writable, everything else is read-only.

use crate::context::ParserContext;
use crate::errors::{ErrorKind, TemplateError};
use crate::expression::{Evaluable, SubParser};
use crate::runtime::EvaluationContext;
use crate::template::TemplateParser;
use crate::value::Value;

pub mod parser;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Property(String),
    Key(String),
    Index(usize),
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(Value),
    Path {
        root: String,
        accessors: Vec<Accessor>,
    },
    List(Vec<Node>),
}

/// A parsed expression together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    node: Node,
}

/// The [`SubParser`] for this language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionParser;

impl SubParser for ExpressionParser {
    type Expr = Expression;

    fn parse_expression(
        &self,
        text: &str,
        _context: &ParserContext,
    ) -> Result<Expression, TemplateError> {
        Ok(Expression {
            source: text.to_string(),
            node: parser::parse(text)?,
        })
    }
}

/// A template parser using this language for embedded expressions.
pub fn template_parser() -> TemplateParser<ExpressionParser> {
    TemplateParser::new(ExpressionParser)
}

impl Evaluable for Expression {
    fn value(&self, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
        evaluate(&self.node, ctx)
    }

    fn expression_string(&self) -> &str {
        &self.source
    }

    fn is_writable(&self, _ctx: &EvaluationContext) -> bool {
        matches!(self.node, Node::Path { .. })
    }

    fn set_value(&self, ctx: &mut EvaluationContext, value: Value) -> Result<(), TemplateError> {
        let Node::Path { root, accessors } = &self.node else {
            return Err(TemplateError::unspanned(ErrorKind::NotWritable {
                expression: self.source.clone(),
            }));
        };
        let Some((last, parents)) = accessors.split_last() else {
            ctx.set_var(root, value);
            return Ok(());
        };
        let target = ctx
            .get_var_mut(root)
            .ok_or_else(|| TemplateError::evaluation(format!("variable '{root}' is not defined")))?;
        let target = parents
            .iter()
            .try_fold(target, |current, accessor| step_mut(current, accessor))?;
        match (target, last) {
            (Value::Map(map), Accessor::Property(key) | Accessor::Key(key)) => {
                map.insert(key.clone(), value);
                Ok(())
            }
            (Value::List(items), Accessor::Index(i)) => {
                let len = items.len();
                let slot = items.get_mut(*i).ok_or_else(|| out_of_bounds(*i, len))?;
                *slot = value;
                Ok(())
            }
            (other, accessor) => Err(cannot_access(other, accessor)),
        }
    }
}

fn evaluate(node: &Node, ctx: &EvaluationContext) -> Result<Value, TemplateError> {
    match node {
        Node::Literal(value) => Ok(value.clone()),
        Node::List(items) => items
            .iter()
            .map(|item| evaluate(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Node::Path { root, accessors } => {
            let start = ctx.get_var(root).cloned().unwrap_or_default();
            accessors
                .iter()
                .try_fold(start, |current, accessor| step(&current, accessor))
        }
    }
}

fn step(current: &Value, accessor: &Accessor) -> Result<Value, TemplateError> {
    match (current, accessor) {
        (Value::Map(map), Accessor::Property(key) | Accessor::Key(key)) => {
            Ok(map.get(key).cloned().unwrap_or_default())
        }
        (Value::List(items), Accessor::Index(i)) => items
            .get(*i)
            .cloned()
            .ok_or_else(|| out_of_bounds(*i, items.len())),
        (other, accessor) => Err(cannot_access(other, accessor)),
    }
}

fn step_mut<'a>(current: &'a mut Value, accessor: &Accessor) -> Result<&'a mut Value, TemplateError> {
    match (current, accessor) {
        (Value::Map(map), Accessor::Property(key) | Accessor::Key(key)) => map
            .get_mut(key)
            .ok_or_else(|| TemplateError::evaluation(format!("no entry '{key}' to assign into"))),
        (Value::List(items), Accessor::Index(i)) => {
            let len = items.len();
            items.get_mut(*i).ok_or_else(|| out_of_bounds(*i, len))
        }
        (other, accessor) => Err(cannot_access(other, accessor)),
    }
}

fn out_of_bounds(index: usize, len: usize) -> TemplateError {
    TemplateError::evaluation(format!("index {index} out of bounds for list of length {len}"))
}

fn cannot_access(value: &Value, accessor: &Accessor) -> TemplateError {
    let what = match accessor {
        Accessor::Property(name) => format!("property '{name}'"),
        Accessor::Key(key) => format!("key '{key}'"),
        Accessor::Index(i) => format!("index {i}"),
    };
    TemplateError::evaluation(format!("cannot read {what} of {}", value.type_name()))
}
