//! Builds expression trees from the pest grammar.

use pest::{
    error::{Error, InputLocation},
    iterators::Pair,
    Parser,
};
use pest_derive::Parser;

use crate::errors::{ErrorKind, TemplateError};
use crate::lang::{Accessor, Node};
use crate::syntax::Span;
use crate::value::Value;

#[derive(Parser)]
#[grammar = "lang/grammar.pest"]
struct ExpressionGrammar;

/// Parse one expression. Error positions are character offsets into `text`.
pub fn parse(text: &str) -> Result<Node, TemplateError> {
    parse_node(text).map_err(|e| e.with_char_positions(text))
}

fn parse_node(text: &str) -> Result<Node, TemplateError> {
    let mut pairs = ExpressionGrammar::parse(Rule::expression, text).map_err(convert_parse_error)?;
    let inner = pairs
        .next()
        .and_then(|expression| expression.into_inner().next())
        .ok_or_else(|| malformed("empty expression", 0))?;
    build_node(inner)
}

fn build_node(pair: Pair<Rule>) -> Result<Node, TemplateError> {
    let pos = pair.as_span().start();
    match pair.as_rule() {
        Rule::string => Ok(Node::Literal(Value::String(unquote(pair.as_str())))),
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(|n| Node::Literal(Value::Number(n)))
            .map_err(|_| malformed(&format!("invalid number '{}'", pair.as_str()), pos)),
        Rule::boolean => Ok(Node::Literal(Value::Bool(pair.as_str() == "true"))),
        Rule::null => Ok(Node::Literal(Value::Nil)),
        Rule::group => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| malformed("empty group", pos))?;
            build_node(inner)
        }
        Rule::list => pair
            .into_inner()
            .map(build_node)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::List),
        Rule::path => build_path(pair),
        rule => Err(malformed(&format!("unsupported rule: {rule:?}"), pos)),
    }
}

fn build_path(pair: Pair<Rule>) -> Result<Node, TemplateError> {
    let pos = pair.as_span().start();
    let mut inner = pair.into_inner();
    let root = inner
        .next()
        .ok_or_else(|| malformed("path without a root", pos))?
        .as_str()
        .to_string();

    let mut accessors = Vec::new();
    for step in inner {
        let step_pos = step.as_span().start();
        let target = step
            .into_inner()
            .next()
            .ok_or_else(|| malformed("accessor without a target", step_pos))?;
        let accessor = match target.as_rule() {
            Rule::identifier => Accessor::Property(target.as_str().to_string()),
            Rule::string => Accessor::Key(unquote(target.as_str())),
            Rule::integer => target
                .as_str()
                .parse::<usize>()
                .map(Accessor::Index)
                .map_err(|_| malformed("index out of range", target.as_span().start()))?,
            rule => return Err(malformed(&format!("unsupported accessor: {rule:?}"), step_pos)),
        };
        accessors.push(accessor);
    }
    Ok(Node::Path { root, accessors })
}

/// Strips the quotes of a string literal; `''` inside single quotes is one quote.
fn unquote(literal: &str) -> String {
    let body = &literal[1..literal.len() - 1];
    if literal.starts_with('\'') {
        body.replace("''", "'")
    } else {
        body.to_string()
    }
}

fn malformed(message: &str, pos: usize) -> TemplateError {
    TemplateError::new(
        ErrorKind::SubParser {
            pos,
            message: message.to_string(),
        },
        Span::at(pos, 0),
    )
}

fn convert_parse_error(error: Error<Rule>) -> TemplateError {
    let span = match error.location {
        InputLocation::Pos(pos) => Span::at(pos, 0),
        InputLocation::Span((start, end)) => Span { start, end },
    };
    TemplateError::new(
        ErrorKind::SubParser {
            pos: span.start,
            message: error.variant.message().to_string(),
        },
        span,
    )
}
