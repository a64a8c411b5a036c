//! Templex: delimiter-aware expression templates.
//!
//! A template mixes static text with embedded expressions marked by configurable
//! delimiters, e.g. `Hello #{user.name}!`. Parsing splits it into literal and expression
//! segments, hands each expression to a [`SubParser`], and assembles the pieces into a
//! [`Template`] that evaluates by concatenation.
//!
//! ```rust
//! use templex::{lang, Evaluable, EvaluationContext, ParserContext, Value};
//!
//! let template = lang::template_parser()
//!     .parse_template("Hello #{name}!", &ParserContext::template())
//!     .unwrap();
//! let mut ctx = EvaluationContext::new();
//! ctx.set_var("name", Value::from("Ada"));
//! assert_eq!(template.value_as_string(&ctx).unwrap(), "Hello Ada!");
//! ```

pub use crate::context::ParserContext;
pub use crate::errors::{ErrorKind, Insert, TemplateError};
pub use crate::expression::{
    CompositeExpression, Evaluable, LiteralExpression, Part, SubParser, Template,
};
pub use crate::runtime::EvaluationContext;
pub use crate::syntax::{segment, Segment, Span};
pub use crate::template::TemplateParser;
pub use crate::value::Value;

pub mod cli;
pub mod context;
pub mod errors;
pub mod expression;
pub mod lang;
pub mod runtime;
pub mod syntax;
pub mod template;
pub mod value;
