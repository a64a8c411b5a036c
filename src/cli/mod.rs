//! The Templex Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{
    fs,
    io::{self, Read},
    path::Path,
    process,
};

use clap::Parser;
use im::HashMap;

use crate::cli::args::{Command, DelimiterArgs, DiagnosticStyle, InputArgs, TemplexArgs, VarArgs};
use crate::cli::diagnostics::{print_diagnostic_to_stderr, TemplateDiagnostic};
use crate::context::ParserContext;
use crate::errors::TemplateError;
use crate::expression::Evaluable;
use crate::lang;
use crate::runtime::EvaluationContext;
use crate::syntax::segment;
use crate::value::Value;

pub mod args;
pub mod diagnostics;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TemplexArgs::parse();
    let style = args.diagnostics;

    if let Err(error) = execute(args) {
        print_error(error, style);
        process::exit(1);
    }
}

fn execute(args: TemplexArgs) -> Result<(), TemplateError> {
    let context = resolve_context(&args.delimiters)?;
    log::debug!(
        "using delimiters {:?} ... {:?}",
        context.prefix(),
        context.suffix()
    );

    match args.command {
        Command::Segments { input, json } => {
            let text = read_input(&input)?;
            let segments = segment(&text, &context).map_err(|e| e.with_source("template", &text))?;
            if json {
                output::print_segments_json(&segments)
            } else {
                output::print_segments(&segments).map_err(TemplateError::io)
            }
        }

        Command::Check { input } => {
            let text = read_input(&input)?;
            let template = lang::template_parser().parse_expression(&text, Some(&context))?;
            println!("{}", output::check_summary(&template));
            Ok(())
        }

        Command::Render { input, vars } => {
            let text = read_input(&input)?;
            let ctx = build_evaluation_context(&vars)?;
            let template = lang::template_parser().parse_expression(&text, Some(&context))?;
            print!("{}", template.value_as_string(&ctx)?);
            Ok(())
        }

        Command::Eval { expression, vars } => {
            let ctx = build_evaluation_context(&vars)?;
            let parsed = lang::template_parser().parse_expression(&expression, None)?;
            println!("{}", parsed.value(&ctx)?);
            Ok(())
        }
    }
}

/// Prints an error with full miette diagnostics, or as plain text.
pub fn print_error(error: TemplateError, style: DiagnosticStyle) {
    match style {
        DiagnosticStyle::Fancy => {
            let report = miette::Report::new(error);
            eprintln!("{report:?}");
        }
        DiagnosticStyle::Plain => print_diagnostic_to_stderr(&TemplateDiagnostic::new(&error)),
    }
}

/// Builds the parser context: config file or preset first, then delimiter overrides.
fn resolve_context(args: &DelimiterArgs) -> Result<ParserContext, TemplateError> {
    let mut context = match (&args.config, args.dollar) {
        (Some(path), _) => {
            log::debug!("loading parser context from {}", path.display());
            ParserContext::from_json_file(path)?
        }
        (None, true) => ParserContext::dollar(),
        (None, false) => ParserContext::template(),
    };
    if let Some(prefix) = &args.prefix {
        context = context.with_prefix(prefix.as_str());
    }
    if let Some(suffix) = &args.suffix {
        context = context.with_suffix(suffix.as_str());
    }
    context.validate()?;
    Ok(context)
}

fn read_input(input: &InputArgs) -> Result<String, TemplateError> {
    match (&input.text, &input.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => read_file(path),
        (None, None) => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| TemplateError::io(format!("failed to read standard input: {e}")))?;
            Ok(text)
        }
    }
}

fn read_file(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path)
        .map_err(|e| TemplateError::io(format!("failed to read '{}': {e}", path.display())))
}

fn build_evaluation_context(args: &VarArgs) -> Result<EvaluationContext, TemplateError> {
    let mut vars: HashMap<String, Value> = match &args.vars_file {
        Some(path) => serde_json::from_str(&read_file(path)?).map_err(|e| {
            TemplateError::io(format!("'{}' is not a JSON object: {e}", path.display()))
        })?,
        None => HashMap::new(),
    };
    for assignment in &args.vars {
        let (name, raw) = parse_assignment(assignment)?;
        vars.insert(name.to_string(), raw);
    }
    Ok(EvaluationContext::with_vars(vars))
}

/// Splits `NAME=VALUE`; VALUE is JSON when it parses as JSON, otherwise a string.
fn parse_assignment(assignment: &str) -> Result<(&str, Value), TemplateError> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| TemplateError::io(format!("expected NAME=VALUE, got '{assignment}'")))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.trim(), value))
}
