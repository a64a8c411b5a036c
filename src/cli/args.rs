//! Defines the command-line arguments and subcommands for the Templex CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "templex",
    version,
    about = "Split templates into literal text and embedded expressions, and render them."
)]
pub struct TemplexArgs {
    #[command(flatten)]
    pub delimiters: DelimiterArgs,

    /// How parse errors are rendered.
    #[arg(long, value_enum, default_value_t = DiagnosticStyle::Fancy, global = true)]
    pub diagnostics: DiagnosticStyle,

    #[command(subcommand)]
    pub command: Command,
}

/// Delimiter configuration. Defaults to `#{ ... }`.
#[derive(Debug, Args)]
pub struct DelimiterArgs {
    /// Token that opens an embedded expression.
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Token that closes an embedded expression.
    #[arg(long, global = true)]
    pub suffix: Option<String>,

    /// Use `${ ... }` delimiters.
    #[arg(long, global = true, conflicts_with = "config")]
    pub dollar: bool,

    /// Read the delimiter configuration from a JSON file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Where the template text comes from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Template file to read; standard input is used when omitted.
    pub file: Option<PathBuf>,

    /// Template text given inline.
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
}

/// Variables available to expressions.
#[derive(Debug, Args)]
pub struct VarArgs {
    /// A variable as NAME=VALUE; VALUE is read as JSON when it parses, else as a string.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// A JSON object whose entries become variables.
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the literal and expression segments of a template.
    Segments {
        #[command(flatten)]
        input: InputArgs,

        /// Print the segments as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Parse a template and its expressions, reporting the first error.
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse a template and print its evaluated text.
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        vars: VarArgs,
    },
    /// Evaluate a single expression without template delimiters.
    Eval {
        /// The expression to evaluate.
        expression: String,

        #[command(flatten)]
        vars: VarArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiagnosticStyle {
    /// Rich `miette` reports.
    Fancy,
    /// Plain text with a caret snippet.
    Plain,
}
