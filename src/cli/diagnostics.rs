//! Plain diagnostic presentation for Templex errors.
//!
//! This module provides the `TemplateDiagnostic` type which renders an error with its
//! location and a caret snippet of the template line, optionally colorized.

use std::fmt::{Display, Formatter, Result as FmtResult};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::errors::TemplateError;
use crate::syntax::Span;

/// A diagnostic wrapper that pairs a `TemplateError` with the text it refers to.
pub struct TemplateDiagnostic<'a> {
    error: &'a TemplateError,
    source: Option<&'a str>,
}

impl<'a> TemplateDiagnostic<'a> {
    /// Uses the template text attached to the error, if any.
    pub fn new(error: &'a TemplateError) -> Self {
        Self {
            error,
            source: error.source_text(),
        }
    }

    pub fn with_source(error: &'a TemplateError, source: &'a str) -> Self {
        Self {
            error,
            source: Some(source),
        }
    }

    fn location(&self) -> Option<String> {
        self.error.offset()?;
        Some(format_location(&self.error.span, self.source))
    }
}

impl<'a> Display for TemplateDiagnostic<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Error")?;
        if let Some(loc) = self.location() {
            write!(f, "{loc}")?;
        }
        writeln!(f, ":")?;
        writeln!(f, "{}", self.error)?;

        if let (Some(_), Some(source)) = (self.error.offset(), self.source) {
            if let Some(snippet) = generate_code_snippet(source, &self.error.span) {
                write!(f, "\n{snippet}")?;
            }
        }
        if let Some(help) = &self.error.help {
            writeln!(f, "help: {help}")?;
        }
        Ok(())
    }
}

/// Formats the error location as a human-readable string, using line/col if possible.
fn format_location(span: &Span, source: Option<&str>) -> String {
    if let Some(((line, col), _)) = source.and_then(|s| span.byte_to_line_col(s)) {
        return format!(" [at line {line}, col {col}]");
    }
    format!(" [at {}-{}]", span.start, span.end)
}

/// The line holding the start of `span`, with a pointer under the spanned text.
fn generate_code_snippet(source: &str, span: &Span) -> Option<String> {
    let ((line_num, _), _) = span.byte_to_line_col(source)?;
    let line_start = source[..span.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);
    let line = &source[line_start..line_end];

    let indent = source[line_start..span.start].width();
    let marked_end = span.end.clamp(span.start, line_end);
    let marked = source[span.start..marked_end].width().max(1);

    let gutter = line_num.to_string().len();
    let mut out = format!("{line_num:gutter$} | {line}\n");
    out.push_str(&format!(
        "{:gutter$} | {}^{} {}\n",
        "",
        " ".repeat(indent),
        "-".repeat(marked - 1),
        "here"
    ));
    Some(out)
}

/// Prints a diagnostic to standard error, colorized when the terminal supports it.
pub fn print_diagnostic_to_stderr(diagnostic: &TemplateDiagnostic) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    if print_diagnostic_colored(&mut stderr, diagnostic).is_err() {
        eprintln!("{diagnostic}");
    }
}

fn print_diagnostic_colored(
    writer: &mut impl WriteColor,
    diagnostic: &TemplateDiagnostic,
) -> std::io::Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "Error")?;
    writer.reset()?;
    if let Some(loc) = diagnostic.location() {
        write!(writer, "{loc}")?;
    }
    writeln!(writer, ":")?;
    writeln!(writer, "{}", diagnostic.error)?;

    if let (Some(_), Some(source)) = (diagnostic.error.offset(), diagnostic.source) {
        if let Some(snippet) = generate_code_snippet(source, &diagnostic.error.span) {
            write!(writer, "\n{snippet}")?;
        }
    }
    if let Some(help) = &diagnostic.error.help {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(writer, "help")?;
        writer.reset()?;
        writeln!(writer, ": {help}")?;
    }
    writer.reset()?;
    Ok(())
}
