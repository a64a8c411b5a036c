//! Handles all user-facing output for the CLI.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::TemplateError;
use crate::expression::{Evaluable, Part, Template};
use crate::syntax::Segment;

/// Renders segments one per line: kind, byte range, and the quoted text.
pub fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| {
            let kind = if segment.is_expression() {
                "expression"
            } else {
                "literal"
            };
            let span = segment.span();
            format!("{kind:<10} {:>4}..{:<4} {:?}", span.start, span.end, segment.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints segments to stdout, highlighting expression rows.
pub fn print_segments(segments: &[Segment]) -> std::io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (segment, line) in segments.iter().zip(format_segments(segments).lines()) {
        if segment.is_expression() {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        }
        writeln!(stdout, "{line}")?;
        stdout.reset()?;
    }
    Ok(())
}

pub fn print_segments_json(segments: &[Segment]) -> Result<(), TemplateError> {
    let json = serde_json::to_string_pretty(segments).map_err(TemplateError::io)?;
    println!("{json}");
    Ok(())
}

/// One-line summary for a template that parsed cleanly.
pub fn check_summary<E: Evaluable>(template: &Template<E>) -> String {
    let (literals, expressions) = match template {
        Template::Literal(_) => (1, 0),
        Template::Expression(_) => (0, 1),
        Template::Composite(composite) => {
            let expressions = composite
                .parts()
                .iter()
                .filter(|part| matches!(part, Part::Expression(_)))
                .count();
            (composite.parts().len() - expressions, expressions)
        }
    };
    format!("ok: {literals} literal(s), {expressions} expression(s)")
}
