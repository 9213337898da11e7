//! Plain-text rendering of diagnostics.
//!
//! Reports are rendered without ANSI colors: they are stored as the detail of
//! an execution's failure message and may be shown by any host surface.

use ariadne::{Config, Label as ReportLabel, Report, ReportKind, Source};

use crate::Diagnostic;

/// Render every diagnostic against `source`, separated by blank lines.
///
/// Diagnostics without a primary span (binding errors, for example) fall back
/// to their `Display` form.
pub fn render_report(diagnostics: &[Diagnostic], source_name: &str, source: &str) -> String {
    let mut out = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&render_one(diagnostic, source_name, source));
    }
    out
}

fn render_one(diagnostic: &Diagnostic, source_name: &str, source: &str) -> String {
    let Some(primary) = diagnostic.primary_span() else {
        let mut text = diagnostic.to_string();
        text.push('\n');
        return text;
    };

    let clamp = |offset: u32| (offset as usize).min(source.len());
    let mut builder = Report::build(ReportKind::Error, source_name, clamp(primary.start))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_config(Config::default().with_color(false));

    for label in &diagnostic.labels {
        let range = clamp(label.span.start)..clamp(label.span.end);
        builder = builder.with_label(ReportLabel::new((source_name, range)).with_message(&label.message));
    }
    for note in &diagnostic.notes {
        builder = builder.with_note(note);
    }
    for suggestion in &diagnostic.suggestions {
        builder = builder.with_help(suggestion);
    }

    let mut buffer = Vec::new();
    match builder
        .finish()
        .write((source_name, Source::from(source.to_string())), &mut buffer)
    {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => format!("{diagnostic}\n"),
    }
}
