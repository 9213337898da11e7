//! Plain-text view of one execution's statistics.

use std::fmt::Write;
use std::time::Duration;

use crate::execution::ExecutionSnapshot;

/// Shows the execution most recently handed to it.
#[derive(Clone, Debug, Default)]
pub struct ExecutionStatsView {
    current: Option<ExecutionSnapshot>,
}

impl ExecutionStatsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_execution(&mut self, snapshot: ExecutionSnapshot) {
        self.current = Some(snapshot);
    }

    pub fn current(&self) -> Option<&ExecutionSnapshot> {
        self.current.as_ref()
    }

    pub fn render(&self) -> String {
        let Some(snapshot) = &self.current else {
            return "No execution selected.\n".to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "Execution {}", snapshot.id);
        let _ = writeln!(out, "  status:     {}", snapshot.status);
        let _ = writeln!(out, "  bindings:   {}", snapshot.binding_names.join(", "));
        let _ = writeln!(out, "  build time: {}", format_duration(snapshot.build_duration));
        let _ = writeln!(out, "  run time:   {}", format_duration(snapshot.run_duration));
        let _ = writeln!(out, "  messages:   {}", snapshot.message_count);

        section(&mut out, "Source", Some(&snapshot.source));
        section(&mut out, "Result", snapshot.result.as_deref());
        section(&mut out, "Build error", snapshot.build_error.as_deref());
        section(&mut out, "Run error", snapshot.run_error.as_deref());
        out
    }
}

fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => format!("{:.3} ms", duration.as_secs_f64() * 1000.0),
        None => "n/a".to_string(),
    }
}

/// A titled, indented block; omitted when there is nothing to show.
fn section(out: &mut String, title: &str, body: Option<&str>) {
    let Some(body) = body else {
        return;
    };
    let _ = writeln!(out, "\n{title}:");
    for line in body.lines() {
        let _ = writeln!(out, "  {line}");
    }
}
