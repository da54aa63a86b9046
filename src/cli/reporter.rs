// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::runner::ExportOutcome;
use crate::document::{ApplyReport, RoundTrip};
use crate::props::HandlerRegistry;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    pub fn report_export(outcome: &ExportOutcome) {
        println!(
            "{} {} {} {} {}",
            "✅".green(),
            outcome.input.display().to_string().cyan(),
            "→".bright_black(),
            outcome.output.display().to_string().cyan(),
            format!(
                "({} objects, {} parameters, {})",
                outcome.objects,
                outcome.parameters,
                Self::format_duration(outcome.duration)
            )
            .bright_black()
        );
    }

    pub fn report_apply(object: &str, report: &ApplyReport) {
        println!(
            "{} {} {} applied",
            "✅".green(),
            object.cyan(),
            report.applied.len().to_string().green()
        );
        if !report.skipped.is_empty() {
            println!(
                "  {} {}",
                "skipped:".yellow(),
                report.skipped.join(", ").bright_black()
            );
        }
    }

    pub fn report_round_trip(file: &str, result: &RoundTrip) {
        if result.passed() {
            println!(
                "{} {}:{} {}",
                "✅".green(),
                file.cyan(),
                result.object.bold(),
                format!("{} parameters restored", result.exported).green()
            );
        } else {
            println!(
                "{} {}:{} {}",
                "❌".red(),
                file.cyan(),
                result.object.bold(),
                "round trip mismatch".red().bold()
            );
            for name in &result.mismatched {
                println!("  {} {}", "•".red(), name);
            }
        }
    }

    pub fn report_handlers(registry: &HandlerRegistry) {
        println!("{}", "Property handlers:".bold());
        for name in registry.names() {
            println!("  {}", name.cyan());
        }
        println!("{}", "Geometry handlers:".bold());
        for name in registry.geometries().names() {
            println!("  {}", name.cyan());
        }

        let ctx = registry.context();
        println!(
            "{} {}",
            "Kernel:".bright_black(),
            ctx.kernel().map(|k| k.name()).unwrap_or("detached")
        );
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
