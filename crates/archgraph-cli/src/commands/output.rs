//! Shared output formatting for evaluation reports.

use anyhow::Result;
use archgraph_core::{Report, Severity, Violation};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    let (errors, warnings, infos) = report.count_by_severity();

    for outcome in &report.outcomes {
        if outcome.violations.is_empty() {
            continue;
        }
        println!("Rule '{}': {}", outcome.rule, outcome.description);
        for violation in &outcome.violations {
            print_violation(violation);
        }
    }

    for outcome in report.empty_scope_rules() {
        println!(
            "\x1b[33mwarning\x1b[0m: rule '{}' matched no elements: {}",
            outcome.rule, outcome.description
        );
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} class(es)\x1b[0m",
        summary_color, errors, warnings, infos, report.classes_imported
    );
}

fn print_violation(violation: &Violation) {
    let severity_indicator = match violation.severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    };

    println!("  {} {}", violation.location.class, violation.location);
    println!("  {}: {}", severity_indicator, violation.message);
    if violation.evidence.len() > 1 {
        for evidence in &violation.evidence {
            println!("    - {}", evidence.description);
        }
    }
    if let Some(doc_ref) = &violation.doc_ref {
        println!("  = see: {doc_ref}");
    }
    println!();
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for violation in report.violations() {
        println!(
            "{}:{}: {} [{}] {}",
            violation.location.file_name(),
            violation.location.line.unwrap_or(0),
            violation.severity,
            violation.rule,
            violation.message,
        );
    }
}
