//! Core types for rule violations and evaluation reports.

use crate::names::simple_name_of;
use crate::raw::AccessKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Parses `error`, `warning` (or `warn`) and `info`, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in the compiled code something happens.
///
/// Class files only carry a source file name and line numbers, so a
/// location is the owning class plus whatever of those is known.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Fully qualified name of the class the location is in.
    pub class: String,
    /// Line number, when the class carries line information.
    pub line: Option<u32>,
    /// Source file name recorded in the class file.
    pub source_file: Option<String>,
}

impl Location {
    /// A location within `class` with no line information.
    #[must_use]
    pub fn of_class(class: impl Into<String>, source_file: Option<String>) -> Self {
        Self {
            class: class.into(),
            line: None,
            source_file,
        }
    }

    /// Sets the line number.
    #[must_use]
    pub fn at_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Source file name, falling back to `<Outer>.java` for the class.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.source_file.clone().unwrap_or_else(|| {
            let simple = self.class.rsplit('.').next().unwrap_or(&self.class);
            let outer = simple.split('$').next().unwrap_or(simple);
            format!("{outer}.java")
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.file_name(), self.line.unwrap_or(0))
    }
}

/// One concrete dependency evidencing a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Full name of the originating element.
    pub origin: String,
    /// Full name of the target element.
    pub target: String,
    /// Access kind, absent for inheritance relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AccessKind>,
    /// Where the dependency occurs.
    pub location: Location,
    /// Human-readable description of the dependency.
    pub description: String,
}

/// A rule violation found during evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule name (e.g., "report-not-importer").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Dependencies evidencing the breach.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
    /// Reference to design document (e.g., "ARCHITECTURE.md L85").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            evidence: Vec::new(),
            doc_ref: None,
        }
    }

    /// Adds a design document reference to this violation.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Adds a piece of evidence.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {} {}\n",
            self.rule,
            simple_name_of(&self.location.class),
            self.location
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        for evidence in &self.evidence {
            let _ = writeln!(output, "  - {}", evidence.description);
        }
        if let Some(doc_ref) = &self.doc_ref {
            let _ = writeln!(output, "  = see: {doc_ref}");
        }
        output
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location.class, self.severity, self.rule, self.message
        )?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

/// The result of evaluating one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule name.
    pub rule: String,
    /// Rule description ("classes that ... should ...").
    pub description: String,
    /// Violations, ordered by location then message.
    pub violations: Vec<Violation>,
    /// Number of elements the rule's scope selected.
    pub scope_size: usize,
}

impl RuleOutcome {
    /// Creates an outcome, ordering the violations deterministically.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        description: impl Into<String>,
        mut violations: Vec<Violation>,
        scope_size: usize,
    ) -> Self {
        violations.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.message.cmp(&b.message))
        });
        Self {
            rule: rule.into(),
            description: description.into(),
            violations,
            scope_size,
        }
    }

    /// True when the scope selected nothing. Such a rule passes vacuously.
    #[must_use]
    pub fn is_empty_scope(&self) -> bool {
        self.scope_size == 0
    }

    /// True when no violation was found.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result of evaluating a set of rules against one graph.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Outcomes in rule registration order.
    pub outcomes: Vec<RuleOutcome>,
    /// Number of classes imported from artifacts.
    pub classes_imported: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates all violations across rules.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.outcomes.iter().flat_map(|o| o.violations.iter())
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations().any(|v| v.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.violations().any(|v| v.severity >= Severity::Warning)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Rules whose scope matched nothing.
    #[must_use]
    pub fn empty_scope_rules(&self) -> Vec<&RuleOutcome> {
        self.outcomes.iter().filter(|o| o.is_empty_scope()).collect()
    }

    /// Whether this report fails a run with the given policy.
    #[must_use]
    pub fn fails(&self, fail_on: Severity, fail_on_empty_scope: bool) -> bool {
        self.has_violations_at(fail_on)
            || (fail_on_empty_scope && !self.empty_scope_rules().is_empty())
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()`
    /// messages in test integration.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self.violations().filter(|v| v.severity >= fail_on).collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== archgraph: {} violation(s) ===\n",
            failing.len()
        );

        for outcome in &self.outcomes {
            let rule_failing: Vec<&Violation> = outcome
                .violations
                .iter()
                .filter(|v| v.severity >= fail_on)
                .collect();
            if rule_failing.is_empty() {
                continue;
            }
            let _ = writeln!(
                report,
                "Rule '{}' was violated ({} times):",
                outcome.description,
                rule_failing.len()
            );
            for v in rule_failing {
                let _ = writeln!(report, "  {}: {}", v.severity, v.message);
                if let Some(doc_ref) = &v.doc_ref {
                    let _ = writeln!(report, "  = see: {doc_ref}");
                }
            }
            let _ = writeln!(report);
        }

        for outcome in self.empty_scope_rules() {
            let _ = writeln!(
                report,
                "warning: rule '{}' matched no elements",
                outcome.description
            );
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} class(es)",
            errors, warnings, infos, self.classes_imported
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity, line: u32) -> Violation {
        Violation::new(
            "report-not-importer",
            severity,
            Location::of_class("report.ReportService", Some("ReportService.java".into()))
                .at_line(Some(line)),
            "Method <report.ReportService.report()> calls method <importer.ImportService.run()>",
        )
    }

    #[test]
    fn location_display_uses_source_file_and_line() {
        let loc = Location::of_class("a.B", Some("B.java".into())).at_line(Some(10));
        assert_eq!(loc.to_string(), "(B.java:10)");
    }

    #[test]
    fn location_display_falls_back_to_outer_class_file() {
        let loc = Location::of_class("a.Outer$Inner", None);
        assert_eq!(loc.to_string(), "(Outer.java:0)");
    }

    #[test]
    fn severity_parses_aliases() {
        assert_eq!(Severity::parse("WARN"), Some(Severity::Warning));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn violation_display_includes_doc_ref() {
        let v = make_violation(Severity::Error, 1).with_doc_ref("DDD.md L33");
        assert!(format!("{v}").contains("(see: DDD.md L33)"));
        assert!(v.format().contains("= see: DDD.md L33"));
    }

    #[test]
    fn outcome_orders_violations_by_location() {
        let outcome = RuleOutcome::new(
            "r",
            "d",
            vec![make_violation(Severity::Error, 20), make_violation(Severity::Error, 5)],
            1,
        );
        let lines: Vec<_> = outcome.violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![Some(5), Some(20)]);
    }

    #[test]
    fn empty_scope_is_distinct_from_pass() {
        let empty = RuleOutcome::new("a", "a", vec![], 0);
        let pass = RuleOutcome::new("b", "b", vec![], 3);
        assert!(empty.passed() && empty.is_empty_scope());
        assert!(pass.passed() && !pass.is_empty_scope());

        let report = Report {
            outcomes: vec![empty, pass],
            classes_imported: 3,
        };
        assert_eq!(report.empty_scope_rules().len(), 1);
        assert!(!report.fails(Severity::Error, false));
        assert!(report.fails(Severity::Error, true));
    }

    #[test]
    fn format_test_report_filters_by_severity() {
        let report = Report {
            outcomes: vec![RuleOutcome::new(
                "r",
                "classes that reside in '..report..' should not depend on classes that reside in '..importer..'",
                vec![make_violation(Severity::Warning, 1), make_violation(Severity::Error, 2)],
                1,
            )],
            classes_imported: 2,
        };
        let text = report.format_test_report(Severity::Error);
        assert!(text.contains("1 violation(s)"));
        assert!(text.contains("1 error(s), 1 warning(s)"));
        assert!(text.contains("in 2 class(es)"));
    }
}
