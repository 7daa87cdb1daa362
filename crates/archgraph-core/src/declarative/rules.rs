//! Declarative rule construction.
//!
//! Converts domain model rules into [`ConditionRule`] and [`CycleRule`]
//! values behind the [`ArchRule`](crate::rule::ArchRule) trait.

use crate::condition::{Condition, ConditionRule, RuleError};
use crate::declarative::model::{
    DeclarativeConfig, FreeOfCycles, NameRule, Naming, RestrictAccess, ScopeDep, ScopeName,
    ScopeRef, SliceSpec,
};
use crate::pattern::PackagePattern;
use crate::predicate::{
    access_kind, name_matching, or, owner, reside_in_any, simple_name_ending_with,
    simple_name_starting_with, ElementKind, Predicate, PredicateError,
};
use crate::slices::{CycleRule, SliceError, Slicing};

/// Errors turning a validated model into rules.
#[derive(Debug, thiserror::Error)]
pub enum CreateRuleError {
    /// A rule could not be assembled.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A predicate could not be compiled.
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    /// A slicing could not be built.
    #[error(transparent)]
    Slice(#[from] SliceError),

    /// A scope reference was not resolved by the model.
    #[error("unknown scope `{0}`")]
    UnknownScope(ScopeName),
}

fn sources(patterns: &[PackagePattern]) -> Vec<&str> {
    patterns.iter().map(PackagePattern::as_str).collect()
}

fn listed(patterns: &[PackagePattern]) -> String {
    let quoted: Vec<String> = patterns.iter().map(|p| format!("'{p}'")).collect();
    quoted.join(", ")
}

/// Classes selected by a scope reference.
fn scope_predicate(config: &DeclarativeConfig, scope_ref: &ScopeRef) -> Result<Predicate, CreateRuleError> {
    match scope_ref {
        ScopeRef::Named(name) => {
            let scope = config
                .scope(name)
                .ok_or_else(|| CreateRuleError::UnknownScope(name.clone()))?;
            Ok(reside_in_any(&sources(scope.packages()))?
                .as_description(format!("are in scope '{name}'")))
        }
        ScopeRef::Inline(patterns) => Ok(reside_in_any(&sources(patterns))?),
    }
}

fn named_scope_predicate(config: &DeclarativeConfig, name: &ScopeName) -> Result<Predicate, CreateRuleError> {
    scope_predicate(config, &ScopeRef::Named(name.clone()))
}

// ────────────────────────────────────────────
// restrict-access
// ────────────────────────────────────────────

/// Builds the rule for one `[[restrict-access]]` entry.
///
/// # Errors
///
/// Returns an error if the scope is unknown or a predicate fails to compile.
pub fn restrict_access_rule(
    config: &DeclarativeConfig,
    rule: &RestrictAccess,
) -> Result<ConditionRule, CreateRuleError> {
    let scope = scope_predicate(config, rule.scope())?;
    let mut denied = owner(reside_in_any(&sources(rule.deny()))?)
        .as_description(format!("target type resides in any package [{}]", listed(rule.deny())));
    if let Some(kinds) = rule.kinds().iter().map(|k| access_kind(*k)).reduce(or) {
        denied = denied.and(kinds);
    }

    let mut built = ConditionRule::new(rule.name(), ElementKind::Class, scope, Condition::not_access(denied))?
        .because(rule.message())
        .with_severity(rule.severity());
    if let Some(doc) = rule.doc_ref() {
        built = built.with_doc_ref(doc);
    }
    Ok(built)
}

// ────────────────────────────────────────────
// deny-scope-dep
// ────────────────────────────────────────────

/// Builds the rule for one `[[deny-scope-dep]]` entry.
///
/// # Errors
///
/// Returns an error if a scope is unknown.
pub fn scope_dep_rule(config: &DeclarativeConfig, dep: &ScopeDep) -> Result<ConditionRule, CreateRuleError> {
    let from = named_scope_predicate(config, dep.from_scope())?;
    let targets = dep
        .denied_targets()
        .iter()
        .map(|name| named_scope_predicate(config, name))
        .collect::<Result<Vec<_>, _>>()?;
    let denied = targets
        .into_iter()
        .reduce(or)
        .ok_or_else(|| CreateRuleError::UnknownScope(dep.from_scope().clone()))?;

    let mut built = ConditionRule::new(dep.name(), ElementKind::Class, from, Condition::not_depend_on(denied))?
        .because(dep.message())
        .with_severity(dep.severity());
    if let Some(doc) = dep.doc_ref() {
        built = built.with_doc_ref(doc);
    }
    Ok(built)
}

// ────────────────────────────────────────────
// naming
// ────────────────────────────────────────────

/// Builds the rule for one `[[naming]]` entry.
///
/// # Errors
///
/// Returns an error if the scope is unknown or the name pattern fails to
/// compile.
pub fn naming_rule(config: &DeclarativeConfig, naming: &Naming) -> Result<ConditionRule, CreateRuleError> {
    let scope = scope_predicate(config, naming.scope())?;
    let shape = match naming.rule() {
        NameRule::Suffix(suffix) => simple_name_ending_with(suffix),
        NameRule::Prefix(prefix) => simple_name_starting_with(prefix),
        NameRule::Pattern(pattern) => name_matching(pattern.as_str())?,
    };

    let mut built = ConditionRule::new(naming.name(), ElementKind::Class, scope, Condition::satisfy(shape))?
        .with_severity(naming.severity());
    if let Some(message) = naming.message() {
        built = built.because(message);
    }
    if let Some(doc) = naming.doc_ref() {
        built = built.with_doc_ref(doc);
    }
    Ok(built)
}

// ────────────────────────────────────────────
// free-of-cycles
// ────────────────────────────────────────────

/// Builds the rule for one `[[free-of-cycles]]` entry.
///
/// # Errors
///
/// Returns an error if the slice pattern has no capture group.
pub fn cycle_rule(rule: &FreeOfCycles) -> Result<CycleRule, CreateRuleError> {
    let slicing = match rule.slices() {
        SliceSpec::Package => Slicing::Package,
        SliceSpec::Pattern(pattern) => Slicing::matching(pattern.clone())?,
    };
    let mut built = CycleRule::new(rule.name(), slicing).with_severity(rule.severity());
    if let Some(message) = rule.message() {
        built = built.because(message);
    }
    if let Some(doc) = rule.doc_ref() {
        built = built.with_doc_ref(doc);
    }
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarative::config_dto::DeclarativeConfigDto;
    use crate::declarative::loader::load;
    use crate::graph::{ClassGraph, GraphBuilder};
    use crate::raw::{AccessKind, RawAccess, RawClassDescriptor, RawMemberRef, RawMethod, RawOrigin};
    use crate::rule::ArchRule;
    use crate::types::Severity;

    fn config(toml_str: &str) -> DeclarativeConfig {
        let dto: DeclarativeConfigDto = toml::from_str(toml_str).unwrap();
        load(dto).unwrap()
    }

    fn access(kind: AccessKind, owner: &str, member: RawMemberRef) -> RawAccess {
        RawAccess::to_member(RawOrigin::Method(0), kind, owner, member).at_line(7)
    }

    fn call(owner: &str, name: &str) -> RawAccess {
        access(
            AccessKind::MethodCall,
            owner,
            RawMemberRef::Method {
                name: name.into(),
                parameter_types: vec![],
                return_type: "void".into(),
            },
        )
    }

    fn class(name: &str, accesses: Vec<RawAccess>) -> RawClassDescriptor {
        let mut descriptor = RawClassDescriptor::new(name)
            .with_method(RawMethod::new("run", Vec::<String>::new(), "void"));
        for a in accesses {
            descriptor = descriptor.with_access(a);
        }
        descriptor
    }

    fn graph() -> ClassGraph {
        GraphBuilder::new()
            .add_all([
                class(
                    "com.acme.report.ReportService",
                    vec![
                        call("com.acme.importer.ImportService", "run"),
                        call("java.sql.Connection", "close"),
                    ],
                ),
                class("com.acme.report.Formatter", vec![]),
                class(
                    "com.acme.importer.ImportService",
                    vec![call("com.acme.report.Formatter", "run")],
                ),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn restrict_access_detects_denied_target() {
        let cfg = config(
            r#"
[[scopes]]
name = "report"
packages = ["..report.."]

[[restrict-access]]
name = "no-sql-in-report"
scope = "report"
deny = ["java.sql.."]
message = "Reports read through the importer."
doc = "ARCH.md"
"#,
        );
        let rule = restrict_access_rule(&cfg, &cfg.restrict_accesses()[0]).unwrap();
        assert_eq!(
            rule.description(),
            "classes that are in scope 'report' should not access targets where target type resides in any package ['java.sql..'], because Reports read through the importer."
        );
        let outcome = rule.evaluate(&graph());
        assert_eq!(outcome.scope_size, 2);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].location.class, "com.acme.report.ReportService");
        assert_eq!(outcome.violations[0].doc_ref.as_deref(), Some("ARCH.md"));
    }

    #[test]
    fn restrict_access_honours_kinds() {
        let cfg = config(
            r#"
[[restrict-access]]
name = "no-sql-field-writes"
packages = ["..report.."]
deny = ["java.sql.."]
kinds = ["field-set"]
message = "Only writes are restricted."
"#,
        );
        let rule = restrict_access_rule(&cfg, &cfg.restrict_accesses()[0]).unwrap();
        assert!(rule.evaluate(&graph()).passed());
    }

    #[test]
    fn scope_dep_detects_forbidden_dependency() {
        let cfg = config(
            r#"
[[scopes]]
name = "report"
packages = ["..report.."]

[[scopes]]
name = "importer"
packages = ["..importer.."]

[[deny-scope-dep]]
from = "report"
to = ["importer"]
message = "Report must not depend on importer."
severity = "warning"
"#,
        );
        let rule = scope_dep_rule(&cfg, &cfg.scope_deps()[0]).unwrap();
        assert_eq!(rule.name(), "report-not-depend-on-importer");
        let outcome = rule.evaluate(&graph());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].severity, Severity::Warning);
        assert_eq!(
            outcome.violations[0].evidence[0].target,
            "com.acme.importer.ImportService.run()"
        );
    }

    #[test]
    fn scope_dep_allows_reverse_direction() {
        let cfg = config(
            r#"
[[scopes]]
name = "report"
packages = ["..report.."]

[[scopes]]
name = "importer"
packages = ["..importer.."]

[[deny-scope-dep]]
name = "importer-independent"
from = "importer"
to = ["importer"]
message = "self"
"#,
        );
        let rule = scope_dep_rule(&cfg, &cfg.scope_deps()[0]).unwrap();
        assert!(rule.evaluate(&graph()).passed());
    }

    #[test]
    fn naming_reports_each_offender() {
        let cfg = config(
            r#"
[[naming]]
name = "report-services"
packages = ["..report.."]
suffix = "Service"
message = "Report classes are services."
"#,
        );
        let rule = naming_rule(&cfg, &cfg.namings()[0]).unwrap();
        let outcome = rule.evaluate(&graph());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.violations[0].message,
            "Class <com.acme.report.Formatter> does not match 'have simple name ending with 'Service''"
        );
        assert_eq!(outcome.violations[0].severity, Severity::Warning);
    }

    #[test]
    fn naming_pattern_over_full_name() {
        let cfg = config(
            r#"
[[naming]]
name = "acme-only"
packages = ["com.acme.."]
pattern = "com\\.acme\\..*"
"#,
        );
        let rule = naming_rule(&cfg, &cfg.namings()[0]).unwrap();
        let outcome = rule.evaluate(&graph());
        assert!(outcome.passed());
        assert_eq!(outcome.scope_size, 3);
    }

    #[test]
    fn cycle_rule_finds_module_cycle() {
        let cfg = config(
            r#"
[[free-of-cycles]]
name = "modules"
slices = "com.acme.(*).."
message = "Modules form a DAG."
"#,
        );
        let rule = cycle_rule(&cfg.cycle_rules()[0]).unwrap();
        assert_eq!(
            rule.description(),
            "slices matching 'com.acme.(*)..' should be free of cycles, because Modules form a DAG."
        );
        let outcome = rule.evaluate(&graph());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.violations[0].message,
            "Cycle detected: importer -> report -> importer"
        );
    }
}
