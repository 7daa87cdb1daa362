//! Rules built from a scope predicate and a condition.
//!
//! A [`ConditionRule`] selects every element of one [`ElementKind`] that
//! its scope matches and checks the condition against each of them. Every
//! failing element yields exactly one violation, carrying the offending
//! dependencies as evidence.
//!
//! ```
//! use archgraph_core::{ArchRule, Condition, ConditionRule};
//! use archgraph_core::predicate::{reside_in, ElementKind};
//!
//! let rule = ConditionRule::new(
//!     "report-not-importer",
//!     ElementKind::Class,
//!     reside_in("..report..")?,
//!     Condition::not_depend_on(reside_in("..importer..")?),
//! )?;
//! assert_eq!(
//!     rule.description(),
//!     "classes that reside in '..report..' should not depend on classes that reside in '..importer..'"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::graph::{AccessEdge, ClassGraph, ClassId, ClassNode, MemberNode};
use crate::predicate::{Connective, Element, ElementKind, KindSet, Matcher, Predicate};
use crate::rule::ArchRule;
use crate::types::{Evidence, Location, RuleOutcome, Severity, Violation};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors raised while constructing a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A predicate cannot judge the elements it would be given.
    #[error("rule '{rule}': {role} '{predicate}' cannot be applied to {kind} elements (it applies to {supported})")]
    KindMismatch {
        /// Rule name.
        rule: String,
        /// Which part of the rule: "scope" or "condition".
        role: &'static str,
        /// Description of the offending predicate.
        predicate: String,
        /// Kind it would be applied to.
        kind: ElementKind,
        /// Kinds it supports.
        supported: KindSet,
    },
    /// A condition that needs dependencies was used on accesses.
    #[error("rule '{rule}': condition '{condition}' cannot be checked for {kind} elements")]
    UnsupportedCondition {
        /// Rule name.
        rule: String,
        /// Condition description.
        condition: String,
        /// Element kind of the rule.
        kind: ElementKind,
    },
    /// The rule has no name.
    #[error("rule name must not be empty")]
    EmptyName,
}

// ────────────────────────────────────────────
// Conditions
// ────────────────────────────────────────────

/// What must hold for every element in scope.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The element satisfies the predicate.
    Satisfy(Predicate),
    /// The element does not satisfy the predicate.
    NotSatisfy(Predicate),
    /// No access performed by the element satisfies the access predicate.
    NotAccess(Predicate),
    /// Every access to another class satisfies the access predicate.
    OnlyAccess(Predicate),
    /// No class the element depends on (by access or inheritance) satisfies
    /// the class predicate. Dependencies on the element's own class are
    /// ignored.
    NotDependOn(Predicate),
    /// No class accessing the element satisfies the class predicate.
    NotBeAccessedBy(Predicate),
}

impl Condition {
    /// See [`Condition::Satisfy`].
    #[must_use]
    pub fn satisfy(predicate: Predicate) -> Self {
        Self::Satisfy(predicate)
    }

    /// See [`Condition::NotSatisfy`].
    #[must_use]
    pub fn not_satisfy(predicate: Predicate) -> Self {
        Self::NotSatisfy(predicate)
    }

    /// See [`Condition::NotAccess`].
    #[must_use]
    pub fn not_access(predicate: Predicate) -> Self {
        Self::NotAccess(predicate)
    }

    /// See [`Condition::OnlyAccess`].
    #[must_use]
    pub fn only_access(predicate: Predicate) -> Self {
        Self::OnlyAccess(predicate)
    }

    /// See [`Condition::NotDependOn`].
    #[must_use]
    pub fn not_depend_on(predicate: Predicate) -> Self {
        Self::NotDependOn(predicate)
    }

    /// See [`Condition::NotBeAccessedBy`].
    #[must_use]
    pub fn not_be_accessed_by(predicate: Predicate) -> Self {
        Self::NotBeAccessedBy(predicate)
    }

    /// The wrapped predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        match self {
            Self::Satisfy(p)
            | Self::NotSatisfy(p)
            | Self::NotAccess(p)
            | Self::OnlyAccess(p)
            | Self::NotDependOn(p)
            | Self::NotBeAccessedBy(p) => p,
        }
    }

    /// Text following "should" in a rule description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Satisfy(p) => p.description().to_string(),
            Self::NotSatisfy(p) => format!("not {}", p.operand_description(Connective::Not)),
            Self::NotAccess(p) => format!("not access targets where {p}"),
            Self::OnlyAccess(p) => format!("only access targets where {p}"),
            Self::NotDependOn(p) => format!("not depend on classes that {p}"),
            Self::NotBeAccessedBy(p) => format!("not be accessed by classes that {p}"),
        }
    }

    /// Kind the wrapped predicate is applied to, and the rule kinds the
    /// condition supports.
    fn shape(&self, rule_kind: ElementKind) -> (ElementKind, KindSet) {
        let dependencies = KindSet::CLASS.union(KindSet::MEMBER);
        match self {
            Self::Satisfy(_) | Self::NotSatisfy(_) => (rule_kind, KindSet::ALL),
            Self::NotAccess(_) | Self::OnlyAccess(_) => (ElementKind::Access, dependencies),
            Self::NotDependOn(_) => (ElementKind::Class, dependencies),
            Self::NotBeAccessedBy(_) => (ElementKind::Class, KindSet::CLASS),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

// ────────────────────────────────────────────
// Rule
// ────────────────────────────────────────────

/// A scope predicate plus a condition.
#[derive(Debug, Clone)]
pub struct ConditionRule {
    name: String,
    kind: ElementKind,
    scope: Predicate,
    condition: Condition,
    description: String,
    severity: Severity,
    doc_ref: Option<String>,
}

impl ConditionRule {
    /// Creates a rule over elements of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::KindMismatch`] if the scope or the condition's
    /// predicate cannot judge the elements they would receive,
    /// [`RuleError::UnsupportedCondition`] if the condition makes no sense
    /// for `kind`, and [`RuleError::EmptyName`] for an empty name.
    pub fn new(
        name: impl Into<String>,
        kind: ElementKind,
        scope: Predicate,
        condition: Condition,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RuleError::EmptyName);
        }
        if !scope.applies_to(kind) {
            return Err(RuleError::KindMismatch {
                rule: name,
                role: "scope",
                predicate: scope.description().to_string(),
                kind,
                supported: scope.kinds(),
            });
        }
        let (target_kind, rule_kinds) = condition.shape(kind);
        if !rule_kinds.contains(kind) {
            return Err(RuleError::UnsupportedCondition {
                rule: name,
                condition: condition.description(),
                kind,
            });
        }
        let predicate = condition.predicate();
        if !predicate.applies_to(target_kind) {
            return Err(RuleError::KindMismatch {
                rule: name,
                role: "condition",
                predicate: predicate.description().to_string(),
                kind: target_kind,
                supported: predicate.kinds(),
            });
        }

        let description = if matches!(scope.matcher(), Matcher::Always) {
            format!("{} should {}", kind.plural(), condition)
        } else {
            format!("{} that {} should {}", kind.plural(), scope, condition)
        };
        Ok(Self {
            name,
            kind,
            scope,
            condition,
            description,
            severity: Severity::Error,
            doc_ref: None,
        })
    }

    /// Replaces the generated description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a rationale: `<description>, because <reason>`.
    #[must_use]
    pub fn because(mut self, reason: &str) -> Self {
        self.description = format!("{}, because {reason}", self.description);
        self
    }

    /// Sets the severity of emitted violations.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a design document reference to emitted violations.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Element kind the rule ranges over.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Scope predicate.
    #[must_use]
    pub fn scope(&self) -> &Predicate {
        &self.scope
    }

    /// Condition.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn violation(&self, location: Location, message: String, evidence: Vec<Evidence>) -> Violation {
        let mut violation = Violation::new(&self.name, self.severity, location, message);
        violation.evidence = evidence;
        if let Some(doc_ref) = &self.doc_ref {
            violation = violation.with_doc_ref(doc_ref);
        }
        violation
    }

    fn check_class(&self, graph: &ClassGraph, class: &ClassNode) -> Option<Violation> {
        let label = format!("Class <{}>", class.name());
        let location = graph.class_location(class.id());
        let edges: Vec<&AccessEdge> = graph.outgoing(class.id()).collect();
        let evidence = match &self.condition {
            Condition::Satisfy(_) | Condition::NotSatisfy(_) => {
                return self.check_self(Element::Class(class), graph, &label, location);
            }
            Condition::NotDependOn(p) => {
                let mut found = inheritance_evidence(graph, class, p);
                found.extend(edge_evidence(graph, &edges, |e| {
                    !e.is_self_access() && target_matches(graph, e, p)
                }));
                found
            }
            Condition::NotBeAccessedBy(p) => {
                let incoming: Vec<&AccessEdge> = graph.incoming(class.id()).collect();
                edge_evidence(graph, &incoming, |e| {
                    !e.is_self_access()
                        && p.test(graph, Element::Class(graph.class(e.origin_class())))
                })
            }
            condition => self.access_evidence(graph, &edges, condition),
        };
        self.summarize(&label, location, evidence)
    }

    fn check_member(&self, graph: &ClassGraph, member: &MemberNode) -> Option<Violation> {
        let label = member.describe();
        let location = graph.member_location(member.id());
        let edges: Vec<&AccessEdge> = member.access_ids().iter().map(|id| graph.edge(*id)).collect();
        let evidence = match &self.condition {
            Condition::Satisfy(_) | Condition::NotSatisfy(_) => {
                return self.check_self(Element::Member(member), graph, &label, location);
            }
            Condition::NotDependOn(p) => edge_evidence(graph, &edges, |e| {
                !e.is_self_access() && target_matches(graph, e, p)
            }),
            condition => self.access_evidence(graph, &edges, condition),
        };
        self.summarize(&label, location, evidence)
    }

    fn check_access(&self, graph: &ClassGraph, edge: &AccessEdge) -> Option<Violation> {
        let label = graph.describe_edge(edge);
        self.check_self(Element::Access(edge), graph, &label, graph.edge_location(edge))
    }

    fn check_self(
        &self,
        element: Element<'_>,
        graph: &ClassGraph,
        label: &str,
        location: Location,
    ) -> Option<Violation> {
        let (matches, expected) = match &self.condition {
            Condition::Satisfy(p) => (p.test(graph, element), true),
            Condition::NotSatisfy(p) => (p.test(graph, element), false),
            _ => return None,
        };
        if matches == expected {
            return None;
        }
        let predicate = self.condition.predicate();
        let message = if expected {
            format!("{label} does not match '{predicate}'")
        } else {
            format!("{label} matches '{predicate}'")
        };
        Some(self.violation(location, message, Vec::new()))
    }

    fn access_evidence(
        &self,
        graph: &ClassGraph,
        edges: &[&AccessEdge],
        condition: &Condition,
    ) -> Vec<Evidence> {
        match condition {
            Condition::NotAccess(p) => edge_evidence(graph, edges, |e| p.test(graph, Element::Access(e))),
            Condition::OnlyAccess(p) => edge_evidence(graph, edges, |e| {
                !e.is_self_access() && !p.test(graph, Element::Access(e))
            }),
            _ => Vec::new(),
        }
    }

    fn summarize(&self, label: &str, location: Location, mut evidence: Vec<Evidence>) -> Option<Violation> {
        evidence.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.target.cmp(&b.target)));
        let message = match evidence.as_slice() {
            [] => return None,
            [single] => single.description.clone(),
            many => format!("{label} has {} violating dependencies", many.len()),
        };
        Some(self.violation(location, message, evidence))
    }
}

fn target_matches(graph: &ClassGraph, edge: &AccessEdge, predicate: &Predicate) -> bool {
    predicate.test(graph, Element::Class(graph.class(edge.target_class())))
}

fn edge_evidence(
    graph: &ClassGraph,
    edges: &[&AccessEdge],
    violates: impl Fn(&AccessEdge) -> bool,
) -> Vec<Evidence> {
    edges
        .iter()
        .copied()
        .filter(|e| violates(*e))
        .map(|e| Evidence {
            origin: e.origin_name().to_string(),
            target: e.target_name().to_string(),
            kind: Some(e.kind()),
            location: graph.edge_location(e),
            description: graph.describe_edge(e),
        })
        .collect()
}

fn inheritance_evidence(graph: &ClassGraph, class: &ClassNode, predicate: &Predicate) -> Vec<Evidence> {
    let location = graph.class_location(class.id());
    let supers = class.superclass_name().map(|s| (s, "extends class"));
    let interfaces = class
        .interface_names()
        .iter()
        .map(|i| (i.as_str(), "implements interface"));
    supers
        .into_iter()
        .chain(interfaces)
        .filter_map(|(name, verb)| {
            let target: ClassId = graph.resolve(name)?;
            if target == class.id() || !predicate.test(graph, Element::Class(graph.class(target))) {
                return None;
            }
            Some(Evidence {
                origin: class.name().to_string(),
                target: name.to_string(),
                kind: None,
                location: location.clone(),
                description: format!("Class <{}> {verb} <{name}> in {location}", class.name()),
            })
        })
        .collect()
}

impl ArchRule for ConditionRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, graph: &ClassGraph) -> RuleOutcome {
        let mut scope_size = 0;
        let mut violations = Vec::new();
        match self.kind {
            ElementKind::Class => {
                for class in graph.full_classes() {
                    if self.scope.test(graph, Element::Class(class)) {
                        scope_size += 1;
                        violations.extend(self.check_class(graph, class));
                    }
                }
            }
            ElementKind::Member => {
                for member in graph.members() {
                    if self.scope.test(graph, Element::Member(member)) {
                        scope_size += 1;
                        violations.extend(self.check_member(graph, member));
                    }
                }
            }
            ElementKind::Access => {
                for edge in graph.edges() {
                    if self.scope.test(graph, Element::Access(edge)) {
                        scope_size += 1;
                        violations.extend(self.check_access(graph, edge));
                    }
                }
            }
        }
        debug!(
            rule = %self.name,
            scope_size,
            violations = violations.len(),
            "Evaluated rule"
        );
        RuleOutcome::new(&self.name, &self.description, violations, scope_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::predicate::{
        access_kind, anything, has_modifier, named, owner, reside_in, simple_name_ending_with,
        target_type_resides_in,
    };
    use crate::raw::{AccessKind, Modifier, RawAccess, RawClassDescriptor, RawMemberRef, RawMethod, RawOrigin};

    fn call(owner: &str, name: &str) -> RawAccess {
        RawAccess::to_member(
            RawOrigin::Method(0),
            AccessKind::MethodCall,
            owner,
            RawMemberRef::Method {
                name: name.into(),
                parameter_types: vec![],
                return_type: "void".into(),
            },
        )
        .at_line(12)
    }

    fn graph(with_call: bool) -> ClassGraph {
        let mut service = RawClassDescriptor::new("report.ReportService")
            .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
            .with_access(call("report.Formatter", "format"));
        if with_call {
            service = service.with_access(call("importer.ImportService", "load"));
        }
        let formatter = RawClassDescriptor::new("report.Formatter")
            .with_method(RawMethod::new("format", Vec::<String>::new(), "void"));
        let importer = RawClassDescriptor::new("importer.ImportService")
            .with_method(RawMethod::new("load", Vec::<String>::new(), "void"));
        GraphBuilder::new()
            .add_all([service, formatter, importer])
            .build()
            .unwrap()
    }

    fn layering() -> ConditionRule {
        ConditionRule::new(
            "report-not-importer",
            ElementKind::Class,
            reside_in("..report..").unwrap(),
            Condition::not_depend_on(reside_in("..importer..").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn forbidden_dependency_yields_one_violation() {
        let outcome = layering().evaluate(&graph(true));
        assert_eq!(outcome.scope_size, 2);
        assert_eq!(outcome.violations.len(), 1);
        let violation = &outcome.violations[0];
        assert_eq!(violation.location.class, "report.ReportService");
        assert_eq!(violation.evidence.len(), 1);
        assert_eq!(violation.evidence[0].target, "importer.ImportService.load()");
        assert_eq!(
            violation.message,
            "Method <report.ReportService.run()> calls method <importer.ImportService.load()> in (ReportService.java:12)"
        );
    }

    #[test]
    fn member_evidence_is_ordered_by_line() {
        let late = RawAccess::to_member(
            RawOrigin::Method(0),
            AccessKind::MethodCall,
            "importer.Loader",
            RawMemberRef::Method {
                name: "load".into(),
                parameter_types: vec![],
                return_type: "void".into(),
            },
        )
        .at_line(30);
        let service = RawClassDescriptor::new("report.ReportService")
            .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
            .with_access(late)
            .with_access(call("importer.ImportService", "load"));
        let graph = GraphBuilder::new()
            .add_all([
                service,
                RawClassDescriptor::new("importer.Loader")
                    .with_method(RawMethod::new("load", Vec::<String>::new(), "void")),
                RawClassDescriptor::new("importer.ImportService")
                    .with_method(RawMethod::new("load", Vec::<String>::new(), "void")),
            ])
            .build()
            .unwrap();
        let rule = ConditionRule::new(
            "report-members-not-importer",
            ElementKind::Member,
            reside_in("..report..").unwrap(),
            Condition::not_depend_on(reside_in("..importer..").unwrap()),
        )
        .unwrap();

        let outcome = rule.evaluate(&graph);
        assert_eq!(outcome.violations.len(), 1);
        let violation = &outcome.violations[0];
        let lines: Vec<Option<u32>> = violation.evidence.iter().map(|e| e.location.line).collect();
        assert_eq!(lines, vec![Some(12), Some(30)]);
        assert_eq!(
            violation.message,
            "Method <report.ReportService.run()> has 2 violating dependencies"
        );
    }

    #[test]
    fn removing_the_edge_passes() {
        let outcome = layering().evaluate(&graph(false));
        assert!(outcome.passed());
        assert!(!outcome.is_empty_scope());
    }

    #[test]
    fn empty_scope_is_flagged() {
        let rule = ConditionRule::new(
            "nothing",
            ElementKind::Class,
            reside_in("..nowhere..").unwrap(),
            Condition::not_depend_on(anything()),
        )
        .unwrap();
        let outcome = rule.evaluate(&graph(true));
        assert!(outcome.passed());
        assert!(outcome.is_empty_scope());
    }

    #[test]
    fn kind_mismatch_fails_at_construction() {
        let err = ConditionRule::new(
            "bad",
            ElementKind::Class,
            access_kind(AccessKind::FieldGet),
            Condition::satisfy(anything()),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::KindMismatch { role: "scope", .. }));

        let err = ConditionRule::new(
            "bad",
            ElementKind::Class,
            anything(),
            Condition::not_access(reside_in("a").unwrap()),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::KindMismatch { role: "condition", .. }));

        let err = ConditionRule::new(
            "bad",
            ElementKind::Access,
            anything(),
            Condition::not_depend_on(anything()),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedCondition { .. }));

        assert_eq!(
            ConditionRule::new(" ", ElementKind::Class, anything(), Condition::satisfy(anything()))
                .unwrap_err(),
            RuleError::EmptyName
        );
    }

    #[test]
    fn should_and_should_not() {
        let g = graph(true);
        let should = ConditionRule::new(
            "services",
            ElementKind::Class,
            reside_in("..importer..").unwrap(),
            Condition::satisfy(simple_name_ending_with("Service")),
        )
        .unwrap();
        assert!(should.evaluate(&g).passed());

        let should_not = ConditionRule::new(
            "services",
            ElementKind::Class,
            reside_in("..importer..").unwrap(),
            Condition::not_satisfy(simple_name_ending_with("Service")),
        )
        .unwrap();
        let outcome = should_not.evaluate(&g);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.violations[0].message,
            "Class <importer.ImportService> matches 'have simple name ending with 'Service''"
        );
        assert_eq!(
            should_not.description(),
            "classes that reside in '..importer..' should not have simple name ending with 'Service'"
        );
    }

    #[test]
    fn access_conditions() {
        let g = graph(true);
        let not_access = ConditionRule::new(
            "no-importer-calls",
            ElementKind::Class,
            anything(),
            Condition::not_access(target_type_resides_in("..importer..").unwrap()),
        )
        .unwrap();
        assert_eq!(not_access.evaluate(&g).violations.len(), 1);

        let only_access = ConditionRule::new(
            "report-only",
            ElementKind::Class,
            reside_in("report").unwrap(),
            Condition::only_access(target_type_resides_in("report").unwrap()),
        )
        .unwrap();
        let outcome = only_access.evaluate(&g);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].location.class, "report.ReportService");
    }

    #[test]
    fn not_be_accessed_by() {
        let g = graph(true);
        let rule = ConditionRule::new(
            "importer-private",
            ElementKind::Class,
            reside_in("importer").unwrap(),
            Condition::not_be_accessed_by(reside_in("report").unwrap()),
        )
        .unwrap()
        .because("the importer is internal")
        .with_severity(Severity::Warning)
        .with_doc_ref("ARCHITECTURE.md");
        let outcome = rule.evaluate(&g);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].severity, Severity::Warning);
        assert_eq!(outcome.violations[0].doc_ref.as_deref(), Some("ARCHITECTURE.md"));
        assert!(rule.description().ends_with(", because the importer is internal"));
    }

    #[test]
    fn member_and_access_scopes() {
        let g = graph(true);
        let members = ConditionRule::new(
            "public-methods",
            ElementKind::Member,
            owner(named("report.Formatter")),
            Condition::satisfy(has_modifier(Modifier::Public)),
        )
        .unwrap();
        let outcome = members.evaluate(&g);
        assert_eq!(outcome.scope_size, 1);
        assert_eq!(outcome.violations.len(), 1);

        let accesses = ConditionRule::new(
            "no-calls-into-importer",
            ElementKind::Access,
            access_kind(AccessKind::MethodCall),
            Condition::not_satisfy(target_type_resides_in("importer").unwrap()),
        )
        .unwrap();
        let outcome = accesses.evaluate(&g);
        assert_eq!(outcome.scope_size, 2);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].location.line, Some(12));
    }

    #[test]
    fn inheritance_counts_as_dependency() {
        let g = GraphBuilder::new()
            .add(RawClassDescriptor::new("report.Base").with_super("importer.Thing"))
            .add(RawClassDescriptor::new("importer.Thing"))
            .build()
            .unwrap();
        let outcome = layering().evaluate(&g);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].evidence[0].kind, None);
        assert_eq!(
            outcome.violations[0].message,
            "Class <report.Base> extends class <importer.Thing> in (Base.java:0)"
        );
    }
}
