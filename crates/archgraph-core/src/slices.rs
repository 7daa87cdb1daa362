//! Slicing and cycle detection.
//!
//! A [`Slicing`] maps classes to slice keys. [`detect_cycles`] builds the
//! slice dependency graph, keeping one witnessing dependency per slice
//! pair, and reports every strongly connected component of two or more
//! slices as a [`Cycle`].
//!
//! All output is deterministic: slices are ordered by name, each cycle
//! walk starts at its smallest slice, and when several dependencies
//! connect the same pair of slices the witness is the one with the
//! smallest origin class, then target class, then origin and target names.

use crate::graph::{ClassGraph, ClassNode};
use crate::pattern::PackagePattern;
use crate::rule::ArchRule;
use crate::types::{Evidence, RuleOutcome, Severity, Violation};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Invalid slicing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    /// A slicing pattern without a capture group cannot name slices.
    #[error("slice pattern '{pattern}' needs a '(*)' or '(**)' capture group")]
    NoCaptureGroup {
        /// The pattern.
        pattern: String,
    },
}

type SliceFn = dyn Fn(&ClassNode) -> Option<String> + Send + Sync;

/// Assigns classes to slices. Classes mapped to `None` belong to no slice.
#[derive(Clone)]
pub enum Slicing {
    /// One slice per package.
    Package,
    /// Slices named by the capture groups of a package pattern; classes
    /// outside the pattern belong to no slice.
    Pattern(PackagePattern),
    /// Caller-defined.
    Custom(Arc<SliceFn>),
}

impl fmt::Debug for Slicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "Package"),
            Self::Pattern(p) => f.debug_tuple("Pattern").field(&p.as_str()).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Slicing {
    /// Slices by the capture groups of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoCaptureGroup`] if the pattern has no group.
    pub fn matching(pattern: PackagePattern) -> Result<Self, SliceError> {
        if pattern.group_count() == 0 {
            return Err(SliceError::NoCaptureGroup {
                pattern: pattern.as_str().to_string(),
            });
        }
        Ok(Self::Pattern(pattern))
    }

    /// Slices with a closure.
    #[must_use]
    pub fn by<F>(f: F) -> Self
    where
        F: Fn(&ClassNode) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// The slice of `class`, if any.
    #[must_use]
    pub fn key(&self, class: &ClassNode) -> Option<String> {
        match self {
            Self::Package => Some(class.package().to_string()),
            Self::Pattern(pattern) => pattern.capture_key(class.package()),
            Self::Custom(f) => f(class),
        }
    }
}

impl fmt::Display for Slicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "packages"),
            Self::Pattern(p) => write!(f, "slices matching '{p}'"),
            Self::Custom(_) => write!(f, "slices"),
        }
    }
}

/// One step of a cycle with its witnessing dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Source slice.
    pub from: String,
    /// Target slice.
    pub to: String,
    /// Witnessing dependency.
    pub witness: Evidence,
}

/// A dependency cycle between slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Slices of the strongly connected component, sorted.
    pub slices: Vec<String>,
    /// Closed walk through every slice, starting and ending at the
    /// smallest one.
    pub walk: Vec<String>,
    /// One hop per step of the walk.
    pub hops: Vec<Hop>,
}

impl Cycle {
    /// `a -> b -> c -> a`.
    #[must_use]
    pub fn path(&self) -> String {
        self.walk.join(" -> ")
    }
}

#[derive(Debug, Clone)]
struct Witness {
    origin_class: String,
    target_class: String,
    evidence: Evidence,
}

impl Witness {
    fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            self.origin_class.as_str(),
            self.target_class.as_str(),
            self.evidence.origin.as_str(),
            self.evidence.target.as_str(),
        )
    }
}

/// The slice dependency graph of a class graph.
#[derive(Debug)]
pub struct SliceGraph {
    slices: BTreeSet<String>,
    witnesses: BTreeMap<(String, String), Witness>,
}

impl SliceGraph {
    /// Builds the slice graph from every access edge and inheritance
    /// relation between classes of distinct slices.
    #[must_use]
    pub fn build(graph: &ClassGraph, slicing: &Slicing) -> Self {
        let keys: HashMap<_, _> = graph
            .classes()
            .filter_map(|c| slicing.key(c).map(|k| (c.id(), k)))
            .collect();
        let mut slices: BTreeSet<String> = BTreeSet::new();
        let mut witnesses: BTreeMap<(String, String), Witness> = BTreeMap::new();
        let mut record = |from: &str, to: &str, witness: Witness| {
            let key = (from.to_string(), to.to_string());
            match witnesses.get(&key) {
                Some(existing) if existing.sort_key() <= witness.sort_key() => {}
                _ => {
                    witnesses.insert(key, witness);
                }
            }
        };

        for class in graph.full_classes() {
            let Some(from) = keys.get(&class.id()) else {
                continue;
            };
            slices.insert(from.clone());

            for edge in graph.outgoing(class.id()) {
                let Some(to) = keys.get(&edge.target_class()) else {
                    continue;
                };
                if to == from {
                    continue;
                }
                let witness = Witness {
                    origin_class: class.name().to_string(),
                    target_class: graph.class(edge.target_class()).name().to_string(),
                    evidence: Evidence {
                        origin: edge.origin_name().to_string(),
                        target: edge.target_name().to_string(),
                        kind: Some(edge.kind()),
                        location: graph.edge_location(edge),
                        description: graph.describe_edge(edge),
                    },
                };
                record(from, to, witness);
            }

            let location = graph.class_location(class.id());
            let supers = class.superclass_name().map(|s| (s, "extends class"));
            let interfaces = class
                .interface_names()
                .iter()
                .map(|i| (i.as_str(), "implements interface"));
            for (name, verb) in supers.into_iter().chain(interfaces) {
                let Some(to) = graph.resolve(name).and_then(|id| keys.get(&id)) else {
                    continue;
                };
                if to == from {
                    continue;
                }
                let witness = Witness {
                    origin_class: class.name().to_string(),
                    target_class: name.to_string(),
                    evidence: Evidence {
                        origin: class.name().to_string(),
                        target: name.to_string(),
                        kind: None,
                        location: location.clone(),
                        description: format!("Class <{}> {verb} <{name}> in {location}", class.name()),
                    },
                };
                record(from, to, witness);
            }
        }
        for (_, to) in witnesses.keys() {
            slices.insert(to.clone());
        }
        Self { slices, witnesses }
    }

    /// All slices, sorted.
    pub fn slices(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(String::as_str)
    }

    /// Number of slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True if no class was assigned a slice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice dependencies as `(from, to)` pairs, sorted.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &str)> {
        self.witnesses.keys().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// The witness chosen for a slice dependency.
    #[must_use]
    pub fn witness(&self, from: &str, to: &str) -> Option<&Evidence> {
        self.witnesses
            .get(&(from.to_string(), to.to_string()))
            .map(|w| &w.evidence)
    }

    /// Finds every cycle, ordered by smallest slice.
    #[must_use]
    pub fn cycles(&self) -> Vec<Cycle> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let index: HashMap<&str, NodeIndex> = self
            .slices
            .iter()
            .map(|s| (s.as_str(), graph.add_node(s.as_str())))
            .collect();
        for (from, to) in self.dependencies() {
            graph.add_edge(index[from], index[to], ());
        }

        let mut cycles: Vec<Cycle> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let members: BTreeSet<&str> = component.iter().map(|n| graph[*n]).collect();
                self.cycle_through(&members)
            })
            .collect();
        cycles.sort_by(|a, b| a.slices.cmp(&b.slices));
        debug!("Found {} cycle(s) among {} slices", cycles.len(), self.len());
        cycles
    }

    /// Builds a closed walk through every member of a strongly connected
    /// component, visiting unvisited slices in name order.
    fn cycle_through(&self, members: &BTreeSet<&str>) -> Cycle {
        let start = members.iter().next().copied().unwrap_or_default();
        let mut walk = vec![start];
        let mut visited: BTreeSet<&str> = BTreeSet::from([start]);
        let mut current = start;
        while let Some(next) = members.iter().copied().find(|m| !visited.contains(m)) {
            let path = self.shortest_path(current, next, members);
            for slice in path.into_iter().skip(1) {
                visited.insert(slice);
                walk.push(slice);
            }
            current = next;
        }
        walk.extend(self.shortest_path(current, start, members).into_iter().skip(1));

        let hops = walk
            .windows(2)
            .filter_map(|pair| {
                let witness = self.witness(pair[0], pair[1])?.clone();
                Some(Hop {
                    from: pair[0].to_string(),
                    to: pair[1].to_string(),
                    witness,
                })
            })
            .collect();
        Cycle {
            slices: members.iter().map(|s| (*s).to_string()).collect(),
            walk: walk.into_iter().map(str::to_string).collect(),
            hops,
        }
    }

    /// Breadth-first path inside the component; neighbours are explored in
    /// name order.
    fn shortest_path<'a>(&'a self, from: &'a str, to: &'a str, members: &BTreeSet<&'a str>) -> Vec<&'a str> {
        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        let mut seen = BTreeSet::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            let next = self
                .witnesses
                .keys()
                .filter(|(a, b)| a == current && members.contains(b.as_str()))
                .map(|(_, b)| b.as_str());
            for neighbour in next {
                if seen.insert(neighbour) {
                    previous.insert(neighbour, current);
                    queue.push_back(neighbour);
                }
            }
        }
        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            match previous.get(cursor).copied() {
                Some(p) => {
                    path.push(p);
                    cursor = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Finds every dependency cycle between slices of `graph`.
#[must_use]
pub fn detect_cycles(graph: &ClassGraph, slicing: &Slicing) -> Vec<Cycle> {
    SliceGraph::build(graph, slicing).cycles()
}

/// A rule requiring slices to be free of cycles.
#[derive(Debug, Clone)]
pub struct CycleRule {
    name: String,
    slicing: Slicing,
    description: String,
    severity: Severity,
    doc_ref: Option<String>,
}

impl CycleRule {
    /// Creates a rule named `name` over `slicing`.
    #[must_use]
    pub fn new(name: impl Into<String>, slicing: Slicing) -> Self {
        let description = format!("{slicing} should be free of cycles");
        Self {
            name: name.into(),
            slicing,
            description,
            severity: Severity::Error,
            doc_ref: None,
        }
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

    /// Attaches a design document reference.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }
}

impl ArchRule for CycleRule {
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
        let slices = SliceGraph::build(graph, &self.slicing);
        let violations = slices
            .cycles()
            .into_iter()
            .filter_map(|cycle| {
                let location = cycle.hops.first()?.witness.location.clone();
                let mut violation = Violation::new(
                    &self.name,
                    self.severity,
                    location,
                    format!("Cycle detected: {}", cycle.path()),
                );
                violation.evidence = cycle.hops.into_iter().map(|h| h.witness).collect();
                if let Some(doc_ref) = &self.doc_ref {
                    violation = violation.with_doc_ref(doc_ref);
                }
                Some(violation)
            })
            .collect();
        RuleOutcome::new(&self.name, &self.description, violations, slices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::raw::{AccessKind, RawAccess, RawClassDescriptor, RawMemberRef, RawMethod, RawOrigin};

    fn class(name: &str, calls: &[&str]) -> RawClassDescriptor {
        let mut descriptor = RawClassDescriptor::new(name)
            .with_method(RawMethod::new("run", Vec::<String>::new(), "void"));
        for (i, target) in calls.iter().enumerate() {
            descriptor = descriptor.with_access(
                RawAccess::to_member(
                    RawOrigin::Method(0),
                    AccessKind::MethodCall,
                    *target,
                    RawMemberRef::Method {
                        name: "run".into(),
                        parameter_types: vec![],
                        return_type: "void".into(),
                    },
                )
                .at_line(u32::try_from(i).unwrap() + 10),
            );
        }
        descriptor
    }

    fn build(classes: Vec<RawClassDescriptor>) -> ClassGraph {
        GraphBuilder::new().add_all(classes).build().unwrap()
    }

    #[test]
    fn three_slice_cycle_is_reported_once() {
        let graph = build(vec![
            class("c.C", &["a.A"]),
            class("a.A", &["b.B"]),
            class("b.B", &["c.C"]),
        ]);
        let first = detect_cycles(&graph, &Slicing::Package);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].slices, ["a", "b", "c"]);
        assert_eq!(first[0].path(), "a -> b -> c -> a");
        assert_eq!(first[0].hops.len(), 3);
        assert_eq!(first[0].hops[2].witness.origin, "c.C.run()");
        for _ in 0..5 {
            assert_eq!(detect_cycles(&graph, &Slicing::Package), first);
        }
    }

    #[test]
    fn chain_without_back_edge_has_no_cycle() {
        let graph = build(vec![
            class("a.A", &["b.B"]),
            class("b.B", &["c.C"]),
            class("c.C", &[]),
        ]);
        assert!(detect_cycles(&graph, &Slicing::Package).is_empty());
    }

    #[test]
    fn witness_is_smallest_origin_then_target() {
        let graph = build(vec![
            class("a.Z", &["b.B"]),
            class("a.A", &["b.Y", "b.B"]),
            class("b.B", &["a.A"]),
            class("b.Y", &[]),
        ]);
        let slices = SliceGraph::build(&graph, &Slicing::Package);
        let witness = slices.witness("a", "b").unwrap();
        assert_eq!(witness.origin, "a.A.run()");
        assert_eq!(witness.target, "b.B.run()");
    }

    #[test]
    fn pattern_slicing_and_intra_slice_edges() {
        let graph = build(vec![
            class("app.order.api.Api", &["app.order.impl.Impl"]),
            class("app.order.impl.Impl", &["app.order.api.Api"]),
            class("app.billing.Billing", &["app.order.api.Api"]),
        ]);
        let slicing = Slicing::matching(PackagePattern::new("app.(*)..").unwrap()).unwrap();
        let slices = SliceGraph::build(&graph, &slicing);
        assert_eq!(slices.slices().collect::<Vec<_>>(), ["billing", "order"]);
        assert!(slices.cycles().is_empty());
        assert!(Slicing::matching(PackagePattern::new("app..").unwrap()).is_err());
    }

    #[test]
    fn inheritance_closes_a_cycle() {
        let graph = build(vec![
            RawClassDescriptor::new("a.A").with_super("b.B"),
            class("b.B", &["a.A"]),
        ]);
        let cycles = detect_cycles(&graph, &Slicing::by(|c| Some(c.package().to_uppercase())));
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path(), "A -> B -> A");
        assert_eq!(cycles[0].hops[0].witness.kind, None);
    }

    #[test]
    fn cycle_rule_reports_one_violation_per_cycle() {
        let graph = build(vec![class("a.A", &["b.B"]), class("b.B", &["a.A"])]);
        let rule = CycleRule::new("no-cycles", Slicing::Package).with_doc_ref("ADR-7");
        assert_eq!(rule.description(), "packages should be free of cycles");
        let outcome = rule.evaluate(&graph);
        assert_eq!(outcome.scope_size, 2);
        assert_eq!(outcome.violations.len(), 1);
        let violation = &outcome.violations[0];
        assert_eq!(violation.message, "Cycle detected: a -> b -> a");
        assert_eq!(violation.evidence.len(), 2);
        assert_eq!(violation.location.class, "a.A");
        assert_eq!(violation.doc_ref.as_deref(), Some("ADR-7"));
    }
}
