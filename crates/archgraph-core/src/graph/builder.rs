//! Builds a [`ClassGraph`] from raw class descriptors.

use super::model::{
    AccessEdge, AccessTarget, Anomaly, ClassId, ClassNode, EdgeId, EdgeOrigin, MemberId,
    MemberNode, ResolutionState,
};
use super::{ClassGraph, MemberLookup};
use crate::names::{package_of, referenced_class};
use crate::raw::{MemberKind, RawClassDescriptor, RawMemberRef, RawOrigin};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that prevent a graph from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two descriptors claim the same class name.
    #[error("duplicate class '{name}': defined by more than one artifact")]
    DuplicateClass {
        /// The class name.
        name: String,
    },
}

/// Supplies minimal descriptors for classes outside the import set.
///
/// Only the hierarchy (superclass, interfaces) and modifiers of a resolved
/// descriptor are used, to let hierarchy predicates see known platform
/// types. Nodes enriched this way stay stubs.
pub trait ExternalResolver: Send + Sync {
    /// Returns a descriptor for `name`, or `None` if unknown.
    fn resolve(&self, name: &str) -> Option<RawClassDescriptor>;
}

impl<F> ExternalResolver for F
where
    F: Fn(&str) -> Option<RawClassDescriptor> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<RawClassDescriptor> {
        self(name)
    }
}

/// Builds a [`ClassGraph`].
///
/// # Example
///
/// ```
/// use archgraph_core::graph::GraphBuilder;
/// use archgraph_core::raw::RawClassDescriptor;
///
/// let graph = GraphBuilder::new()
///     .add(RawClassDescriptor::new("a.A").with_super("a.Base"))
///     .build()?;
/// assert_eq!(graph.full_count(), 1);
/// assert!(graph.get("a.Base").is_some_and(|c| c.is_stub()));
/// # Ok::<(), archgraph_core::graph::BuildError>(())
/// ```
#[derive(Default)]
pub struct GraphBuilder<'r> {
    descriptors: Vec<RawClassDescriptor>,
    resolver: Option<&'r dyn ExternalResolver>,
}

impl<'r> GraphBuilder<'r> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one descriptor.
    #[must_use]
    pub fn add(mut self, descriptor: RawClassDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds many descriptors.
    #[must_use]
    pub fn add_all(mut self, descriptors: impl IntoIterator<Item = RawClassDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Uses `resolver` to enrich stub nodes.
    #[must_use]
    pub fn resolver(mut self, resolver: &'r dyn ExternalResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Builds the graph.
    ///
    /// Nothing is materialized unless the whole build succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateClass`] if two descriptors share a
    /// name; the lexicographically smallest duplicate is reported.
    pub fn build(self) -> Result<ClassGraph, BuildError> {
        let mut full: BTreeMap<String, RawClassDescriptor> = BTreeMap::new();
        let mut duplicates: BTreeSet<String> = BTreeSet::new();
        for descriptor in self.descriptors {
            if full.contains_key(&descriptor.name) {
                duplicates.insert(descriptor.name.clone());
            } else {
                full.insert(descriptor.name.clone(), descriptor);
            }
        }
        if let Some(name) = duplicates.into_iter().next() {
            return Err(BuildError::DuplicateClass { name });
        }

        let stubs = collect_stubs(&full, self.resolver);

        let names: BTreeSet<&str> = full
            .keys()
            .map(String::as_str)
            .chain(stubs.keys().map(String::as_str))
            .collect();
        let ids: HashMap<String, ClassId> = names
            .iter()
            .enumerate()
            .map(|(i, n)| ((*n).to_string(), ClassId(i)))
            .collect();

        let mut graph = ClassGraph {
            by_name: ids.clone(),
            ..ClassGraph::default()
        };

        // Nodes and members.
        let mut origins: HashMap<ClassId, (Vec<MemberId>, Vec<MemberId>)> = HashMap::new();
        for name in &names {
            let id = ids[*name];
            let mut node = ClassNode::stub(id, (*name).to_string());
            if let Some(descriptor) = full.get(*name) {
                node.state = ResolutionState::Full;
                node.modifiers = descriptor.modifiers;
                node.superclass.clone_from(&descriptor.super_name);
                node.interfaces.clone_from(&descriptor.interfaces);
                node.annotations.clone_from(&descriptor.annotations);
                node.source_file.clone_from(&descriptor.source_file);
                let (field_ids, method_ids) = add_members(&mut graph, id, descriptor);
                node.members = field_ids.iter().chain(&method_ids).copied().collect();
                origins.insert(id, (field_ids, method_ids));
            } else if let Some(stub) = stubs.get(*name).and_then(Option::as_ref) {
                node.modifiers = stub.modifiers;
                node.superclass.clone_from(&stub.super_name);
                node.interfaces.clone_from(&stub.interfaces);
            }
            graph.classes.push(node);
        }

        // Edges.
        graph.outgoing = vec![Vec::new(); graph.classes.len()];
        graph.incoming = vec![Vec::new(); graph.classes.len()];
        let mut unresolved = Vec::new();
        for (name, descriptor) in &full {
            let class = ids[name.as_str()];
            let (field_ids, method_ids) = &origins[&class];
            for access in &descriptor.accesses {
                let origin = match access.origin {
                    RawOrigin::Class => EdgeOrigin::Class(class),
                    RawOrigin::Field(i) => match field_ids.get(i) {
                        Some(m) => EdgeOrigin::Member(*m),
                        None => EdgeOrigin::Class(class),
                    },
                    RawOrigin::Method(i) => match method_ids.get(i) {
                        Some(m) => EdgeOrigin::Member(*m),
                        None => EdgeOrigin::Class(class),
                    },
                };
                let Some(owner_name) = referenced_class(&access.target_owner) else {
                    continue;
                };
                let Some(&target_class) = ids.get(owner_name) else {
                    continue;
                };

                let (target, target_name) = match &access.target_member {
                    None => (AccessTarget::Class(target_class), owner_name.to_string()),
                    Some(reference) => {
                        let referenced = format!("{owner_name}.{}", member_signature(reference));
                        match graph.find_member(target_class, reference) {
                            MemberLookup::Found(m) => (AccessTarget::Member(m), referenced),
                            MemberLookup::Missing => {
                                unresolved.push(Anomaly::UnresolvedReference {
                                    origin: name.clone(),
                                    owner: owner_name.to_string(),
                                    member: member_signature(reference),
                                    kind: access.kind,
                                });
                                (AccessTarget::Class(target_class), referenced)
                            }
                            MemberLookup::Unknown => {
                                (AccessTarget::Class(target_class), referenced)
                            }
                        }
                    }
                };

                let (origin_name, origin_label) = match origin {
                    EdgeOrigin::Class(c) => (graph.class(c).name().to_string(), "Class"),
                    EdgeOrigin::Member(m) => {
                        let member = graph.member(m);
                        (member.full_name(), member.kind().label())
                    }
                };
                let edge_id = EdgeId(graph.edges.len());
                graph.edges.push(AccessEdge {
                    id: edge_id,
                    origin,
                    origin_class: class,
                    kind: access.kind,
                    target,
                    target_class,
                    origin_name,
                    origin_label,
                    target_name,
                    target_member_name: access.target_member.as_ref().map(|m| m.name().to_string()),
                    line: access.line,
                });
                if let EdgeOrigin::Member(m) = origin {
                    graph.members[m.0].accesses.push(edge_id);
                }
                graph.outgoing[class.0].push(edge_id);
                graph.incoming[target_class.0].push(edge_id);
            }
        }

        // Indices.
        for node in &graph.classes {
            graph
                .by_package
                .entry(package_of(node.name()).to_string())
                .or_default()
                .push(node.id);
            for annotation in &node.annotations {
                let entry = graph
                    .by_annotation
                    .entry(annotation.type_name.clone())
                    .or_default();
                if !entry.contains(&node.id) {
                    entry.push(node.id);
                }
            }
        }

        // Anomalies.
        let cyclic: Vec<Anomaly> = graph
            .classes
            .iter()
            .filter(|c| graph.has_cyclic_hierarchy(c.id))
            .map(|c| Anomaly::SelfReferentialHierarchy {
                class: c.name().to_string(),
            })
            .collect();
        graph.anomalies = unresolved.into_iter().chain(cyclic).collect();
        for anomaly in &graph.anomalies {
            warn!(%anomaly, "Graph anomaly");
        }

        info!(
            classes = graph.full_count(),
            stubs = graph.stub_count(),
            members = graph.members.len(),
            edges = graph.edges.len(),
            anomalies = graph.anomalies.len(),
            "Built class graph"
        );
        Ok(graph)
    }
}

/// Names referenced by imported classes but not imported themselves,
/// mapped to the descriptor the resolver supplied (if any).
///
/// Hierarchy of resolved stubs is followed so that supertypes supplied by
/// the resolver also get nodes.
fn collect_stubs(
    full: &BTreeMap<String, RawClassDescriptor>,
    resolver: Option<&dyn ExternalResolver>,
) -> BTreeMap<String, Option<RawClassDescriptor>> {
    let mut stubs: BTreeMap<String, Option<RawClassDescriptor>> = BTreeMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for descriptor in full.values() {
        for name in descriptor.referenced_types() {
            if !full.contains_key(name) && !stubs.contains_key(name) {
                stubs.insert(name.to_string(), None);
                queue.push_back(name.to_string());
            }
        }
    }

    let Some(resolver) = resolver else {
        return stubs;
    };
    while let Some(name) = queue.pop_front() {
        let Some(resolved) = resolver.resolve(&name) else {
            continue;
        };
        if resolved.name != name {
            debug!(requested = %name, returned = %resolved.name, "Resolver returned another class; ignored");
            continue;
        }
        let supertypes: Vec<String> = resolved
            .super_name
            .iter()
            .chain(&resolved.interfaces)
            .filter_map(|n| referenced_class(n))
            .map(str::to_string)
            .collect();
        for supertype in supertypes {
            if !full.contains_key(&supertype) && !stubs.contains_key(&supertype) {
                stubs.insert(supertype.clone(), None);
                queue.push_back(supertype);
            }
        }
        debug!(class = %name, "Enriched stub from external resolver");
        stubs.insert(name, Some(resolved));
    }
    stubs
}

fn add_members(
    graph: &mut ClassGraph,
    owner: ClassId,
    descriptor: &RawClassDescriptor,
) -> (Vec<MemberId>, Vec<MemberId>) {
    let mut push = |member: MemberNode| {
        let id = MemberId(graph.members.len());
        graph.members.push(MemberNode { id, ..member });
        id
    };
    let fields = descriptor
        .fields
        .iter()
        .map(|f| {
            push(MemberNode {
                id: MemberId(0),
                owner,
                owner_name: descriptor.name.clone(),
                kind: MemberKind::Field,
                name: f.name.clone(),
                modifiers: f.modifiers,
                annotations: f.annotations.clone(),
                type_name: f.type_name.clone(),
                parameter_types: Vec::new(),
                throws: Vec::new(),
                accesses: Vec::new(),
            })
        })
        .collect();
    let methods = descriptor
        .methods
        .iter()
        .map(|m| {
            push(MemberNode {
                id: MemberId(0),
                owner,
                owner_name: descriptor.name.clone(),
                kind: m.kind(),
                name: m.name.clone(),
                modifiers: m.modifiers,
                annotations: m.annotations.clone(),
                type_name: m.return_type.clone(),
                parameter_types: m.parameter_types.clone(),
                throws: m.throws.clone(),
                accesses: Vec::new(),
            })
        })
        .collect();
    (fields, methods)
}

fn member_signature(reference: &RawMemberRef) -> String {
    match reference {
        RawMemberRef::Field { name, .. } => name.clone(),
        RawMemberRef::Method {
            name,
            parameter_types,
            ..
        } => format!("{name}({})", parameter_types.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{AccessKind, Annotation, RawAccess, RawField, RawMethod};

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
    }

    #[test]
    fn referenced_names_become_stubs() {
        let graph = GraphBuilder::new()
            .add(
                RawClassDescriptor::new("a.A")
                    .with_super("java.lang.Object")
                    .with_field(RawField::new("names", "java.util.List"))
                    .with_annotation(Annotation::new("a.Marker")),
            )
            .build()
            .unwrap();
        let stubs: Vec<&str> = graph.stubs().map(ClassNode::name).collect();
        assert_eq!(stubs, vec!["a.Marker", "java.lang.Object", "java.util.List"]);
        assert_eq!(graph.classes_annotated_with("a.Marker").count(), 1);
    }

    #[test]
    fn duplicate_reports_smallest_name() {
        let err = GraphBuilder::new()
            .add(RawClassDescriptor::new("b.B"))
            .add(RawClassDescriptor::new("b.B"))
            .add(RawClassDescriptor::new("a.A"))
            .add(RawClassDescriptor::new("a.A"))
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DuplicateClass { name: "a.A".into() });
    }

    #[test]
    fn access_resolves_to_inherited_member() {
        let graph = GraphBuilder::new()
            .add(
                RawClassDescriptor::new("a.Caller")
                    .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
                    .with_access(call("a.Child", "work")),
            )
            .add(RawClassDescriptor::new("a.Child").with_super("a.Parent"))
            .add(
                RawClassDescriptor::new("a.Parent")
                    .with_method(RawMethod::new("work", Vec::<String>::new(), "void")),
            )
            .build()
            .unwrap();
        let edge = graph.edges().next().unwrap();
        let AccessTarget::Member(target) = edge.target() else {
            panic!("expected member target");
        };
        assert_eq!(graph.member(target).full_name(), "a.Parent.work()");
        assert_eq!(graph.class(edge.target_class()).name(), "a.Child");
        assert_eq!(edge.target_name(), "a.Child.work()");
        assert!(graph.anomalies().is_empty());
    }

    #[test]
    fn constructors_are_not_inherited() {
        let new_child = RawAccess::to_member(
            RawOrigin::Method(0),
            AccessKind::ConstructorCall,
            "a.Child",
            RawMemberRef::Method {
                name: "<init>".into(),
                parameter_types: vec![],
                return_type: "void".into(),
            },
        );
        let graph = GraphBuilder::new()
            .add(
                RawClassDescriptor::new("a.Caller")
                    .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
                    .with_access(new_child),
            )
            .add(RawClassDescriptor::new("a.Child").with_super("a.Parent"))
            .add(
                RawClassDescriptor::new("a.Parent")
                    .with_method(RawMethod::new("<init>", Vec::<String>::new(), "void")),
            )
            .build()
            .unwrap();
        let edge = graph.edges().next().unwrap();
        assert_eq!(graph.class(edge.target_class()).name(), "a.Child");
        assert_eq!(edge.target(), AccessTarget::Class(edge.target_class()));
        assert!(matches!(
            graph.anomalies(),
            [Anomaly::UnresolvedReference { owner, .. }] if owner == "a.Child"
        ));
    }

    #[test]
    fn self_superclass_is_reported_and_traversal_terminates() {
        let graph = GraphBuilder::new()
            .add(RawClassDescriptor::new("a.A").with_super("a.A"))
            .add(RawClassDescriptor::new("a.B").with_super("a.A"))
            .build()
            .unwrap();
        let a = graph.resolve("a.A").unwrap();
        let b = graph.resolve("a.B").unwrap();
        assert!(graph.ancestors(a).is_empty());
        assert!(graph.is_assignable_to(a, "a.A"));
        assert!(!graph.is_assignable_to(a, "a.B"));
        assert_eq!(graph.ancestors(b), vec![a]);
        assert!(matches!(
            graph.anomalies(),
            [Anomaly::SelfReferentialHierarchy { class }] if class == "a.A"
        ));
    }

    #[test]
    fn stub_owner_targets_class_without_anomaly() {
        let graph = GraphBuilder::new()
            .add(
                RawClassDescriptor::new("a.A")
                    .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
                    .with_access(call("ext.Lib", "go")),
            )
            .build()
            .unwrap();
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.target(), AccessTarget::Class(edge.target_class()));
        assert!(graph.anomalies().is_empty());
    }

    #[test]
    fn missing_member_in_complete_hierarchy_is_an_anomaly() {
        let graph = GraphBuilder::new()
            .add(
                RawClassDescriptor::new("a.A")
                    .with_method(RawMethod::new("run", Vec::<String>::new(), "void"))
                    .with_access(call("a.B", "gone")),
            )
            .add(RawClassDescriptor::new("a.B"))
            .build()
            .unwrap();
        assert!(matches!(
            graph.anomalies(),
            [Anomaly::UnresolvedReference { owner, member, .. }] if owner == "a.B" && member == "gone()"
        ));
    }

    #[test]
    fn cyclic_hierarchy_is_reported_and_traversal_terminates() {
        let graph = GraphBuilder::new()
            .add(RawClassDescriptor::new("a.A").with_super("a.B"))
            .add(RawClassDescriptor::new("a.B").with_super("a.A"))
            .build()
            .unwrap();
        let a = graph.resolve("a.A").unwrap();
        assert_eq!(graph.ancestors(a).len(), 1);
        assert!(graph.is_assignable_to(a, "a.B"));
        assert_eq!(
            graph
                .anomalies()
                .iter()
                .filter(|a| matches!(a, Anomaly::SelfReferentialHierarchy { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn resolver_enriches_stub_hierarchy() {
        let resolver = |name: &str| match name {
            "ext.Base" => Some(RawClassDescriptor::new("ext.Base").with_super("ext.Root")),
            _ => None,
        };
        let graph = GraphBuilder::new()
            .add(RawClassDescriptor::new("a.A").with_super("ext.Base"))
            .resolver(&resolver)
            .build()
            .unwrap();
        let base = graph.get("ext.Base").unwrap();
        assert!(base.is_stub());
        assert_eq!(base.superclass_name(), Some("ext.Root"));
        let a = graph.resolve("a.A").unwrap();
        assert!(graph.is_assignable_to(a, "ext.Root"));
        assert!(graph.get("ext.Root").unwrap().is_stub());
    }
}
