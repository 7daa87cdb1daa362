//! The class graph: classes, members and typed access edges.
//!
//! A [`ClassGraph`] is produced by [`GraphBuilder`] and is immutable
//! afterwards. It is `Send + Sync`, so any number of rule evaluations may
//! read it concurrently.

mod builder;
mod model;

pub use builder::{BuildError, ExternalResolver, GraphBuilder};
pub use model::{
    AccessEdge, AccessTarget, Anomaly, ClassId, ClassNode, EdgeId, EdgeOrigin, MemberId,
    MemberNode, ResolutionState,
};

use crate::raw::{MemberKind, RawMemberRef, CONSTRUCTOR_NAME, STATIC_INITIALIZER_NAME};
use crate::types::Location;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// The closed, queryable graph of all imported and referenced classes.
#[derive(Debug, Default)]
pub struct ClassGraph {
    pub(crate) classes: Vec<ClassNode>,
    pub(crate) members: Vec<MemberNode>,
    pub(crate) edges: Vec<AccessEdge>,
    pub(crate) by_name: HashMap<String, ClassId>,
    pub(crate) by_package: BTreeMap<String, Vec<ClassId>>,
    pub(crate) by_annotation: HashMap<String, Vec<ClassId>>,
    pub(crate) outgoing: Vec<Vec<EdgeId>>,
    pub(crate) incoming: Vec<Vec<EdgeId>>,
    pub(crate) anomalies: Vec<Anomaly>,
}

/// Result of looking up a member through a class hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLookup {
    /// The most specific declaring member.
    Found(MemberId),
    /// Not declared anywhere in a hierarchy that is fully imported.
    Missing,
    /// Not found, but some ancestor is a stub or absent, so it may be
    /// declared there.
    Unknown,
}

impl ClassGraph {
    /// All classes (full and stub), sorted by name.
    pub fn classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.iter()
    }

    /// Imported classes, sorted by name.
    pub fn full_classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.iter().filter(|c| !c.is_stub())
    }

    /// Stub classes, sorted by name.
    pub fn stubs(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.iter().filter(|c| c.is_stub())
    }

    /// All members, grouped by owner in class order.
    pub fn members(&self) -> impl Iterator<Item = &MemberNode> {
        self.members.iter()
    }

    /// All access edges, grouped by origin class in class order.
    pub fn edges(&self) -> impl Iterator<Item = &AccessEdge> {
        self.edges.iter()
    }

    /// Number of class nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if the graph has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of imported classes.
    #[must_use]
    pub fn full_count(&self) -> usize {
        self.full_classes().count()
    }

    /// Number of stub classes.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.stubs().count()
    }

    /// Class by id.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.classes[id.0]
    }

    /// Member by id.
    #[must_use]
    pub fn member(&self, id: MemberId) -> &MemberNode {
        &self.members[id.0]
    }

    /// Edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &AccessEdge {
        &self.edges[id.0]
    }

    /// Looks up a class by fully qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassNode> {
        self.by_name.get(name).map(|id| self.class(*id))
    }

    /// Resolves a name-keyed reference to its class id.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Members declared by `class`.
    pub fn members_of(&self, class: ClassId) -> impl Iterator<Item = &MemberNode> {
        self.class(class).members.iter().map(|id| self.member(*id))
    }

    /// Edges originating in `class` (members and class-level).
    pub fn outgoing(&self, class: ClassId) -> impl Iterator<Item = &AccessEdge> {
        self.outgoing[class.0].iter().map(|id| self.edge(*id))
    }

    /// Edges whose target owner is `class`.
    pub fn incoming(&self, class: ClassId) -> impl Iterator<Item = &AccessEdge> {
        self.incoming[class.0].iter().map(|id| self.edge(*id))
    }

    /// Packages with at least one class, sorted.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.by_package.keys().map(String::as_str)
    }

    /// Classes in exactly `package`.
    pub fn classes_in_package(&self, package: &str) -> impl Iterator<Item = &ClassNode> {
        self.by_package
            .get(package)
            .into_iter()
            .flatten()
            .map(|id| self.class(*id))
    }

    /// Classes directly annotated with `annotation`.
    pub fn classes_annotated_with(&self, annotation: &str) -> impl Iterator<Item = &ClassNode> {
        self.by_annotation
            .get(annotation)
            .into_iter()
            .flatten()
            .map(|id| self.class(*id))
    }

    /// Build-time anomalies.
    #[must_use]
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    // ────────────────────────────────────────
    // Hierarchy
    // ────────────────────────────────────────

    /// The superclass node, if present in the graph.
    #[must_use]
    pub fn superclass(&self, class: ClassId) -> Option<&ClassNode> {
        self.class(class)
            .superclass_name()
            .and_then(|name| self.get(name))
    }

    /// Interface nodes present in the graph.
    pub fn interfaces(&self, class: ClassId) -> impl Iterator<Item = &ClassNode> {
        self.class(class)
            .interface_names()
            .iter()
            .filter_map(|name| self.get(name))
    }

    /// All ancestors in breadth-first order (superclass before interfaces),
    /// each at most once. The class itself is never included, even when the
    /// hierarchy loops back to it.
    #[must_use]
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut visited = HashSet::from([class]);
        let mut order = Vec::new();
        let mut queue = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            for name in self.class(current).supertype_names() {
                if let Some(id) = self.resolve(name) {
                    if visited.insert(id) {
                        order.push(id);
                        queue.push_back(id);
                    }
                }
            }
        }
        order
    }

    /// True if `class` is named `target` or has an ancestor named `target`.
    #[must_use]
    pub fn is_assignable_to(&self, class: ClassId, target: &str) -> bool {
        self.class(class).name() == target
            || self
                .ancestors(class)
                .into_iter()
                .any(|id| self.class(id).name() == target)
    }

    /// True if following supertypes from `class` leads back to it.
    #[must_use]
    pub fn has_cyclic_hierarchy(&self, class: ClassId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            for name in self.class(current).supertype_names() {
                match self.resolve(name) {
                    Some(id) if id == class => return true,
                    Some(id) if visited.insert(id) => queue.push_back(id),
                    _ => {}
                }
            }
        }
        false
    }

    /// Finds the most specific member matching `reference`, searching
    /// `class` first and then its ancestors. Constructors and static
    /// initializers are not inherited and are only searched in `class`.
    #[must_use]
    pub fn find_member(&self, class: ClassId, reference: &RawMemberRef) -> MemberLookup {
        if matches!(reference.name(), CONSTRUCTOR_NAME | STATIC_INITIALIZER_NAME) {
            if self.class(class).is_stub() {
                return MemberLookup::Unknown;
            }
            return match self.members_of(class).find(|m| matches_reference(m, reference)) {
                Some(member) => MemberLookup::Found(member.id()),
                None => MemberLookup::Missing,
            };
        }

        let mut complete = true;
        for id in std::iter::once(class).chain(self.ancestors(class)) {
            let node = self.class(id);
            if node.is_stub() {
                complete = false;
                continue;
            }
            if node.supertype_names().any(|n| self.resolve(n).is_none()) {
                complete = false;
            }
            if let Some(member) = self.members_of(id).find(|m| matches_reference(m, reference)) {
                return MemberLookup::Found(member.id());
            }
        }
        if complete {
            MemberLookup::Missing
        } else {
            MemberLookup::Unknown
        }
    }

    // ────────────────────────────────────────
    // Locations
    // ────────────────────────────────────────

    /// Location of a class (no line).
    #[must_use]
    pub fn class_location(&self, class: ClassId) -> Location {
        let node = self.class(class);
        Location::of_class(node.name(), node.source_file.clone())
    }

    /// Location of a member: its owner, at the first line any of its
    /// accesses is attributed to.
    #[must_use]
    pub fn member_location(&self, member: MemberId) -> Location {
        let node = self.member(member);
        let line = node
            .accesses
            .iter()
            .filter_map(|e| self.edge(*e).line)
            .min();
        self.class_location(node.owner).at_line(line)
    }

    /// Location of an access edge.
    #[must_use]
    pub fn edge_location(&self, edge: &AccessEdge) -> Location {
        self.class_location(edge.origin_class).at_line(edge.line)
    }

    /// `Method <a.B.m()> calls method <c.D.n()> in (B.java:10)`.
    #[must_use]
    pub fn describe_edge(&self, edge: &AccessEdge) -> String {
        format!("{} in {}", edge.summary(), self.edge_location(edge))
    }
}

fn matches_reference(member: &MemberNode, reference: &RawMemberRef) -> bool {
    match reference {
        RawMemberRef::Field { name, type_name } => {
            member.kind == MemberKind::Field && member.name == *name && member.type_name == *type_name
        }
        RawMemberRef::Method {
            name,
            parameter_types,
            return_type,
        } => {
            member.kind != MemberKind::Field
                && member.name == *name
                && member.parameter_types == *parameter_types
                && member.type_name == *return_type
        }
    }
}
