//! Node and edge types of the class graph.

use crate::names::{package_of, simple_name_of};
use crate::raw::{AccessKind, Annotation, MemberKind, Modifier, Modifiers};
use std::fmt;

/// Index of a class node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub(crate) usize);

/// Index of a member node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub(crate) usize);

/// Index of an access edge in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl ClassId {
    /// Position in [`ClassGraph::classes`](super::ClassGraph::classes).
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a class was imported from an artifact or is only referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    /// Imported from an artifact.
    Full,
    /// Referenced but not imported; carries only the name (plus whatever
    /// hierarchy an external resolver supplied).
    Stub,
}

// ────────────────────────────────────────────
// Classes
// ────────────────────────────────────────────

/// A class in the graph.
///
/// Supertypes and annotation types are held by name and looked up in the
/// graph on demand, so hierarchy cycles and absent classes need no special
/// representation.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) state: ResolutionState,
    pub(crate) modifiers: Modifiers,
    pub(crate) superclass: Option<String>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) members: Vec<MemberId>,
    pub(crate) source_file: Option<String>,
}

impl ClassNode {
    pub(crate) fn stub(id: ClassId, name: String) -> Self {
        Self {
            id,
            name,
            state: ResolutionState::Stub,
            modifiers: Modifiers::empty(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            members: Vec::new(),
            source_file: None,
        }
    }

    /// Node id.
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Fully qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package name (empty for the default package).
    #[must_use]
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    /// Simple name (nested classes yield the innermost name).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// Resolution state.
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// True for stub nodes.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.state == ResolutionState::Stub
    }

    /// Class modifiers.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// True if declared as an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.modifiers.contains(Modifier::Interface)
    }

    /// Superclass name.
    #[must_use]
    pub fn superclass_name(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Implemented interface names.
    #[must_use]
    pub fn interface_names(&self) -> &[String] {
        &self.interfaces
    }

    /// Class-level annotation usages.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Declared members.
    #[must_use]
    pub fn member_ids(&self) -> &[MemberId] {
        &self.members
    }

    /// Source file name from the artifact.
    #[must_use]
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Direct supertype names: superclass first, then interfaces.
    pub fn supertype_names(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .as_deref()
            .into_iter()
            .chain(self.interfaces.iter().map(String::as_str))
    }
}

// ────────────────────────────────────────────
// Members
// ────────────────────────────────────────────

/// A field, method, constructor or static initializer.
#[derive(Debug, Clone)]
pub struct MemberNode {
    pub(crate) id: MemberId,
    pub(crate) owner: ClassId,
    pub(crate) owner_name: String,
    pub(crate) kind: MemberKind,
    pub(crate) name: String,
    pub(crate) modifiers: Modifiers,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) type_name: String,
    pub(crate) parameter_types: Vec<String>,
    pub(crate) throws: Vec<String>,
    pub(crate) accesses: Vec<EdgeId>,
}

impl MemberNode {
    /// Node id.
    #[must_use]
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Owning class.
    #[must_use]
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    /// Owning class name.
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    /// Member kind.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// JVM name (`<init>` for constructors).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modifiers.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Annotation usages.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Field type, or return type for methods.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Ordered parameter types (empty for fields).
    #[must_use]
    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    /// Declared thrown types.
    #[must_use]
    pub fn throws(&self) -> &[String] {
        &self.throws
    }

    /// Access edges originating in this member.
    #[must_use]
    pub fn access_ids(&self) -> &[EdgeId] {
        &self.accesses
    }

    /// Full name: `a.B.field` or `a.B.method(int, java.lang.String)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.kind {
            MemberKind::Field => format!("{}.{}", self.owner_name, self.name),
            _ => format!(
                "{}.{}({})",
                self.owner_name,
                self.name,
                self.parameter_types.join(", ")
            ),
        }
    }

    /// `Method <a.B.m()>` style label used in descriptions.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} <{}>", self.kind.label(), self.full_name())
    }
}

// ────────────────────────────────────────────
// Edges
// ────────────────────────────────────────────

/// Where an access edge starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeOrigin {
    /// The class itself (annotation values on the class).
    Class(ClassId),
    /// A member of the class.
    Member(MemberId),
}

/// Where an access edge ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTarget {
    /// A resolved member of an imported class.
    Member(MemberId),
    /// A class; used for type references and for members that could not
    /// be resolved (stub owners or unknown members).
    Class(ClassId),
}

/// A directed, kind-tagged dependency.
#[derive(Debug, Clone)]
pub struct AccessEdge {
    pub(crate) id: EdgeId,
    pub(crate) origin: EdgeOrigin,
    pub(crate) origin_class: ClassId,
    pub(crate) kind: AccessKind,
    pub(crate) target: AccessTarget,
    pub(crate) target_class: ClassId,
    pub(crate) origin_name: String,
    pub(crate) origin_label: &'static str,
    pub(crate) target_name: String,
    pub(crate) target_member_name: Option<String>,
    pub(crate) line: Option<u32>,
}

impl AccessEdge {
    /// Edge id.
    #[must_use]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Originating element.
    #[must_use]
    pub fn origin(&self) -> EdgeOrigin {
        self.origin
    }

    /// Class containing the origin.
    #[must_use]
    pub fn origin_class(&self) -> ClassId {
        self.origin_class
    }

    /// Access kind.
    #[must_use]
    pub fn kind(&self) -> AccessKind {
        self.kind
    }

    /// Resolved target.
    #[must_use]
    pub fn target(&self) -> AccessTarget {
        self.target
    }

    /// The target's owner as named at the access site.
    #[must_use]
    pub fn target_class(&self) -> ClassId {
        self.target_class
    }

    /// Full name of the origin.
    #[must_use]
    pub fn origin_name(&self) -> &str {
        &self.origin_name
    }

    /// Full name of the target as referenced (`c.D.run()`, `c.D.field`, `c.D`).
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Name of the targeted member as referenced, absent for type references.
    #[must_use]
    pub fn target_member_name(&self) -> Option<&str> {
        self.target_member_name.as_deref()
    }

    /// Source line, if known.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// True if origin and target owner are the same class.
    #[must_use]
    pub fn is_self_access(&self) -> bool {
        self.origin_class == self.target_class
    }

    /// `Method <a.B.m()> calls method <c.D.n()>` without location.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} <{}> {} <{}>",
            self.origin_label,
            self.origin_name,
            self.kind.verb(),
            self.target_name
        )
    }
}

// ────────────────────────────────────────────
// Anomalies
// ────────────────────────────────────────────

/// A non-fatal irregularity found while building the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// An access names a member that no class in the fully imported
    /// hierarchy of its owner declares. The edge targets the owner class.
    UnresolvedReference {
        /// Class performing the access.
        origin: String,
        /// Owner named at the access site.
        owner: String,
        /// Member as named (`name(params)` or `name`).
        member: String,
        /// Access kind.
        kind: AccessKind,
    },
    /// The class is its own ancestor.
    SelfReferentialHierarchy {
        /// Class name.
        class: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedReference {
                origin,
                owner,
                member,
                kind,
            } => write!(
                f,
                "{origin}: unresolved {kind} target {owner}.{member}; using owner class"
            ),
            Self::SelfReferentialHierarchy { class } => {
                write!(f, "{class}: class is its own ancestor")
            }
        }
    }
}
