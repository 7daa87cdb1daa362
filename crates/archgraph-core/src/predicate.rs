//! Composable, self-describing predicates over graph elements.
//!
//! A [`Predicate`] pairs a closed [`Matcher`] with the description used
//! verbatim in rule and violation text. Combinators derive descriptions
//! from their operands:
//!
//! ```
//! use archgraph_core::predicate::{named, reside_in};
//!
//! let p = reside_in("..report..")?.and(named("report.Main"));
//! assert_eq!(p.description(), "reside in '..report..' and named 'report.Main'");
//! assert_eq!((!p).description(), "not (reside in '..report..' and named 'report.Main')");
//! # Ok::<(), archgraph_core::predicate::PredicateError>(())
//! ```
//!
//! Every matcher declares which element kinds it can judge ([`KindSet`]).
//! Rules check this when they are constructed, so a predicate over the wrong
//! kind fails before any graph work.

use crate::graph::{AccessEdge, ClassGraph, ClassNode, MemberNode};
use crate::names::simple_name_of;
use crate::pattern::{PackagePattern, PatternError};
use crate::raw::{AccessKind, Annotation, MemberKind, Modifier};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::ops;
use thiserror::Error;

/// Errors from constructing a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// Invalid package pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// Invalid name regex.
    #[error("invalid name regex '{pattern}': {message}")]
    Regex {
        /// The regex.
        pattern: String,
        /// Compiler message.
        message: String,
    },
}

// ────────────────────────────────────────────
// Element kinds
// ────────────────────────────────────────────

/// The kind of graph element a predicate or rule ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Class nodes.
    Class,
    /// Member nodes.
    Member,
    /// Access edges.
    Access,
}

impl ElementKind {
    /// Plural noun used in rule descriptions.
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::Class => "classes",
            Self::Member => "members",
            Self::Access => "accesses",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Member => write!(f, "member"),
            Self::Access => write!(f, "access"),
        }
    }
}

/// A set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// No kind.
    pub const NONE: Self = Self(0);
    /// Classes only.
    pub const CLASS: Self = Self(1);
    /// Members only.
    pub const MEMBER: Self = Self(2);
    /// Accesses only.
    pub const ACCESS: Self = Self(4);
    /// Every kind.
    pub const ALL: Self = Self(7);

    const fn bit(kind: ElementKind) -> u8 {
        match kind {
            ElementKind::Class => 1,
            ElementKind::Member => 2,
            ElementKind::Access => 4,
        }
    }

    /// True if `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: ElementKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    /// Kinds in both sets.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Kinds in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True if no kind is in the set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The kinds in the set.
    pub fn iter(self) -> impl Iterator<Item = ElementKind> {
        [ElementKind::Class, ElementKind::Member, ElementKind::Access]
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<String> = self.iter().map(|k| k.to_string()).collect();
        if kinds.is_empty() {
            write!(f, "nothing")
        } else {
            write!(f, "{}", kinds.join(" or "))
        }
    }
}

/// A borrowed graph element.
#[derive(Debug, Clone, Copy)]
pub enum Element<'g> {
    /// A class node.
    Class(&'g ClassNode),
    /// A member node.
    Member(&'g MemberNode),
    /// An access edge.
    Access(&'g AccessEdge),
}

impl Element<'_> {
    /// The element's kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Class(_) => ElementKind::Class,
            Self::Member(_) => ElementKind::Member,
            Self::Access(_) => ElementKind::Access,
        }
    }
}

// ────────────────────────────────────────────
// Matchers
// ────────────────────────────────────────────

/// How a simple-name matcher compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Whole string.
    Equals,
    /// Prefix.
    StartsWith,
    /// Suffix.
    EndsWith,
    /// Substring.
    Contains,
}

impl TextMatch {
    fn test(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Equals => haystack == needle,
            Self::StartsWith => haystack.starts_with(needle),
            Self::EndsWith => haystack.ends_with(needle),
            Self::Contains => haystack.contains(needle),
        }
    }
}

/// The closed set of matcher behaviours.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches every element.
    Always,
    /// Both operands match.
    And(Box<Predicate>, Box<Predicate>),
    /// Either operand matches.
    Or(Box<Predicate>, Box<Predicate>),
    /// The operand does not match.
    Not(Box<Predicate>),
    /// Exact name: the full name of a class, the name of a member, or the
    /// name of the member an access targets.
    NameIs(String),
    /// Anchored regex over the full class name or the member name.
    NameMatching(Regex),
    /// Compares the simple name of a class.
    SimpleName(TextMatch, String),
    /// The class (or member owner) resides in a package matching any
    /// pattern.
    ResideIn(Vec<PackagePattern>),
    /// Annotation usage of the given type; through meta-annotations only
    /// if `meta` is set.
    AnnotatedWith {
        /// Annotation type name.
        type_name: String,
        /// Follow annotations on annotation types.
        meta: bool,
    },
    /// Carries the modifier.
    HasModifier(Modifier),
    /// Member of the given kind.
    IsMemberKind(MemberKind),
    /// The class or any of its ancestors satisfies the class predicate.
    HierarchyOf(Box<Predicate>),
    /// Method or constructor with exactly these parameter types.
    HasParameters(Vec<String>),
    /// Access of the given kind.
    IsAccessKind(AccessKind),
    /// The owner class satisfies the class predicate: a member's declaring
    /// class, or the owner of an access target.
    Owner(Box<Predicate>),
    /// The class performing an access satisfies the class predicate.
    OriginClass(Box<Predicate>),
    /// Class is a stub.
    Stub,
}

impl Matcher {
    fn kinds(&self) -> KindSet {
        fn class_only(inner: &Predicate, result: KindSet) -> KindSet {
            if inner.applies_to(ElementKind::Class) {
                result
            } else {
                KindSet::NONE
            }
        }
        match self {
            Self::Always | Self::NameIs(_) => KindSet::ALL,
            Self::And(p, q) | Self::Or(p, q) => p.kinds().intersect(q.kinds()),
            Self::Not(p) => p.kinds(),
            Self::NameMatching(_)
            | Self::ResideIn(_)
            | Self::AnnotatedWith { .. }
            | Self::HasModifier(_) => KindSet::CLASS.union(KindSet::MEMBER),
            Self::SimpleName(..) | Self::Stub => KindSet::CLASS,
            Self::IsMemberKind(_) | Self::HasParameters(_) => KindSet::MEMBER,
            Self::IsAccessKind(_) => KindSet::ACCESS,
            Self::HierarchyOf(p) => class_only(p, KindSet::CLASS),
            Self::Owner(p) => class_only(p, KindSet::MEMBER.union(KindSet::ACCESS)),
            Self::OriginClass(p) => class_only(p, KindSet::ACCESS),
        }
    }
}

/// Boolean connective a predicate description is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
    Not,
}

/// A matcher plus its description.
#[derive(Debug, Clone)]
pub struct Predicate {
    matcher: Matcher,
    description: String,
    kinds: KindSet,
}

impl Predicate {
    /// Creates a predicate from a matcher and description.
    #[must_use]
    pub fn new(matcher: Matcher, description: impl Into<String>) -> Self {
        let kinds = matcher.kinds();
        Self {
            matcher,
            description: description.into(),
            kinds,
        }
    }

    /// The matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Description used in rule text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Kinds this predicate can judge.
    #[must_use]
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// True if this predicate can judge elements of `kind`.
    #[must_use]
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Description as an operand of `within`. Compositions that would read
    /// ambiguously there are parenthesized.
    pub(crate) fn operand_description(&self, within: Connective) -> String {
        let grouped = matches!(
            (&self.matcher, within),
            (Matcher::And(..) | Matcher::Or(..), Connective::Not)
                | (Matcher::Or(..), Connective::And)
                | (Matcher::And(..), Connective::Or)
        );
        if grouped {
            format!("({})", self.description)
        } else {
            self.description.clone()
        }
    }

    /// Replaces the description, keeping the behaviour.
    #[must_use]
    pub fn as_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// `self and other`.
    #[must_use]
    pub fn and(self, other: Predicate) -> Self {
        let description = format!(
            "{} and {}",
            self.operand_description(Connective::And),
            other.operand_description(Connective::And)
        );
        Self::new(Matcher::And(Box::new(self), Box::new(other)), description)
    }

    /// `self or other`.
    #[must_use]
    pub fn or(self, other: Predicate) -> Self {
        let description = format!(
            "{} or {}",
            self.operand_description(Connective::Or),
            other.operand_description(Connective::Or)
        );
        Self::new(Matcher::Or(Box::new(self), Box::new(other)), description)
    }

    /// Evaluates the predicate. Elements of a kind the predicate does not
    /// apply to never match.
    #[must_use]
    pub fn test(&self, graph: &ClassGraph, element: Element<'_>) -> bool {
        if !self.kinds.contains(element.kind()) {
            return false;
        }
        match (&self.matcher, element) {
            (Matcher::Always, _) => true,
            (Matcher::And(p, q), e) => p.test(graph, e) && q.test(graph, e),
            (Matcher::Or(p, q), e) => p.test(graph, e) || q.test(graph, e),
            (Matcher::Not(p), e) => !p.test(graph, e),

            (Matcher::NameIs(name), Element::Class(c)) => c.name() == name,
            (Matcher::NameIs(name), Element::Member(m)) => m.name() == name,
            (Matcher::NameIs(name), Element::Access(a)) => {
                a.target_member_name() == Some(name.as_str())
            }
            (Matcher::NameMatching(re), Element::Class(c)) => re.is_match(c.name()),
            (Matcher::NameMatching(re), Element::Member(m)) => re.is_match(m.name()),
            (Matcher::SimpleName(mode, text), Element::Class(c)) => {
                mode.test(c.simple_name(), text)
            }

            (Matcher::ResideIn(patterns), Element::Class(c)) => {
                patterns.iter().any(|p| p.matches(c.package()))
            }
            (Matcher::ResideIn(patterns), Element::Member(m)) => {
                let package = graph.class(m.owner()).package();
                patterns.iter().any(|p| p.matches(package))
            }

            (Matcher::AnnotatedWith { type_name, meta }, Element::Class(c)) => {
                has_annotation(graph, c.annotations(), type_name, *meta)
            }
            (Matcher::AnnotatedWith { type_name, meta }, Element::Member(m)) => {
                has_annotation(graph, m.annotations(), type_name, *meta)
            }

            (Matcher::HasModifier(modifier), Element::Class(c)) => c.modifiers().contains(*modifier),
            (Matcher::HasModifier(modifier), Element::Member(m)) => {
                m.modifiers().contains(*modifier)
            }
            (Matcher::IsMemberKind(kind), Element::Member(m)) => m.kind() == *kind,
            (Matcher::HasParameters(types), Element::Member(m)) => {
                m.kind() != MemberKind::Field && m.parameter_types() == types.as_slice()
            }
            (Matcher::IsAccessKind(kind), Element::Access(a)) => a.kind() == *kind,

            (Matcher::HierarchyOf(inner), Element::Class(c)) => {
                inner.test(graph, Element::Class(c))
                    || graph
                        .ancestors(c.id())
                        .into_iter()
                        .any(|id| inner.test(graph, Element::Class(graph.class(id))))
            }
            (Matcher::Owner(inner), Element::Member(m)) => {
                inner.test(graph, Element::Class(graph.class(m.owner())))
            }
            (Matcher::Owner(inner), Element::Access(a)) => {
                inner.test(graph, Element::Class(graph.class(a.target_class())))
            }
            (Matcher::OriginClass(inner), Element::Access(a)) => {
                inner.test(graph, Element::Class(graph.class(a.origin_class())))
            }
            (Matcher::Stub, Element::Class(c)) => c.is_stub(),
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        let description = format!("not {}", self.operand_description(Connective::Not));
        Self::new(Matcher::Not(Box::new(self)), description)
    }
}

fn has_annotation(graph: &ClassGraph, annotations: &[Annotation], type_name: &str, meta: bool) -> bool {
    if annotations.iter().any(|a| a.type_name == type_name) {
        return true;
    }
    if !meta {
        return false;
    }
    // Walks annotation types, each at most once; annotation types may annotate
    // each other.
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: Vec<&str> = annotations.iter().map(|a| a.type_name.as_str()).collect();
    while let Some(name) = queue.pop() {
        if !visited.insert(name) {
            continue;
        }
        let Some(node) = graph.get(name) else {
            continue;
        };
        for annotation in node.annotations() {
            if annotation.type_name == type_name {
                return true;
            }
            queue.push(annotation.type_name.as_str());
        }
    }
    false
}

// ────────────────────────────────────────────
// Constructors
// ────────────────────────────────────────────

/// `p and q`.
#[must_use]
pub fn and(p: Predicate, q: Predicate) -> Predicate {
    p.and(q)
}

/// `p or q`.
#[must_use]
pub fn or(p: Predicate, q: Predicate) -> Predicate {
    p.or(q)
}

/// `not p`.
#[must_use]
pub fn not(p: Predicate) -> Predicate {
    !p
}

/// Matches everything.
#[must_use]
pub fn anything() -> Predicate {
    Predicate::new(Matcher::Always, "anything")
}

/// Classes with this full name, members with this name, or accesses to
/// members with this name.
#[must_use]
pub fn named(name: impl Into<String>) -> Predicate {
    let name = name.into();
    let description = format!("named '{name}'");
    Predicate::new(Matcher::NameIs(name), description)
}

/// Same matcher as [`named`], described as a property of a target.
#[must_use]
pub fn name_is(name: impl Into<String>) -> Predicate {
    let name = name.into();
    let description = format!("name is '{name}'");
    Predicate::new(Matcher::NameIs(name), description)
}

/// Full class name (or member name) matching an anchored regex.
///
/// # Errors
///
/// Returns [`PredicateError::Regex`] if the regex does not compile.
pub fn name_matching(regex: &str) -> Result<Predicate, PredicateError> {
    let compiled = Regex::new(&format!("^(?:{regex})$")).map_err(|e| PredicateError::Regex {
        pattern: regex.to_string(),
        message: e.to_string(),
    })?;
    Ok(Predicate::new(
        Matcher::NameMatching(compiled),
        format!("name matching '{regex}'"),
    ))
}

fn simple_name(mode: TextMatch, text: &str, verb: &str) -> Predicate {
    Predicate::new(
        Matcher::SimpleName(mode, text.to_string()),
        format!("have simple name {verb}'{text}'"),
    )
}

/// Classes whose simple name equals `name`.
#[must_use]
pub fn simple_name_is(name: &str) -> Predicate {
    simple_name(TextMatch::Equals, name, "")
}

/// Classes whose simple name starts with `prefix`.
#[must_use]
pub fn simple_name_starting_with(prefix: &str) -> Predicate {
    simple_name(TextMatch::StartsWith, prefix, "starting with ")
}

/// Classes whose simple name ends with `suffix`.
#[must_use]
pub fn simple_name_ending_with(suffix: &str) -> Predicate {
    simple_name(TextMatch::EndsWith, suffix, "ending with ")
}

/// Classes whose simple name contains `part`.
#[must_use]
pub fn simple_name_containing(part: &str) -> Predicate {
    simple_name(TextMatch::Contains, part, "containing ")
}

/// Classes (or members of classes) in a package matching `pattern`.
///
/// # Errors
///
/// Returns an error if the pattern is invalid.
pub fn reside_in(pattern: &str) -> Result<Predicate, PredicateError> {
    let compiled = PackagePattern::new(pattern)?;
    Ok(Predicate::new(
        Matcher::ResideIn(vec![compiled]),
        format!("reside in '{pattern}'"),
    ))
}

/// Classes in a package matching any of `patterns`.
///
/// # Errors
///
/// Returns an error if any pattern is invalid.
pub fn reside_in_any<S: AsRef<str>>(patterns: &[S]) -> Result<Predicate, PredicateError> {
    let compiled = patterns
        .iter()
        .map(|p| PackagePattern::new(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let listed: Vec<String> = patterns.iter().map(|p| format!("'{}'", p.as_ref())).collect();
    Ok(Predicate::new(
        Matcher::ResideIn(compiled),
        format!("reside in any package [{}]", listed.join(", ")),
    ))
}

/// Elements directly annotated with `type_name`.
#[must_use]
pub fn annotated_with(type_name: impl Into<String>) -> Predicate {
    let type_name = type_name.into();
    let description = format!("annotated with @{}", simple_name_of(&type_name));
    Predicate::new(
        Matcher::AnnotatedWith {
            type_name,
            meta: false,
        },
        description,
    )
}

/// Elements annotated with `type_name` directly or through annotations on
/// their annotation types.
#[must_use]
pub fn meta_annotated_with(type_name: impl Into<String>) -> Predicate {
    let type_name = type_name.into();
    let description = format!("meta-annotated with @{}", simple_name_of(&type_name));
    Predicate::new(
        Matcher::AnnotatedWith {
            type_name,
            meta: true,
        },
        description,
    )
}

/// Elements carrying `modifier`.
#[must_use]
pub fn has_modifier(modifier: Modifier) -> Predicate {
    Predicate::new(
        Matcher::HasModifier(modifier),
        format!("have modifier {}", modifier.as_str()),
    )
}

/// Members of `kind`.
#[must_use]
pub fn member_kind(kind: MemberKind) -> Predicate {
    let noun = match kind {
        MemberKind::Field => "fields",
        MemberKind::Method => "methods",
        MemberKind::Constructor => "constructors",
        MemberKind::StaticInitializer => "static initializers",
    };
    Predicate::new(Matcher::IsMemberKind(kind), format!("are {noun}"))
}

/// Classes that satisfy `predicate` themselves or through any ancestor.
/// Descendants of a matching class match; its ancestors do not, unless
/// they match on their own.
#[must_use]
pub fn the_hierarchy_of_a_class_that(predicate: Predicate) -> Predicate {
    let description = format!("the hierarchy of a class that {}", predicate.description);
    Predicate::new(Matcher::HierarchyOf(Box::new(predicate)), description)
}

/// Classes named `type_name` or having it as an ancestor.
#[must_use]
pub fn assignable_to(type_name: impl Into<String>) -> Predicate {
    let type_name = type_name.into();
    let description = format!("assignable to {type_name}");
    the_hierarchy_of_a_class_that(named(type_name)).as_description(description)
}

/// Methods and constructors whose parameter types are exactly `types`.
#[must_use]
pub fn has_parameters<S: AsRef<str>>(types: &[S]) -> Predicate {
    let types: Vec<String> = types.iter().map(|t| t.as_ref().to_string()).collect();
    let listed: Vec<String> = types
        .iter()
        .map(|t| format!("{}.class", simple_name_of(t)))
        .collect();
    let description = format!("has parameters [{}]", listed.join(", "));
    Predicate::new(Matcher::HasParameters(types), description)
}

/// Accesses of `kind`.
#[must_use]
pub fn access_kind(kind: AccessKind) -> Predicate {
    Predicate::new(Matcher::IsAccessKind(kind), format!("access type {kind}"))
}

/// Members whose declaring class, or accesses whose target owner, satisfies
/// `predicate`.
#[must_use]
pub fn owner(predicate: Predicate) -> Predicate {
    let description = format!("owner {}", predicate.description);
    Predicate::new(Matcher::Owner(Box::new(predicate)), description)
}

/// Owner named exactly `type_name`.
#[must_use]
pub fn owner_is(type_name: impl Into<String>) -> Predicate {
    let type_name = type_name.into();
    let description = format!("owner is {type_name}");
    owner(named(type_name)).as_description(description)
}

/// Owner named `owner_name` and member named `name`.
#[must_use]
pub fn owner_and_name_are(owner_name: impl Into<String>, name: impl Into<String>) -> Predicate {
    owner_is(owner_name).and(name_is(name))
}

/// Accesses whose target owner resides in a package matching `pattern`.
///
/// # Errors
///
/// Returns an error if the pattern is invalid.
pub fn target_type_resides_in(pattern: &str) -> Result<Predicate, PredicateError> {
    Ok(owner(reside_in(pattern)?).as_description(format!("target type resides in '{pattern}'")))
}

/// Accesses whose target owner satisfies `predicate`.
#[must_use]
pub fn target_owner(predicate: Predicate) -> Predicate {
    let description = format!("target owner {}", predicate.description);
    owner(predicate).as_description(description)
}

/// Accesses performed by a class satisfying `predicate`.
#[must_use]
pub fn origin_class(predicate: Predicate) -> Predicate {
    let description = format!("origin class {}", predicate.description);
    Predicate::new(Matcher::OriginClass(Box::new(predicate)), description)
}

/// Stub classes.
#[must_use]
pub fn stub() -> Predicate {
    Predicate::new(Matcher::Stub, "are stubs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::raw::{
        AccessKind, Modifiers, RawAccess, RawClassDescriptor, RawField, RawMemberRef, RawMethod,
        RawOrigin,
    };

    fn graph() -> ClassGraph {
        let rule = RawClassDescriptor::new("a.anno.Rule").with_modifiers(
            [Modifier::Public, Modifier::Interface, Modifier::Annotation]
                .into_iter()
                .collect(),
        );
        let stereotype = RawClassDescriptor::new("a.anno.Service")
            .with_modifiers([Modifier::Interface, Modifier::Annotation].into_iter().collect())
            .with_annotation(Annotation::new("a.anno.Rule"));
        let parent = RawClassDescriptor::new("a.any.Parent");
        let child = RawClassDescriptor::new("a.any.Child")
            .with_super("a.any.Parent")
            .with_annotation(Annotation::new("a.anno.Rule"));
        let grandchild = RawClassDescriptor::new("a.other.GrandChild")
            .with_super("a.any.Child")
            .with_annotation(Annotation::new("a.anno.Service"))
            .with_field(RawField::new("out", "java.io.PrintStream"))
            .with_method(
                RawMethod::new("run", ["java.lang.Object", "java.lang.String"], "void")
                    .with_modifiers(Modifiers::empty().with(Modifier::Public)),
            )
            .with_access(
                RawAccess::to_member(
                    RawOrigin::Method(0),
                    AccessKind::FieldGet,
                    "java.lang.System",
                    RawMemberRef::Field {
                        name: "out".into(),
                        type_name: "java.io.PrintStream".into(),
                    },
                )
                .at_line(7),
            );
        GraphBuilder::new()
            .add_all([rule, stereotype, parent, child, grandchild])
            .build()
            .unwrap()
    }

    fn class<'g>(g: &'g ClassGraph, name: &str) -> Element<'g> {
        Element::Class(g.get(name).unwrap())
    }

    #[test]
    fn combinator_descriptions_compose() {
        let p = named("x");
        let q = reside_in("..any..").unwrap();
        assert_eq!(p.clone().and(q.clone()).description(), "named 'x' and reside in '..any..'");
        assert_eq!(or(p.clone(), q).description(), "named 'x' or reside in '..any..'");
        assert_eq!(not(p).description(), "not named 'x'");
    }

    #[test]
    fn negated_compositions_are_parenthesized() {
        let p = named("a.A").or(named("a.B"));
        assert_eq!(not(p.clone()).description(), "not (named 'a.A' or named 'a.B')");
        let q = p.clone().and(reside_in("..a..").unwrap());
        assert_eq!(
            (!q).description(),
            "not ((named 'a.A' or named 'a.B') and reside in '..a..')"
        );
        assert_eq!(
            not(p.as_description("is A or B")).description(),
            "not (is A or B)"
        );
        assert_eq!(not(not(named("x"))).description(), "not not named 'x'");
    }

    #[test]
    fn descriptions() {
        assert_eq!(annotated_with("a.anno.Rule").description(), "annotated with @Rule");
        assert_eq!(named("any").description(), "named 'any'");
        assert_eq!(
            the_hierarchy_of_a_class_that(anything().as_description("something")).description(),
            "the hierarchy of a class that something"
        );
        assert_eq!(owner_is("java.lang.System").description(), "owner is java.lang.System");
        assert_eq!(
            owner_and_name_are("java.lang.System", "out").description(),
            "owner is java.lang.System and name is 'out'"
        );
        assert_eq!(access_kind(AccessKind::FieldSet).description(), "access type FIELD_SET");
        assert_eq!(
            target_type_resides_in("..any..").unwrap().description(),
            "target type resides in '..any..'"
        );
        assert_eq!(
            has_parameters(&["java.lang.Object", "java.lang.String"]).description(),
            "has parameters [Object.class, String.class]"
        );
    }

    #[test]
    fn hierarchy_is_reflexive_and_follows_ancestors_only() {
        let g = graph();
        let p = the_hierarchy_of_a_class_that(named("a.any.Child"));
        assert!(p.test(&g, class(&g, "a.any.Child")));
        assert!(p.test(&g, class(&g, "a.other.GrandChild")));
        assert!(!p.test(&g, class(&g, "a.any.Parent")));
        assert!(assignable_to("a.any.Parent").test(&g, class(&g, "a.other.GrandChild")));
        assert!(!assignable_to("a.any.Child").test(&g, class(&g, "a.any.Parent")));
    }

    #[test]
    fn annotation_matching_is_direct_unless_meta_requested() {
        let g = graph();
        let direct = annotated_with("a.anno.Rule");
        let meta = meta_annotated_with("a.anno.Rule");
        assert!(direct.test(&g, class(&g, "a.any.Child")));
        assert!(!direct.test(&g, class(&g, "a.other.GrandChild")));
        assert!(meta.test(&g, class(&g, "a.other.GrandChild")));
        assert!(!meta.test(&g, class(&g, "a.any.Parent")));
    }

    #[test]
    fn package_matching() {
        let g = graph();
        let p = reside_in("..any..").unwrap();
        assert!(p.test(&g, class(&g, "a.any.Child")));
        assert!(!p.test(&g, class(&g, "a.other.GrandChild")));
        assert!(reside_in_any(&["a.anno", "a.other"]).unwrap().test(&g, class(&g, "a.anno.Rule")));
        assert!(reside_in("a...b").is_err());
    }

    #[test]
    fn parameter_lists_match_exactly() {
        let g = graph();
        let run = g.members().find(|m| m.name() == "run").unwrap();
        assert!(has_parameters(&["java.lang.Object", "java.lang.String"]).test(&g, Element::Member(run)));
        assert!(!has_parameters(&["java.lang.String", "java.lang.Object"]).test(&g, Element::Member(run)));
        assert!(!has_parameters(&["java.lang.Object"]).test(&g, Element::Member(run)));
        let field = g.members().find(|m| m.name() == "out").unwrap();
        assert!(!has_parameters::<&str>(&[]).test(&g, Element::Member(field)));
    }

    #[test]
    fn access_predicates() {
        let g = graph();
        let edge = g.edges().next().unwrap();
        let e = Element::Access(edge);
        assert!(access_kind(AccessKind::FieldGet).test(&g, e));
        assert!(!access_kind(AccessKind::FieldSet).test(&g, e));
        assert!(owner_and_name_are("java.lang.System", "out").test(&g, e));
        assert!(!owner_and_name_are("java.lang.System", "err").test(&g, e));
        assert!(origin_class(simple_name_is("GrandChild")).test(&g, e));
        assert!(target_owner(stub()).test(&g, e));
    }

    #[test]
    fn kinds_are_checked() {
        let g = graph();
        assert_eq!(access_kind(AccessKind::FieldGet).kinds(), KindSet::ACCESS);
        assert_eq!(
            simple_name_is("A").and(access_kind(AccessKind::FieldGet)).kinds(),
            KindSet::NONE
        );
        assert!(owner(access_kind(AccessKind::FieldGet)).kinds().is_empty());
        assert!(!access_kind(AccessKind::FieldGet).test(&g, class(&g, "a.any.Child")));
        assert!(!not(access_kind(AccessKind::FieldGet)).test(&g, class(&g, "a.any.Child")));
    }

    #[test]
    fn name_regex_is_anchored() {
        let g = graph();
        let p = name_matching(r"a\.any\..*").unwrap();
        assert!(p.test(&g, class(&g, "a.any.Child")));
        assert!(!name_matching("any").unwrap().test(&g, class(&g, "a.any.Child")));
        assert!(name_matching("(").is_err());
    }

    #[test]
    fn simple_name_and_modifiers() {
        let g = graph();
        assert!(simple_name_ending_with("Child").test(&g, class(&g, "a.other.GrandChild")));
        assert!(simple_name_starting_with("Grand").test(&g, class(&g, "a.other.GrandChild")));
        assert!(simple_name_containing("and").test(&g, class(&g, "a.other.GrandChild")));
        assert!(has_modifier(Modifier::Annotation).test(&g, class(&g, "a.anno.Rule")));
        let run = g.members().find(|m| m.name() == "run").unwrap();
        assert!(has_modifier(Modifier::Public).test(&g, Element::Member(run)));
        assert!(member_kind(MemberKind::Method).test(&g, Element::Member(run)));
        assert!(reside_in("a.other").unwrap().test(&g, Element::Member(run)));
    }
}
