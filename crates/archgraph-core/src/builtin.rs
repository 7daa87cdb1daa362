//! Built-in named predicates.
//!
//! The table is built once on first use and shared read-only afterwards.

use crate::predicate::{
    access_kind, anything, has_modifier, member_kind, stub, Predicate,
};
use crate::raw::{AccessKind, MemberKind, Modifier};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static TABLE: OnceLock<BTreeMap<&'static str, Predicate>> = OnceLock::new();

fn table() -> &'static BTreeMap<&'static str, Predicate> {
    TABLE.get_or_init(|| {
        let modifier = |m: Modifier, description: &str| has_modifier(m).as_description(description);
        let entries = [
            ("anything", anything()),
            ("public", modifier(Modifier::Public, "are public")),
            ("protected", modifier(Modifier::Protected, "are protected")),
            ("private", modifier(Modifier::Private, "are private")),
            ("static", modifier(Modifier::Static, "are static")),
            ("final", modifier(Modifier::Final, "are final")),
            ("abstract", modifier(Modifier::Abstract, "are abstract")),
            ("interfaces", modifier(Modifier::Interface, "are interfaces")),
            ("enums", modifier(Modifier::Enum, "are enums")),
            ("annotations", modifier(Modifier::Annotation, "are annotations")),
            ("synthetic", modifier(Modifier::Synthetic, "are synthetic")),
            ("stubs", stub()),
            ("imported", (!stub()).as_description("are imported")),
            ("fields", member_kind(MemberKind::Field)),
            ("methods", member_kind(MemberKind::Method)),
            ("constructors", member_kind(MemberKind::Constructor)),
            ("static-initializers", member_kind(MemberKind::StaticInitializer)),
            ("field-get", access_kind(AccessKind::FieldGet)),
            ("field-set", access_kind(AccessKind::FieldSet)),
            ("method-call", access_kind(AccessKind::MethodCall)),
            ("constructor-call", access_kind(AccessKind::ConstructorCall)),
            ("type-reference", access_kind(AccessKind::TypeReference)),
            ("annotation-value", access_kind(AccessKind::AnnotationValue)),
        ];
        entries.into_iter().collect()
    })
}

/// Looks up a built-in predicate by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Predicate> {
    table().get(name)
}

/// All built-in predicates, sorted by name.
pub fn all() -> impl Iterator<Item = (&'static str, &'static Predicate)> {
    table().iter().map(|(name, predicate)| (*name, predicate))
}
