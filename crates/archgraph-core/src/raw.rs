//! Raw class descriptors: the structural facts decoded from one artifact.
//!
//! A [`RawClassDescriptor`] is produced once per artifact by the
//! [`ArtifactReader`](crate::classfile::ArtifactReader) and consumed by the
//! [`GraphBuilder`](crate::graph::GraphBuilder). Nothing here refers to any
//! other artifact; every reference is a plain type name.

use serde::{Deserialize, Serialize};
use std::fmt;

// ────────────────────────────────────────────
// Access kinds
// ────────────────────────────────────────────

/// How a method body (or annotation) refers to another type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessKind {
    /// Field read (`getfield`, `getstatic`).
    FieldGet,
    /// Field write (`putfield`, `putstatic`).
    FieldSet,
    /// Method invocation.
    MethodCall,
    /// Constructor invocation (`invokespecial <init>`).
    ConstructorCall,
    /// Reference to a type without a member (`new`, casts, class literals, ...).
    TypeReference,
    /// Class or enum referenced from an annotation value.
    AnnotationValue,
}

impl AccessKind {
    /// All access kinds in declaration order.
    pub const ALL: [Self; 6] = [
        Self::FieldGet,
        Self::FieldSet,
        Self::MethodCall,
        Self::ConstructorCall,
        Self::TypeReference,
        Self::AnnotationValue,
    ];

    /// Canonical upper-case name (`FIELD_GET`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FieldGet => "FIELD_GET",
            Self::FieldSet => "FIELD_SET",
            Self::MethodCall => "METHOD_CALL",
            Self::ConstructorCall => "CONSTRUCTOR_CALL",
            Self::TypeReference => "TYPE_REFERENCE",
            Self::AnnotationValue => "ANNOTATION_VALUE",
        }
    }

    /// Parses a kind from `FIELD_GET`, `field-get` or `field_get`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }

    /// Verb used when describing an access of this kind.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::FieldGet => "gets field",
            Self::FieldSet => "sets field",
            Self::MethodCall => "calls method",
            Self::ConstructorCall => "calls constructor",
            Self::TypeReference => "references class",
            Self::AnnotationValue => "references class in annotation value",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────
// Modifiers
// ────────────────────────────────────────────

/// A single declaration modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
    /// `synchronized`
    Synchronized,
    /// `volatile`
    Volatile,
    /// `transient`
    Transient,
    /// `native`
    Native,
    /// Declared as an interface.
    Interface,
    /// Declared as an enum (or an enum constant field).
    Enum,
    /// Declared as an annotation type.
    Annotation,
    /// Compiler generated.
    Synthetic,
    /// Compiler generated bridge method.
    Bridge,
    /// Variable arity method.
    Varargs,
}

impl Modifier {
    /// Every modifier, in bit order.
    pub const ALL: [Self; 16] = [
        Self::Public,
        Self::Protected,
        Self::Private,
        Self::Static,
        Self::Final,
        Self::Abstract,
        Self::Synchronized,
        Self::Volatile,
        Self::Transient,
        Self::Native,
        Self::Interface,
        Self::Enum,
        Self::Annotation,
        Self::Synthetic,
        Self::Bridge,
        Self::Varargs,
    ];

    fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Upper-case name (`PUBLIC`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Protected => "PROTECTED",
            Self::Private => "PRIVATE",
            Self::Static => "STATIC",
            Self::Final => "FINAL",
            Self::Abstract => "ABSTRACT",
            Self::Synchronized => "SYNCHRONIZED",
            Self::Volatile => "VOLATILE",
            Self::Transient => "TRANSIENT",
            Self::Native => "NATIVE",
            Self::Interface => "INTERFACE",
            Self::Enum => "ENUM",
            Self::Annotation => "ANNOTATION",
            Self::Synthetic => "SYNTHETIC",
            Self::Bridge => "BRIDGE",
            Self::Varargs => "VARARGS",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Access flags shared by classes, fields and methods.
const ACC_PUBLIC: u16 = 0x0001;
const ACC_PRIVATE: u16 = 0x0002;
const ACC_PROTECTED: u16 = 0x0004;
const ACC_STATIC: u16 = 0x0008;
const ACC_FINAL: u16 = 0x0010;
const ACC_SYNCHRONIZED: u16 = 0x0020;
const ACC_VOLATILE_OR_BRIDGE: u16 = 0x0040;
const ACC_TRANSIENT_OR_VARARGS: u16 = 0x0080;
const ACC_NATIVE: u16 = 0x0100;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;
const ACC_SYNTHETIC: u16 = 0x1000;
const ACC_ANNOTATION: u16 = 0x2000;
const ACC_ENUM: u16 = 0x4000;

/// A set of [`Modifier`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u32);

impl Modifiers {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy with `modifier` added.
    #[must_use]
    pub fn with(self, modifier: Modifier) -> Self {
        Self(self.0 | modifier.bit())
    }

    /// Tests membership.
    #[must_use]
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns true if no modifier is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained modifiers in bit order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// Decodes class-level access flags.
    #[must_use]
    pub fn from_class_flags(flags: u16) -> Self {
        Self::decode(
            flags,
            &[
                (ACC_PUBLIC, Modifier::Public),
                (ACC_FINAL, Modifier::Final),
                (ACC_INTERFACE, Modifier::Interface),
                (ACC_ABSTRACT, Modifier::Abstract),
                (ACC_SYNTHETIC, Modifier::Synthetic),
                (ACC_ANNOTATION, Modifier::Annotation),
                (ACC_ENUM, Modifier::Enum),
            ],
        )
    }

    /// Decodes field access flags.
    #[must_use]
    pub fn from_field_flags(flags: u16) -> Self {
        Self::decode(
            flags,
            &[
                (ACC_PUBLIC, Modifier::Public),
                (ACC_PRIVATE, Modifier::Private),
                (ACC_PROTECTED, Modifier::Protected),
                (ACC_STATIC, Modifier::Static),
                (ACC_FINAL, Modifier::Final),
                (ACC_VOLATILE_OR_BRIDGE, Modifier::Volatile),
                (ACC_TRANSIENT_OR_VARARGS, Modifier::Transient),
                (ACC_SYNTHETIC, Modifier::Synthetic),
                (ACC_ENUM, Modifier::Enum),
            ],
        )
    }

    /// Decodes method access flags.
    #[must_use]
    pub fn from_method_flags(flags: u16) -> Self {
        Self::decode(
            flags,
            &[
                (ACC_PUBLIC, Modifier::Public),
                (ACC_PRIVATE, Modifier::Private),
                (ACC_PROTECTED, Modifier::Protected),
                (ACC_STATIC, Modifier::Static),
                (ACC_FINAL, Modifier::Final),
                (ACC_SYNCHRONIZED, Modifier::Synchronized),
                (ACC_VOLATILE_OR_BRIDGE, Modifier::Bridge),
                (ACC_TRANSIENT_OR_VARARGS, Modifier::Varargs),
                (ACC_NATIVE, Modifier::Native),
                (ACC_ABSTRACT, Modifier::Abstract),
                (ACC_SYNTHETIC, Modifier::Synthetic),
            ],
        )
    }

    fn decode(flags: u16, table: &[(u16, Modifier)]) -> Self {
        table
            .iter()
            .filter(|(flag, _)| flags & flag != 0)
            .map(|(_, m)| *m)
            .collect()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Modifier::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

// ────────────────────────────────────────────
// Annotations
// ────────────────────────────────────────────

/// An annotation usage: the annotation type plus its explicit element values.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Fully qualified annotation type name.
    pub type_name: String,
    /// Element name / value pairs in declaration order.
    pub values: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    /// Creates an annotation usage without element values.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: Vec::new(),
        }
    }

    /// Adds an element value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.push((name.into(), value));
        self
    }

    /// Looks up an element value by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Collects the types referenced by the element values (class literals,
    /// enum types and nested annotation types), in encounter order.
    #[must_use]
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for (_, value) in &self.values {
            value.collect_types(&mut out);
        }
        out
    }
}

/// A literal or reference value of an annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// `boolean`
    Boolean(bool),
    /// `char`
    Char(char),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `String`
    String(String),
    /// Enum constant.
    Enum {
        /// Enum type name.
        type_name: String,
        /// Constant name.
        constant: String,
    },
    /// Class literal (type name, possibly primitive or array).
    Class(String),
    /// Nested annotation.
    Annotation(Box<Annotation>),
    /// Array of values.
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    fn collect_types<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Enum { type_name, .. } => out.push(type_name),
            Self::Class(name) => out.push(name),
            Self::Annotation(nested) => {
                out.push(&nested.type_name);
                for (_, value) in &nested.values {
                    value.collect_types(out);
                }
            }
            Self::Array(values) => {
                for value in values {
                    value.collect_types(out);
                }
            }
            _ => {}
        }
    }
}

// ────────────────────────────────────────────
// Members
// ────────────────────────────────────────────

/// Kind of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A field.
    Field,
    /// A method.
    Method,
    /// A constructor (`<init>`).
    Constructor,
    /// The static initializer (`<clinit>`).
    StaticInitializer,
}

impl MemberKind {
    /// Classifies a method by its name.
    #[must_use]
    pub fn of_method(name: &str) -> Self {
        match name {
            CONSTRUCTOR_NAME => Self::Constructor,
            STATIC_INITIALIZER_NAME => Self::StaticInitializer,
            _ => Self::Method,
        }
    }

    /// Capitalized label used in violation text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::Method => "Method",
            Self::Constructor => "Constructor",
            Self::StaticInitializer => "Static Initializer",
        }
    }
}

/// JVM name of constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";
/// JVM name of static initializers.
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// Field name.
    pub name: String,
    /// Field type name.
    pub type_name: String,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Annotation usages.
    pub annotations: Vec<Annotation>,
}

impl RawField {
    /// Creates a field declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
        }
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds an annotation usage.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A declared method, constructor or static initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMethod {
    /// JVM name (`<init>` for constructors).
    pub name: String,
    /// Parameter type names in order.
    pub parameter_types: Vec<String>,
    /// Return type name (`void` for constructors).
    pub return_type: String,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Annotation usages.
    pub annotations: Vec<Annotation>,
    /// Declared thrown types.
    pub throws: Vec<String>,
}

impl RawMethod {
    /// Creates a method declaration.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, parameter_types: I, return_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            return_type: return_type.into(),
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            throws: Vec::new(),
        }
    }

    /// Creates a constructor declaration.
    #[must_use]
    pub fn constructor<I, S>(parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CONSTRUCTOR_NAME, parameter_types, "void")
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds an annotation usage.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a declared thrown type.
    #[must_use]
    pub fn with_throws(mut self, type_name: impl Into<String>) -> Self {
        self.throws.push(type_name.into());
        self
    }

    /// Kind derived from the JVM name.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        MemberKind::of_method(&self.name)
    }
}

// ────────────────────────────────────────────
// Accesses
// ────────────────────────────────────────────

/// Where a raw access originates within its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawOrigin {
    /// The class itself (class-level annotation values).
    Class,
    /// Index into [`RawClassDescriptor::fields`].
    Field(usize),
    /// Index into [`RawClassDescriptor::methods`].
    Method(usize),
}

/// The member targeted by an access, as named at the access site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawMemberRef {
    /// A field with its type name.
    Field {
        /// Field name.
        name: String,
        /// Field type name.
        type_name: String,
    },
    /// A method or constructor with its signature.
    Method {
        /// JVM method name.
        name: String,
        /// Parameter type names.
        parameter_types: Vec<String>,
        /// Return type name.
        return_type: String,
    },
}

impl RawMemberRef {
    /// The referenced member's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field { name, .. } | Self::Method { name, .. } => name,
        }
    }
}

/// One reference from a method body (or annotation) to another type or member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawAccess {
    /// Originating member within the owning descriptor.
    pub origin: RawOrigin,
    /// Type that owns the target, as named at the access site.
    pub target_owner: String,
    /// Targeted member, absent for pure type references.
    pub target_member: Option<RawMemberRef>,
    /// How the target is referenced.
    pub kind: AccessKind,
    /// Source line, when line information is present.
    pub line: Option<u32>,
}

impl RawAccess {
    /// Creates a type-level access (no member).
    #[must_use]
    pub fn to_type(origin: RawOrigin, kind: AccessKind, target_owner: impl Into<String>) -> Self {
        Self {
            origin,
            target_owner: target_owner.into(),
            target_member: None,
            kind,
            line: None,
        }
    }

    /// Creates a member access.
    #[must_use]
    pub fn to_member(
        origin: RawOrigin,
        kind: AccessKind,
        target_owner: impl Into<String>,
        member: RawMemberRef,
    ) -> Self {
        Self {
            origin,
            target_owner: target_owner.into(),
            target_member: Some(member),
            kind,
            line: None,
        }
    }

    /// Sets the source line.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

// ────────────────────────────────────────────
// Descriptor
// ────────────────────────────────────────────

/// Structural facts about one class, decoded from one artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct RawClassDescriptor {
    /// Fully qualified class name.
    pub name: String,
    /// Superclass name; absent for `java.lang.Object` and module infos.
    pub super_name: Option<String>,
    /// Implemented interfaces, ordered and without duplicates.
    pub interfaces: Vec<String>,
    /// Class modifiers.
    pub modifiers: Modifiers,
    /// Class-level annotation usages.
    pub annotations: Vec<Annotation>,
    /// Declared fields.
    pub fields: Vec<RawField>,
    /// Declared methods, constructors and static initializer.
    pub methods: Vec<RawMethod>,
    /// Accesses performed by method bodies and annotation values.
    pub accesses: Vec<RawAccess>,
    /// Source file name recorded by the compiler.
    pub source_file: Option<String>,
}

impl RawClassDescriptor {
    /// Creates an empty descriptor for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: None,
            interfaces: Vec::new(),
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            accesses: Vec::new(),
            source_file: None,
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn with_super(mut self, name: impl Into<String>) -> Self {
        self.super_name = Some(name.into());
        self
    }

    /// Adds an interface, ignoring duplicates.
    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.interfaces.contains(&name) {
            self.interfaces.push(name);
        }
        self
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds a class-level annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: RawMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds an access.
    #[must_use]
    pub fn with_access(mut self, access: RawAccess) -> Self {
        self.accesses.push(access);
        self
    }

    /// Sets the source file name.
    #[must_use]
    pub fn with_source_file(mut self, file: impl Into<String>) -> Self {
        self.source_file = Some(file.into());
        self
    }

    /// Every type name this descriptor refers to, excluding itself.
    ///
    /// Array and primitive names are reduced to the classes they mention.
    #[must_use]
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        names.extend(self.super_name.as_deref());
        names.extend(self.interfaces.iter().map(String::as_str));
        let annotations = self
            .annotations
            .iter()
            .chain(self.fields.iter().flat_map(|f| &f.annotations))
            .chain(self.methods.iter().flat_map(|m| &m.annotations));
        for annotation in annotations {
            names.push(&annotation.type_name);
            names.extend(annotation.referenced_types());
        }
        for field in &self.fields {
            names.push(&field.type_name);
        }
        for method in &self.methods {
            names.extend(method.parameter_types.iter().map(String::as_str));
            names.push(&method.return_type);
            names.extend(method.throws.iter().map(String::as_str));
        }
        for access in &self.accesses {
            names.push(&access.target_owner);
        }
        names
            .into_iter()
            .filter_map(crate::names::referenced_class)
            .filter(|n| *n != self.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_kind_parses_all_spellings() {
        assert_eq!(AccessKind::from_name("FIELD_GET"), Some(AccessKind::FieldGet));
        assert_eq!(AccessKind::from_name("method-call"), Some(AccessKind::MethodCall));
        assert_eq!(
            AccessKind::from_name("constructor_call"),
            Some(AccessKind::ConstructorCall)
        );
        assert_eq!(AccessKind::from_name("jump"), None);
    }

    #[test]
    fn method_flags_distinguish_bridge_from_volatile() {
        let method = Modifiers::from_method_flags(0x0041);
        assert!(method.contains(Modifier::Public));
        assert!(method.contains(Modifier::Bridge));
        assert!(!method.contains(Modifier::Volatile));

        let field = Modifiers::from_field_flags(0x0041);
        assert!(field.contains(Modifier::Volatile));
        assert!(!field.contains(Modifier::Bridge));
    }

    #[test]
    fn class_flags_ignore_super_bit() {
        let m = Modifiers::from_class_flags(0x0621);
        assert_eq!(
            m.iter().collect::<Vec<_>>(),
            vec![Modifier::Public, Modifier::Abstract, Modifier::Interface]
                .into_iter()
                .collect::<Modifiers>()
                .iter()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn annotation_referenced_types_include_nested_values() {
        let annotation = Annotation::new("a.Marker")
            .with_value("type", AnnotationValue::Class("b.Target".into()))
            .with_value(
                "nested",
                AnnotationValue::Array(vec![AnnotationValue::Annotation(Box::new(
                    Annotation::new("c.Inner").with_value(
                        "level",
                        AnnotationValue::Enum {
                            type_name: "d.Level".into(),
                            constant: "HIGH".into(),
                        },
                    ),
                ))]),
            );
        assert_eq!(annotation.referenced_types(), vec!["b.Target", "c.Inner", "d.Level"]);
    }

    #[test]
    fn descriptor_referenced_types_skip_primitives_and_self() {
        let descriptor = RawClassDescriptor::new("a.A")
            .with_super("a.Base")
            .with_field(RawField::new("count", "int"))
            .with_field(RawField::new("names", "java.lang.String[]"))
            .with_method(RawMethod::new("self", ["a.A"], "void"));
        assert_eq!(
            descriptor.referenced_types(),
            vec!["a.Base", "java.lang.String"]
        );
    }

    #[test]
    fn with_interface_keeps_order_and_dedups() {
        let d = RawClassDescriptor::new("a.A")
            .with_interface("x.I")
            .with_interface("x.J")
            .with_interface("x.I");
        assert_eq!(d.interfaces, vec!["x.I".to_string(), "x.J".to_string()]);
    }
}
