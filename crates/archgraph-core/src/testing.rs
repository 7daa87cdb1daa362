//! A small class-file assembler for fixtures.
//!
//! Produces real class-file bytes so that tests can exercise the reader,
//! the graph builder and the rule engines end to end without a compiler.
//! Type names are written in binary form (`com.example.Foo`, `int[]`);
//! member descriptors use JVM syntax (`(ILjava/lang/String;)V`), for which
//! [`field_descriptor`] and [`method_descriptor`] can help.
//!
//! ```
//! use archgraph_core::testing::{ClassFileBuilder, Insn, MethodSpec};
//!
//! let bytes = ClassFileBuilder::new("report.ReportService")
//!     .source_file("ReportService.java")
//!     .method(
//!         MethodSpec::new("report", "()V")
//!             .insn(Insn::Line(10))
//!             .insn(Insn::InvokeVirtual {
//!                 owner: "importer.ImportService".into(),
//!                 name: "importAll".into(),
//!                 descriptor: "()V".into(),
//!             })
//!             .insn(Insn::Return),
//!     )
//!     .build();
//! assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

use crate::names::{element_type, is_primitive};
use std::collections::HashMap;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const DEFAULT_MAJOR: u16 = 52;

/// Returns the JVM descriptor of a binary type name (`int[]` → `[I`).
#[must_use]
pub fn field_descriptor(type_name: &str) -> String {
    let element = element_type(type_name);
    let dims = (type_name.len() - element.len()) / 2;
    let base = match element {
        "boolean" => "Z".to_string(),
        "byte" => "B".to_string(),
        "char" => "C".to_string(),
        "short" => "S".to_string(),
        "int" => "I".to_string(),
        "long" => "J".to_string(),
        "float" => "F".to_string(),
        "double" => "D".to_string(),
        "void" => "V".to_string(),
        other => format!("L{};", other.replace('.', "/")),
    };
    "[".repeat(dims) + &base
}

/// Returns the JVM descriptor of a method signature.
#[must_use]
pub fn method_descriptor(parameter_types: &[&str], return_type: &str) -> String {
    let params: String = parameter_types.iter().map(|p| field_descriptor(p)).collect();
    format!("({params}){}", field_descriptor(return_type))
}

/// Name stored in a `Class` constant: internal name, or a descriptor for
/// array types.
fn class_constant_name(type_name: &str) -> String {
    if type_name.ends_with("[]") || is_primitive(type_name) {
        field_descriptor(type_name)
    } else {
        type_name.replace('.', "/")
    }
}

fn len_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn len_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ────────────────────────────────────────────
// Specs
// ────────────────────────────────────────────

/// One bytecode instruction (or pseudo-instruction) of a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insn {
    /// `getfield owner.name:descriptor`
    GetField {
        /// Owner type.
        owner: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// `putfield`
    PutField {
        /// Owner type.
        owner: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// `getstatic`
    GetStatic {
        /// Owner type.
        owner: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// `putstatic`
    PutStatic {
        /// Owner type.
        owner: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// `invokevirtual`
    InvokeVirtual {
        /// Owner type.
        owner: String,
        /// Method name.
        name: String,
        /// Method descriptor.
        descriptor: String,
    },
    /// `invokespecial` (constructors use the name `<init>`)
    InvokeSpecial {
        /// Owner type.
        owner: String,
        /// Method name.
        name: String,
        /// Method descriptor.
        descriptor: String,
    },
    /// `invokestatic`
    InvokeStatic {
        /// Owner type.
        owner: String,
        /// Method name.
        name: String,
        /// Method descriptor.
        descriptor: String,
    },
    /// `invokeinterface`
    InvokeInterface {
        /// Owner type.
        owner: String,
        /// Method name.
        name: String,
        /// Method descriptor.
        descriptor: String,
    },
    /// `new`
    New(String),
    /// `anewarray`
    ANewArray(String),
    /// `checkcast`
    CheckCast(String),
    /// `instanceof`
    InstanceOf(String),
    /// `ldc` / `ldc_w` of a class literal.
    LdcClass(String),
    /// `tableswitch` with all targets at offset 0.
    TableSwitch {
        /// Lowest key.
        low: i32,
        /// Highest key.
        high: i32,
    },
    /// `nop`
    Nop,
    /// `return`
    Return,
    /// Marks the start of a source line at the current offset.
    Line(u16),
    /// Raw bytes copied into the code array.
    Raw(Vec<u8>),
}

impl Insn {
    /// `invokespecial owner.<init>(params)V`
    #[must_use]
    pub fn constructor_call(owner: &str, parameter_types: &[&str]) -> Self {
        Self::InvokeSpecial {
            owner: owner.to_string(),
            name: "<init>".to_string(),
            descriptor: method_descriptor(parameter_types, "void"),
        }
    }

    /// `invokevirtual owner.name()V`
    #[must_use]
    pub fn call(owner: &str, name: &str) -> Self {
        Self::InvokeVirtual {
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: "()V".to_string(),
        }
    }
}

/// An annotation element value.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `boolean`
    Boolean(bool),
    /// `String`
    String(String),
    /// Enum constant.
    Enum {
        /// Enum type name.
        type_name: String,
        /// Constant name.
        constant: String,
    },
    /// Class literal.
    Class(String),
    /// Nested annotation.
    Annotation(AnnotationSpec),
    /// Array of values.
    Array(Vec<ElementSpec>),
}

/// An annotation usage.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSpec {
    type_name: String,
    elements: Vec<(String, ElementSpec)>,
}

impl AnnotationSpec {
    /// Creates a usage of annotation `type_name`.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            elements: Vec::new(),
        }
    }

    /// Adds an element value.
    #[must_use]
    pub fn element(mut self, name: impl Into<String>, value: ElementSpec) -> Self {
        self.elements.push((name.into(), value));
        self
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    type_name: String,
    access: u16,
    annotations: Vec<AnnotationSpec>,
}

impl FieldSpec {
    /// Creates a private field of the given binary type name.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            access: 0x0002,
            annotations: Vec::new(),
        }
    }

    /// Sets raw access flags.
    #[must_use]
    pub fn access(mut self, flags: u16) -> Self {
        self.access = flags;
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A method declaration with an optional body.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    name: String,
    descriptor: String,
    access: u16,
    annotations: Vec<AnnotationSpec>,
    throws: Vec<String>,
    catches: Vec<String>,
    code: Option<Vec<Insn>>,
}

impl MethodSpec {
    /// Creates a public method with a JVM descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access: ACC_PUBLIC,
            annotations: Vec::new(),
            throws: Vec::new(),
            catches: Vec::new(),
            code: None,
        }
    }

    /// Creates a public method from binary type names.
    #[must_use]
    pub fn with_signature(name: impl Into<String>, parameter_types: &[&str], return_type: &str) -> Self {
        Self::new(name, method_descriptor(parameter_types, return_type))
    }

    /// Creates a public constructor.
    #[must_use]
    pub fn constructor(parameter_types: &[&str]) -> Self {
        Self::with_signature("<init>", parameter_types, "void")
    }

    /// Sets raw access flags.
    #[must_use]
    pub fn access(mut self, flags: u16) -> Self {
        self.access = flags;
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declares a thrown type (`Exceptions` attribute).
    #[must_use]
    pub fn throws(mut self, type_name: impl Into<String>) -> Self {
        self.throws.push(type_name.into());
        self
    }

    /// Adds an exception handler covering the whole body.
    #[must_use]
    pub fn catches(mut self, type_name: impl Into<String>) -> Self {
        self.catches.push(type_name.into());
        self.code.get_or_insert_with(Vec::new);
        self
    }

    /// Appends an instruction; the method gets a `Code` attribute.
    #[must_use]
    pub fn insn(mut self, insn: Insn) -> Self {
        self.code.get_or_insert_with(Vec::new).push(insn);
        self
    }
}

// ────────────────────────────────────────────
// Constant pool
// ────────────────────────────────────────────

#[derive(Debug, Default)]
struct PoolBuilder {
    bytes: Vec<u8>,
    next: u16,
    known: HashMap<Vec<u8>, u16>,
}

impl PoolBuilder {
    fn new() -> Self {
        Self {
            next: 1,
            ..Self::default()
        }
    }

    fn entry(&mut self, encoded: Vec<u8>, slots: u16) -> u16 {
        if let Some(index) = self.known.get(&encoded) {
            return *index;
        }
        let index = self.next;
        self.bytes.extend_from_slice(&encoded);
        self.known.insert(encoded, index);
        self.next += slots;
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        let mut encoded = vec![1];
        encoded.extend_from_slice(&len_u16(value.len()).to_be_bytes());
        encoded.extend_from_slice(value.as_bytes());
        self.entry(encoded, 1)
    }

    fn indexed(&mut self, tag: u8, indices: &[u16]) -> u16 {
        let mut encoded = vec![tag];
        for index in indices {
            encoded.extend_from_slice(&index.to_be_bytes());
        }
        self.entry(encoded, 1)
    }

    fn class(&mut self, type_name: &str) -> u16 {
        let name = self.utf8(&class_constant_name(type_name));
        self.indexed(7, &[name])
    }

    fn integer(&mut self, value: i32) -> u16 {
        let mut encoded = vec![3];
        encoded.extend_from_slice(&value.to_be_bytes());
        self.entry(encoded, 1)
    }

    fn long(&mut self, value: i64) -> u16 {
        let mut encoded = vec![5];
        encoded.extend_from_slice(&value.to_be_bytes());
        self.entry(encoded, 2)
    }

    fn member(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class = self.class(owner);
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let nat = self.indexed(12, &[name, descriptor]);
        self.indexed(tag, &[class, nat])
    }
}

// ────────────────────────────────────────────
// Class builder
// ────────────────────────────────────────────

/// Assembles a class file.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    access: u16,
    major: u16,
    source_file: Option<String>,
    annotations: Vec<AnnotationSpec>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
}

impl ClassFileBuilder {
    /// Starts a public class extending `java.lang.Object`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            access: ACC_PUBLIC | ACC_SUPER,
            major: DEFAULT_MAJOR,
            source_file: None,
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        self.super_name = Some(name.into());
        self
    }

    /// Removes the superclass (as for `java.lang.Object` itself).
    #[must_use]
    pub fn no_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    /// Sets raw class access flags.
    #[must_use]
    pub fn access(mut self, flags: u16) -> Self {
        self.access = flags;
        self
    }

    /// Sets the major version.
    #[must_use]
    pub fn version(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    /// Records a `SourceFile` attribute.
    #[must_use]
    pub fn source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = Some(name.into());
        self
    }

    /// Adds a class-level annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Produces the class-file bytes.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolBuilder::new();
        let mut body = Vec::new();

        body.extend_from_slice(&self.access.to_be_bytes());
        body.extend_from_slice(&pool.class(&self.name).to_be_bytes());
        let super_index = self.super_name.as_deref().map_or(0, |s| pool.class(s));
        body.extend_from_slice(&super_index.to_be_bytes());
        body.extend_from_slice(&len_u16(self.interfaces.len()).to_be_bytes());
        for interface in &self.interfaces {
            body.extend_from_slice(&pool.class(interface).to_be_bytes());
        }

        body.extend_from_slice(&len_u16(self.fields.len()).to_be_bytes());
        for field in &self.fields {
            body.extend_from_slice(&field.access.to_be_bytes());
            body.extend_from_slice(&pool.utf8(&field.name).to_be_bytes());
            body.extend_from_slice(&pool.utf8(&field_descriptor(&field.type_name)).to_be_bytes());
            let attrs = annotations_attribute(&mut pool, &field.annotations)
                .into_iter()
                .collect::<Vec<_>>();
            write_attributes(&mut body, &attrs);
        }

        body.extend_from_slice(&len_u16(self.methods.len()).to_be_bytes());
        for method in &self.methods {
            body.extend_from_slice(&method.access.to_be_bytes());
            body.extend_from_slice(&pool.utf8(&method.name).to_be_bytes());
            body.extend_from_slice(&pool.utf8(&method.descriptor).to_be_bytes());
            let mut attrs = Vec::new();
            if let Some(code) = &method.code {
                attrs.push(code_attribute(&mut pool, code, &method.catches));
            }
            if !method.throws.is_empty() {
                let mut exceptions = len_u16(method.throws.len()).to_be_bytes().to_vec();
                for thrown in &method.throws {
                    exceptions.extend_from_slice(&pool.class(thrown).to_be_bytes());
                }
                attrs.push(attribute(&mut pool, "Exceptions", &exceptions));
            }
            attrs.extend(annotations_attribute(&mut pool, &method.annotations));
            write_attributes(&mut body, &attrs);
        }

        let mut attrs = Vec::new();
        if let Some(source) = &self.source_file {
            let index = pool.utf8(source);
            attrs.push(attribute(&mut pool, "SourceFile", &index.to_be_bytes()));
        }
        attrs.extend(annotations_attribute(&mut pool, &self.annotations));
        write_attributes(&mut body, &attrs);

        let mut out = Vec::with_capacity(body.len() + pool.bytes.len() + 10);
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&self.major.to_be_bytes());
        out.extend_from_slice(&pool.next.to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

fn attribute(pool: &mut PoolBuilder, name: &str, body: &[u8]) -> Vec<u8> {
    let mut out = pool.utf8(name).to_be_bytes().to_vec();
    out.extend_from_slice(&len_u32(body.len()).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn write_attributes(out: &mut Vec<u8>, attrs: &[Vec<u8>]) {
    out.extend_from_slice(&len_u16(attrs.len()).to_be_bytes());
    for attr in attrs {
        out.extend_from_slice(attr);
    }
}

fn annotations_attribute(pool: &mut PoolBuilder, annotations: &[AnnotationSpec]) -> Option<Vec<u8>> {
    if annotations.is_empty() {
        return None;
    }
    let mut body = len_u16(annotations.len()).to_be_bytes().to_vec();
    for annotation in annotations {
        encode_annotation(pool, annotation, &mut body);
    }
    Some(attribute(pool, "RuntimeVisibleAnnotations", &body))
}

fn encode_annotation(pool: &mut PoolBuilder, annotation: &AnnotationSpec, out: &mut Vec<u8>) {
    out.extend_from_slice(&pool.utf8(&field_descriptor(&annotation.type_name)).to_be_bytes());
    out.extend_from_slice(&len_u16(annotation.elements.len()).to_be_bytes());
    for (name, value) in &annotation.elements {
        out.extend_from_slice(&pool.utf8(name).to_be_bytes());
        encode_element(pool, value, out);
    }
}

fn encode_element(pool: &mut PoolBuilder, value: &ElementSpec, out: &mut Vec<u8>) {
    match value {
        ElementSpec::Int(v) => {
            out.push(b'I');
            out.extend_from_slice(&pool.integer(*v).to_be_bytes());
        }
        ElementSpec::Long(v) => {
            out.push(b'J');
            out.extend_from_slice(&pool.long(*v).to_be_bytes());
        }
        ElementSpec::Boolean(v) => {
            out.push(b'Z');
            out.extend_from_slice(&pool.integer(i32::from(*v)).to_be_bytes());
        }
        ElementSpec::String(v) => {
            out.push(b's');
            out.extend_from_slice(&pool.utf8(v).to_be_bytes());
        }
        ElementSpec::Enum {
            type_name,
            constant,
        } => {
            out.push(b'e');
            out.extend_from_slice(&pool.utf8(&field_descriptor(type_name)).to_be_bytes());
            out.extend_from_slice(&pool.utf8(constant).to_be_bytes());
        }
        ElementSpec::Class(type_name) => {
            out.push(b'c');
            out.extend_from_slice(&pool.utf8(&field_descriptor(type_name)).to_be_bytes());
        }
        ElementSpec::Annotation(nested) => {
            out.push(b'@');
            encode_annotation(pool, nested, out);
        }
        ElementSpec::Array(values) => {
            out.push(b'[');
            out.extend_from_slice(&len_u16(values.len()).to_be_bytes());
            for v in values {
                encode_element(pool, v, out);
            }
        }
    }
}

fn code_attribute(pool: &mut PoolBuilder, insns: &[Insn], catches: &[String]) -> Vec<u8> {
    let mut code: Vec<u8> = Vec::new();
    let mut lines: Vec<(u16, u16)> = Vec::new();

    for insn in insns {
        let pc = code.len();
        match insn {
            Insn::GetField { owner, name, descriptor } => {
                member_insn(&mut code, 0xb4, pool.member(9, owner, name, descriptor));
            }
            Insn::PutField { owner, name, descriptor } => {
                member_insn(&mut code, 0xb5, pool.member(9, owner, name, descriptor));
            }
            Insn::GetStatic { owner, name, descriptor } => {
                member_insn(&mut code, 0xb2, pool.member(9, owner, name, descriptor));
            }
            Insn::PutStatic { owner, name, descriptor } => {
                member_insn(&mut code, 0xb3, pool.member(9, owner, name, descriptor));
            }
            Insn::InvokeVirtual { owner, name, descriptor } => {
                member_insn(&mut code, 0xb6, pool.member(10, owner, name, descriptor));
            }
            Insn::InvokeSpecial { owner, name, descriptor } => {
                member_insn(&mut code, 0xb7, pool.member(10, owner, name, descriptor));
            }
            Insn::InvokeStatic { owner, name, descriptor } => {
                member_insn(&mut code, 0xb8, pool.member(10, owner, name, descriptor));
            }
            Insn::InvokeInterface { owner, name, descriptor } => {
                member_insn(&mut code, 0xb9, pool.member(11, owner, name, descriptor));
                code.extend_from_slice(&[1, 0]);
            }
            Insn::New(t) => member_insn(&mut code, 0xbb, pool.class(t)),
            Insn::ANewArray(t) => member_insn(&mut code, 0xbd, pool.class(t)),
            Insn::CheckCast(t) => member_insn(&mut code, 0xc0, pool.class(t)),
            Insn::InstanceOf(t) => member_insn(&mut code, 0xc1, pool.class(t)),
            Insn::LdcClass(t) => {
                let index = pool.class(t);
                match u8::try_from(index) {
                    Ok(small) => code.extend_from_slice(&[0x12, small]),
                    Err(_) => member_insn(&mut code, 0x13, index),
                }
            }
            Insn::TableSwitch { low, high } => {
                code.push(0xaa);
                while code.len() % 4 != 0 {
                    code.push(0);
                }
                code.extend_from_slice(&0i32.to_be_bytes());
                code.extend_from_slice(&low.to_be_bytes());
                code.extend_from_slice(&high.to_be_bytes());
                let count = i64::from(*high) - i64::from(*low) + 1;
                for _ in 0..count.max(0) {
                    code.extend_from_slice(&0i32.to_be_bytes());
                }
            }
            Insn::Nop => code.push(0x00),
            Insn::Return => code.push(0xb1),
            Insn::Line(line) => lines.push((len_u16(pc), *line)),
            Insn::Raw(bytes) => code.extend_from_slice(bytes),
        }
    }

    let mut body = Vec::new();
    body.extend_from_slice(&8u16.to_be_bytes());
    body.extend_from_slice(&8u16.to_be_bytes());
    body.extend_from_slice(&len_u32(code.len()).to_be_bytes());
    body.extend_from_slice(&code);

    body.extend_from_slice(&len_u16(catches.len()).to_be_bytes());
    for catch in catches {
        body.extend_from_slice(&0u16.to_be_bytes());
        body.extend_from_slice(&len_u16(code.len()).to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes());
        body.extend_from_slice(&pool.class(catch).to_be_bytes());
    }

    let mut attrs = Vec::new();
    if !lines.is_empty() {
        let mut table = len_u16(lines.len()).to_be_bytes().to_vec();
        for (pc, line) in &lines {
            table.extend_from_slice(&pc.to_be_bytes());
            table.extend_from_slice(&line.to_be_bytes());
        }
        attrs.push(attribute(pool, "LineNumberTable", &table));
    }
    write_attributes(&mut body, &attrs);

    attribute(pool, "Code", &body)
}

fn member_insn(code: &mut Vec<u8>, opcode: u8, index: u16) {
    code.push(opcode);
    code.extend_from_slice(&index.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors() {
        assert_eq!(field_descriptor("int"), "I");
        assert_eq!(field_descriptor("java.lang.String[][]"), "[[Ljava/lang/String;");
        assert_eq!(
            method_descriptor(&["int", "a.B"], "void"),
            "(ILa/B;)V"
        );
        assert_eq!(class_constant_name("a.B"), "a/B");
        assert_eq!(class_constant_name("a.B[]"), "[La/B;");
    }

    #[test]
    fn pool_deduplicates_entries() {
        let mut pool = PoolBuilder::new();
        let a = pool.class("a.A");
        let b = pool.class("a.A");
        assert_eq!(a, b);
        assert_eq!(pool.next, 3);
        let long = pool.long(1);
        assert_eq!(pool.next, long + 2);
    }
}
