//! JVM class-file decoding.
//!
//! [`ArtifactReader`] turns the bytes of one compiled class into a
//! [`RawClassDescriptor`]. It never looks at other artifacts: every
//! reference is recorded by name and left for the
//! [`GraphBuilder`](crate::graph::GraphBuilder) to resolve.
//!
//! ## Example
//!
//! ```
//! use archgraph_core::classfile::ArtifactReader;
//! use archgraph_core::testing::ClassFileBuilder;
//!
//! let bytes = ClassFileBuilder::new("com.example.Foo").build();
//! let descriptor = ArtifactReader::new().read(&bytes)?;
//! assert_eq!(descriptor.name, "com.example.Foo");
//! assert_eq!(descriptor.super_name.as_deref(), Some("java.lang.Object"));
//! # Ok::<(), archgraph_core::classfile::MalformedArtifactError>(())
//! ```

mod attributes;
mod bytecode;
mod constant_pool;
mod cursor;
mod descriptor;

use crate::raw::{
    AccessKind, Modifiers, RawAccess, RawClassDescriptor, RawField, RawMethod, RawOrigin,
};
use attributes::{
    is_annotations, parse_annotations, parse_code, parse_exceptions, parse_source_file,
    read_attributes, BodyReference, CODE, EXCEPTIONS, SOURCE_FILE,
};
use constant_pool::ConstantPool;
use cursor::Cursor;
use descriptor::{binary_name, parse_field_descriptor, parse_method_descriptor};
use thiserror::Error;
use tracing::debug;

/// Class-file magic number.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// Oldest supported major version (JDK 1.1).
pub const MIN_MAJOR_VERSION: u16 = 45;

/// Newest supported major version (Java 25).
pub const MAX_MAJOR_VERSION: u16 = 69;

/// The artifact is not a well-formed class file.
///
/// Fatal for the artifact only; the [`Importer`](crate::Importer) decides
/// whether to skip it or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedArtifactError {
    /// The first four bytes are not `0xCAFEBABE`.
    #[error("bad magic number 0x{found:08X}")]
    BadMagic {
        /// The value found.
        found: u32,
    },

    /// The class-file version is outside the supported range.
    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version.
        major: u16,
        /// Minor version.
        minor: u16,
    },

    /// A structure extends past the end of its enclosing data.
    #[error("truncated structure at offset {offset}: {needed} more byte(s) needed")]
    Truncated {
        /// Absolute offset at which the read started.
        offset: usize,
        /// Missing byte count.
        needed: usize,
    },

    /// A constant pool index is zero, out of range, or points at the upper
    /// half of a long/double entry.
    #[error("invalid constant pool index #{index}")]
    InvalidConstantIndex {
        /// The index.
        index: u16,
    },

    /// A constant pool entry has the wrong kind.
    #[error("constant #{index} is {found}, expected {expected}")]
    UnexpectedConstant {
        /// The index.
        index: u16,
        /// Expected entry kind.
        expected: &'static str,
        /// Actual entry kind.
        found: &'static str,
    },

    /// A constant pool tag this reader does not know.
    #[error("unsupported constant pool tag {tag} at entry #{index}")]
    UnsupportedConstantTag {
        /// The tag byte.
        tag: u8,
        /// Entry index.
        index: u16,
    },

    /// An undefined opcode in a method body.
    #[error("unknown opcode 0x{opcode:02X} at offset {offset}")]
    UnknownOpcode {
        /// The opcode.
        opcode: u8,
        /// Absolute offset.
        offset: usize,
    },

    /// A `tableswitch`/`lookupswitch` with an impossible range or count.
    #[error("invalid switch instruction at offset {offset}")]
    InvalidSwitch {
        /// Absolute offset.
        offset: usize,
    },

    /// A field or method descriptor that does not parse.
    #[error("invalid descriptor '{descriptor}'")]
    InvalidDescriptor {
        /// The descriptor text.
        descriptor: String,
    },

    /// A `Utf8` constant that is not valid modified UTF-8.
    #[error("invalid modified UTF-8 in constant #{index}")]
    InvalidUtf8 {
        /// Entry index.
        index: u16,
    },

    /// An annotation element value with an unknown tag.
    #[error("invalid annotation element tag '{}' at offset {offset}", char::from(*.tag))]
    InvalidElementTag {
        /// The tag byte.
        tag: u8,
        /// Absolute offset.
        offset: usize,
    },

    /// Annotations nested deeper than the reader accepts.
    #[error("annotation nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// The limit.
        limit: usize,
    },

    /// Bytes remain after the class structure.
    #[error("{count} trailing byte(s) after class structure")]
    TrailingBytes {
        /// Number of extra bytes.
        count: usize,
    },
}

/// Decodes compiled class files.
///
/// Reading is deterministic and side-effect free; one reader may be shared
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactReader {
    min_major: u16,
    max_major: u16,
}

impl Default for ArtifactReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactReader {
    /// Creates a reader accepting versions 45 through [`MAX_MAJOR_VERSION`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_major: MIN_MAJOR_VERSION,
            max_major: MAX_MAJOR_VERSION,
        }
    }

    /// Restricts or extends the accepted major version range.
    #[must_use]
    pub fn with_version_range(mut self, min_major: u16, max_major: u16) -> Self {
        self.min_major = min_major;
        self.max_major = max_major;
        self
    }

    /// Decodes one class file.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedArtifactError`] for bad magic, unsupported
    /// versions, truncated structures, invalid constant pool references,
    /// undecodable descriptors or unknown opcodes.
    pub fn read(&self, bytes: &[u8]) -> Result<RawClassDescriptor, MalformedArtifactError> {
        let mut cursor = Cursor::new(bytes);

        let magic = cursor.u4()?;
        if magic != MAGIC {
            return Err(MalformedArtifactError::BadMagic { found: magic });
        }
        let minor = cursor.u2()?;
        let major = cursor.u2()?;
        if major < self.min_major || major > self.max_major {
            return Err(MalformedArtifactError::UnsupportedVersion { major, minor });
        }

        let pool = ConstantPool::parse(&mut cursor)?;
        let access_flags = cursor.u2()?;
        let name = binary_name(pool.class_name(cursor.u2()?)?);
        let super_index = cursor.u2()?;
        let super_name = if super_index == 0 {
            None
        } else {
            Some(binary_name(pool.class_name(super_index)?))
        };

        let mut descriptor = RawClassDescriptor::new(name)
            .with_modifiers(Modifiers::from_class_flags(access_flags));
        descriptor.super_name = super_name;

        let interface_count = cursor.u2()?;
        for _ in 0..interface_count {
            let interface = binary_name(pool.class_name(cursor.u2()?)?);
            descriptor = descriptor.with_interface(interface);
        }

        let field_count = cursor.u2()?;
        for _ in 0..field_count {
            let field = read_field(&mut cursor, &pool)?;
            descriptor.fields.push(field);
        }

        let method_count = cursor.u2()?;
        for index in 0..method_count {
            let (method, body) = read_method(&mut cursor, &pool)?;
            let origin = RawOrigin::Method(usize::from(index));
            descriptor
                .accesses
                .extend(body.into_iter().map(|r| to_raw_access(origin, r)));
            descriptor.methods.push(method);
        }

        read_attributes(&mut cursor, &pool, |mut attr| {
            if attr.name == SOURCE_FILE {
                descriptor.source_file = Some(parse_source_file(&mut attr.body, &pool)?);
            } else if is_annotations(attr.name) {
                descriptor
                    .annotations
                    .extend(parse_annotations(&mut attr.body, &pool)?);
            }
            Ok(())
        })?;

        if !cursor.is_empty() {
            return Err(MalformedArtifactError::TrailingBytes {
                count: cursor.remaining(),
            });
        }

        add_annotation_value_accesses(&mut descriptor);

        debug!(
            class = %descriptor.name,
            fields = descriptor.fields.len(),
            methods = descriptor.methods.len(),
            accesses = descriptor.accesses.len(),
            "Decoded class file"
        );
        Ok(descriptor)
    }
}

fn read_field(
    cursor: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<RawField, MalformedArtifactError> {
    let flags = cursor.u2()?;
    let name = pool.utf8(cursor.u2()?)?;
    let type_name = parse_field_descriptor(pool.utf8(cursor.u2()?)?)?;
    let mut field = RawField::new(name, type_name).with_modifiers(Modifiers::from_field_flags(flags));
    read_attributes(cursor, pool, |mut attr| {
        if is_annotations(attr.name) {
            field
                .annotations
                .extend(parse_annotations(&mut attr.body, pool)?);
        }
        Ok(())
    })?;
    Ok(field)
}

fn read_method(
    cursor: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<(RawMethod, Vec<BodyReference>), MalformedArtifactError> {
    let flags = cursor.u2()?;
    let name = pool.utf8(cursor.u2()?)?;
    let (parameter_types, return_type) = parse_method_descriptor(pool.utf8(cursor.u2()?)?)?;
    let mut method = RawMethod::new(name, parameter_types, return_type)
        .with_modifiers(Modifiers::from_method_flags(flags));
    let mut body = Vec::new();
    read_attributes(cursor, pool, |mut attr| {
        match attr.name {
            CODE => body = parse_code(&mut attr.body, pool)?,
            EXCEPTIONS => method.throws = parse_exceptions(&mut attr.body, pool)?,
            n if is_annotations(n) => method
                .annotations
                .extend(parse_annotations(&mut attr.body, pool)?),
            _ => {}
        }
        Ok(())
    })?;
    Ok((method, body))
}

fn to_raw_access(origin: RawOrigin, body: BodyReference) -> RawAccess {
    let BodyReference { reference, line } = body;
    RawAccess {
        origin,
        target_owner: reference.owner,
        target_member: reference.member,
        kind: reference.kind,
        line,
    }
}

/// Records the types referenced by annotation element values as
/// `ANNOTATION_VALUE` accesses of the annotated element.
fn add_annotation_value_accesses(descriptor: &mut RawClassDescriptor) {
    let mut extra = Vec::new();
    let sites = std::iter::once((RawOrigin::Class, &descriptor.annotations))
        .chain(
            descriptor
                .fields
                .iter()
                .enumerate()
                .map(|(i, f)| (RawOrigin::Field(i), &f.annotations)),
        )
        .chain(
            descriptor
                .methods
                .iter()
                .enumerate()
                .map(|(i, m)| (RawOrigin::Method(i), &m.annotations)),
        );
    for (origin, annotations) in sites {
        for annotation in annotations {
            for type_name in annotation.referenced_types() {
                if let Some(class) = crate::names::referenced_class(type_name) {
                    let access = RawAccess::to_type(origin, AccessKind::AnnotationValue, class);
                    if !extra.contains(&access) {
                        extra.push(access);
                    }
                }
            }
        }
    }
    descriptor.accesses.extend(extra);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ClassFileBuilder, Insn, MethodSpec};

    #[test]
    fn rejects_bad_magic() {
        let err = ArtifactReader::new().read(&[0, 0, 0, 0]).unwrap_err();
        assert_eq!(err, MalformedArtifactError::BadMagic { found: 0 });
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = ClassFileBuilder::new("a.A").build();
        bytes[6] = 0;
        bytes[7] = 99;
        let err = ArtifactReader::new().read(&bytes).unwrap_err();
        assert!(matches!(
            err,
            MalformedArtifactError::UnsupportedVersion { major: 99, .. }
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = ClassFileBuilder::new("a.A").build();
        for cut in [3, 9, bytes.len() - 1] {
            let err = ArtifactReader::new().read(&bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, MalformedArtifactError::Truncated { .. }),
                "cut at {cut}: {err}"
            );
        }
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = ClassFileBuilder::new("a.A").build();
        bytes.push(0);
        let err = ArtifactReader::new().read(&bytes).unwrap_err();
        assert_eq!(err, MalformedArtifactError::TrailingBytes { count: 1 });
    }

    #[test]
    fn reading_is_deterministic() {
        let bytes = ClassFileBuilder::new("a.A")
            .method(
                MethodSpec::new("run", "()V")
                    .insn(Insn::Line(3))
                    .insn(Insn::InvokeStatic {
                        owner: "b.B".into(),
                        name: "go".into(),
                        descriptor: "()V".into(),
                    })
                    .insn(Insn::Return),
            )
            .build();
        let reader = ArtifactReader::new();
        assert_eq!(reader.read(&bytes).unwrap(), reader.read(&bytes).unwrap());
    }
}
