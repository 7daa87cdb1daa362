//! Constant pool decoding.

use super::cursor::Cursor;
use super::MalformedArtifactError;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;
const TAG_METHOD_HANDLE: u8 = 15;
const TAG_METHOD_TYPE: u8 = 16;
const TAG_DYNAMIC: u8 = 17;
const TAG_INVOKE_DYNAMIC: u8 = 18;
const TAG_MODULE: u8 = 19;
const TAG_PACKAGE: u8 = 20;

/// One constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Constant {
    /// Index 0 and the upper slot of long/double entries.
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodHandle(u8, u16),
    MethodType(u16),
    Dynamic(u16, u16),
    InvokeDynamic(u16, u16),
    Module(u16),
    Package(u16),
}

impl Constant {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Unusable => "unusable",
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class(_) => "Class",
            Self::String(_) => "String",
            Self::FieldRef(..) => "Fieldref",
            Self::MethodRef(..) => "Methodref",
            Self::InterfaceMethodRef(..) => "InterfaceMethodref",
            Self::NameAndType(..) => "NameAndType",
            Self::MethodHandle(..) => "MethodHandle",
            Self::MethodType(_) => "MethodType",
            Self::Dynamic(..) => "Dynamic",
            Self::InvokeDynamic(..) => "InvokeDynamic",
            Self::Module(_) => "Module",
            Self::Package(_) => "Package",
        }
    }
}

/// Whether a member reference names a field or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefKind {
    Field,
    Method,
}

/// A resolved `Fieldref` / `Methodref` / `InterfaceMethodref`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MemberRef<'a> {
    pub kind: RefKind,
    /// Internal name (or array descriptor) of the owner.
    pub owner: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

#[derive(Debug, Default)]
pub(crate) struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn parse(cursor: &mut Cursor<'_>) -> Result<Self, MalformedArtifactError> {
        let count = cursor.u2()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(Constant::Unusable);
        let mut index: u16 = 1;
        while index < count {
            let tag = cursor.u1()?;
            let entry = match tag {
                TAG_UTF8 => {
                    let len = cursor.u2()?;
                    let bytes = cursor.take(usize::from(len))?;
                    Constant::Utf8(decode_modified_utf8(bytes, index)?)
                }
                TAG_INTEGER => Constant::Integer(cursor.i4()?),
                TAG_FLOAT => Constant::Float(f32::from_bits(cursor.u4()?)),
                TAG_LONG => Constant::Long(cursor.i8()?),
                TAG_DOUBLE => Constant::Double(f64::from_bits(cursor.u8()?)),
                TAG_CLASS => Constant::Class(cursor.u2()?),
                TAG_STRING => Constant::String(cursor.u2()?),
                TAG_FIELDREF => Constant::FieldRef(cursor.u2()?, cursor.u2()?),
                TAG_METHODREF => Constant::MethodRef(cursor.u2()?, cursor.u2()?),
                TAG_INTERFACE_METHODREF => Constant::InterfaceMethodRef(cursor.u2()?, cursor.u2()?),
                TAG_NAME_AND_TYPE => Constant::NameAndType(cursor.u2()?, cursor.u2()?),
                TAG_METHOD_HANDLE => Constant::MethodHandle(cursor.u1()?, cursor.u2()?),
                TAG_METHOD_TYPE => Constant::MethodType(cursor.u2()?),
                TAG_DYNAMIC => Constant::Dynamic(cursor.u2()?, cursor.u2()?),
                TAG_INVOKE_DYNAMIC => Constant::InvokeDynamic(cursor.u2()?, cursor.u2()?),
                TAG_MODULE => Constant::Module(cursor.u2()?),
                TAG_PACKAGE => Constant::Package(cursor.u2()?),
                _ => return Err(MalformedArtifactError::UnsupportedConstantTag { tag, index }),
            };
            let wide = matches!(entry, Constant::Long(_) | Constant::Double(_));
            entries.push(entry);
            index = index.saturating_add(1);
            if wide {
                entries.push(Constant::Unusable);
                index = index.saturating_add(1);
            }
        }
        Ok(Self { entries })
    }

    pub(crate) fn get(&self, index: u16) -> Result<&Constant, MalformedArtifactError> {
        match self.entries.get(usize::from(index)) {
            Some(Constant::Unusable) | None => {
                Err(MalformedArtifactError::InvalidConstantIndex { index })
            }
            Some(constant) => Ok(constant),
        }
    }

    pub(crate) fn unexpected(&self, index: u16, expected: &'static str) -> MalformedArtifactError {
        let found = self
            .entries
            .get(usize::from(index))
            .map_or("missing", Constant::kind_name);
        MalformedArtifactError::UnexpectedConstant {
            index,
            expected,
            found,
        }
    }

    pub(crate) fn utf8(&self, index: u16) -> Result<&str, MalformedArtifactError> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(self.unexpected(index, "Utf8")),
        }
    }

    /// Internal name of a `Class` entry (`java/lang/String` or `[I`).
    pub(crate) fn class_name(&self, index: u16) -> Result<&str, MalformedArtifactError> {
        match self.get(index)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(self.unexpected(index, "Class")),
        }
    }

    pub(crate) fn member_ref(&self, index: u16) -> Result<MemberRef<'_>, MalformedArtifactError> {
        let (kind, class_index, nat_index) = match self.get(index)? {
            Constant::FieldRef(c, n) => (RefKind::Field, *c, *n),
            Constant::MethodRef(c, n) | Constant::InterfaceMethodRef(c, n) => {
                (RefKind::Method, *c, *n)
            }
            _ => return Err(self.unexpected(index, "member reference")),
        };
        let (name_index, descriptor_index) = match self.get(nat_index)? {
            Constant::NameAndType(n, d) => (*n, *d),
            _ => return Err(self.unexpected(nat_index, "NameAndType")),
        };
        Ok(MemberRef {
            kind,
            owner: self.class_name(class_index)?,
            name: self.utf8(name_index)?,
            descriptor: self.utf8(descriptor_index)?,
        })
    }
}

/// Decodes the class-file flavour of UTF-8 (null as two bytes, supplementary
/// characters as surrogate pairs).
///
/// String constants may hold unpaired surrogates; those decode to U+FFFD.
fn decode_modified_utf8(bytes: &[u8], index: u16) -> Result<String, MalformedArtifactError> {
    let invalid = || MalformedArtifactError::InvalidUtf8 { index };
    if bytes.iter().all(|b| (1..0x80).contains(b)) {
        return std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| invalid());
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let continuation = |i: usize| -> Result<u16, MalformedArtifactError> {
        match bytes.get(i) {
            Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
            _ => Err(invalid()),
        }
    };
    while i < bytes.len() {
        let b = bytes[i];
        if b != 0 && b < 0x80 {
            units.push(u16::from(b));
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            units.push((u16::from(b & 0x1F) << 6) | continuation(i + 1)?);
            i += 2;
        } else if b & 0xF0 == 0xE0 {
            units.push((u16::from(b & 0x0F) << 12) | (continuation(i + 1)? << 6) | continuation(i + 2)?);
            i += 3;
        } else {
            return Err(invalid());
        }
    }
    Ok(String::from_utf16_lossy(&units))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(bytes: &[u8]) -> Result<ConstantPool, MalformedArtifactError> {
        ConstantPool::parse(&mut Cursor::new(bytes))
    }

    #[test]
    fn long_entries_take_two_slots() {
        // count=5: #1 Long, #2 unusable, #3 Utf8 "A", #4 Class #3
        let bytes = [
            0, 5, 5, 0, 0, 0, 0, 0, 0, 0, 7, 1, 0, 1, b'A', 7, 0, 3,
        ];
        let cp = pool(&bytes).unwrap();
        assert_eq!(cp.get(1).unwrap(), &Constant::Long(7));
        assert!(matches!(
            cp.get(2),
            Err(MalformedArtifactError::InvalidConstantIndex { index: 2 })
        ));
        assert_eq!(cp.class_name(4).unwrap(), "A");
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = pool(&[0, 2, 99]).unwrap_err();
        assert_eq!(
            err,
            MalformedArtifactError::UnsupportedConstantTag { tag: 99, index: 1 }
        );
    }

    #[test]
    fn wrong_entry_kind_is_reported() {
        let cp = pool(&[0, 2, 1, 0, 1, b'x']).unwrap();
        assert!(matches!(
            cp.class_name(1),
            Err(MalformedArtifactError::UnexpectedConstant {
                expected: "Class",
                found: "Utf8",
                ..
            })
        ));
    }

    #[test]
    fn decodes_modified_utf8() {
        // two-byte null, 'é', and a surrogate pair for U+1F600
        let bytes = [
            0xC0, 0x80, 0xC3, 0xA9, 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80,
        ];
        let s = decode_modified_utf8(&bytes, 1).unwrap();
        assert_eq!(s, "\u{0}é\u{1F600}");
    }

    #[test]
    fn lone_surrogate_becomes_replacement_char() {
        // "x\uD800y" as javac writes it
        let bytes = [b'x', 0xED, 0xA0, 0x80, b'y'];
        assert_eq!(decode_modified_utf8(&bytes, 7).unwrap(), "x\u{FFFD}y");
        // trailing low surrogate with no lead
        assert_eq!(decode_modified_utf8(&[0xED, 0xB0, 0x80], 7).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn parses_pool_holding_lone_surrogate() {
        // count = 2, one Utf8 entry of length 3
        let bytes = [0x00, 0x02, 0x01, 0x00, 0x03, 0xED, 0xA0, 0x80];
        let cp = pool(&bytes).unwrap();
        assert_eq!(cp.utf8(1).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn rejects_raw_null_byte() {
        assert_eq!(
            decode_modified_utf8(&[b'a', 0, b'b'], 3),
            Err(MalformedArtifactError::InvalidUtf8 { index: 3 })
        );
    }
}
