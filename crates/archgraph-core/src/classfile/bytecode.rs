//! Bytecode scanning: walks every instruction of a `Code` attribute and
//! extracts the references it makes to other types and members.

use super::constant_pool::{Constant, ConstantPool, RefKind};
use super::cursor::Cursor;
use super::descriptor::{class_ref_type_name, parse_field_descriptor, parse_method_descriptor};
use super::MalformedArtifactError;
use crate::names::referenced_class;
use crate::raw::{AccessKind, RawMemberRef, CONSTRUCTOR_NAME};

const LDC: u8 = 0x12;
const LDC_W: u8 = 0x13;
const IINC: u8 = 0x84;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const GETSTATIC: u8 = 0xb2;
const PUTSTATIC: u8 = 0xb3;
const GETFIELD: u8 = 0xb4;
const PUTFIELD: u8 = 0xb5;
const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const INVOKEINTERFACE: u8 = 0xb9;
const NEW: u8 = 0xbb;
const ANEWARRAY: u8 = 0xbd;
const CHECKCAST: u8 = 0xc0;
const INSTANCEOF: u8 = 0xc1;
const WIDE: u8 = 0xc4;
const MULTIANEWARRAY: u8 = 0xc5;

/// A reference found in a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodeRef {
    /// Bytecode offset of the referencing instruction.
    pub pc: usize,
    pub kind: AccessKind,
    /// Owner type (array element type for array owners).
    pub owner: String,
    pub member: Option<RawMemberRef>,
}

/// Total instruction length (opcode included) for fixed-size opcodes.
fn fixed_length(opcode: u8) -> Option<usize> {
    let len = match opcode {
        0x00..=0x0f | 0x1a..=0x35 | 0x3b..=0x83 | 0x85..=0x98 | 0xac..=0xb1 | 0xbe | 0xbf
        | 0xc2 | 0xc3 | 0xca | 0xfe | 0xff => 1,
        0x10 | 0x12 | 0x15..=0x19 | 0x36..=0x3a | 0xa9 | 0xbc => 2,
        0x11 | 0x13 | 0x14 | 0x84 | 0x99..=0xa8 | 0xb2..=0xb8 | 0xbb | 0xbd | 0xc0 | 0xc1
        | 0xc6 | 0xc7 => 3,
        0xc5 => 4,
        0xb9 | 0xba | 0xc8 | 0xc9 => 5,
        _ => return None,
    };
    Some(len)
}

/// Scans `code` and returns every type/member reference in instruction order.
pub(crate) fn scan(
    code: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<CodeRef>, MalformedArtifactError> {
    let mut refs = Vec::new();
    while !code.is_empty() {
        let pc = code.position();
        let offset = code.offset();
        let opcode = code.u1()?;
        match opcode {
            GETSTATIC | PUTSTATIC | GETFIELD | PUTFIELD => {
                let kind = if matches!(opcode, GETSTATIC | GETFIELD) {
                    AccessKind::FieldGet
                } else {
                    AccessKind::FieldSet
                };
                let index = code.u2()?;
                refs.extend(member_access(pool, index, pc, kind, RefKind::Field)?);
            }
            INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC | INVOKEINTERFACE => {
                let index = code.u2()?;
                if opcode == INVOKEINTERFACE {
                    code.skip(2)?;
                }
                refs.extend(member_access(
                    pool,
                    index,
                    pc,
                    AccessKind::MethodCall,
                    RefKind::Method,
                )?);
            }
            NEW | ANEWARRAY | CHECKCAST | INSTANCEOF | MULTIANEWARRAY => {
                let index = code.u2()?;
                if opcode == MULTIANEWARRAY {
                    code.skip(1)?;
                }
                refs.extend(type_access(pool, index, pc)?);
            }
            LDC | LDC_W => {
                let index = if opcode == LDC {
                    u16::from(code.u1()?)
                } else {
                    code.u2()?
                };
                if let Constant::Class(_) = pool.get(index)? {
                    refs.extend(type_access(pool, index, pc)?);
                }
            }
            TABLESWITCH => {
                skip_padding(code, pc)?;
                code.skip(4)?;
                let low = code.i4()?;
                let high = code.i4()?;
                if high < low {
                    return Err(MalformedArtifactError::InvalidSwitch { offset });
                }
                let count = usize::try_from(i64::from(high) - i64::from(low) + 1)
                    .map_err(|_| MalformedArtifactError::InvalidSwitch { offset })?;
                code.skip(count * 4)?;
            }
            LOOKUPSWITCH => {
                skip_padding(code, pc)?;
                code.skip(4)?;
                let pairs = usize::try_from(code.i4()?)
                    .map_err(|_| MalformedArtifactError::InvalidSwitch { offset })?;
                code.skip(pairs * 8)?;
            }
            WIDE => {
                let modified = code.u1()?;
                code.skip(if modified == IINC { 4 } else { 2 })?;
            }
            _ => {
                let len = fixed_length(opcode)
                    .ok_or(MalformedArtifactError::UnknownOpcode { opcode, offset })?;
                code.skip(len - 1)?;
            }
        }
    }
    Ok(refs)
}

fn skip_padding(code: &mut Cursor<'_>, pc: usize) -> Result<(), MalformedArtifactError> {
    code.skip((4 - (pc + 1) % 4) % 4)
}

fn owner_type(internal: &str) -> Result<Option<String>, MalformedArtifactError> {
    let type_name = class_ref_type_name(internal)?;
    Ok(referenced_class(&type_name).map(str::to_owned))
}

fn type_access(
    pool: &ConstantPool,
    index: u16,
    pc: usize,
) -> Result<Option<CodeRef>, MalformedArtifactError> {
    let internal = pool.class_name(index)?;
    Ok(owner_type(internal)?.map(|owner| CodeRef {
        pc,
        kind: AccessKind::TypeReference,
        owner,
        member: None,
    }))
}

fn member_access(
    pool: &ConstantPool,
    index: u16,
    pc: usize,
    kind: AccessKind,
    expected: RefKind,
) -> Result<Option<CodeRef>, MalformedArtifactError> {
    let reference = pool.member_ref(index)?;
    if reference.kind != expected {
        let expected = match expected {
            RefKind::Field => "Fieldref",
            RefKind::Method => "Methodref",
        };
        return Err(pool.unexpected(index, expected));
    }
    let Some(owner) = owner_type(reference.owner)? else {
        return Ok(None);
    };
    let (kind, member) = match reference.kind {
        RefKind::Field => (
            kind,
            RawMemberRef::Field {
                name: reference.name.to_string(),
                type_name: parse_field_descriptor(reference.descriptor)?,
            },
        ),
        RefKind::Method => {
            let (parameter_types, return_type) = parse_method_descriptor(reference.descriptor)?;
            let kind = if reference.name == CONSTRUCTOR_NAME {
                AccessKind::ConstructorCall
            } else {
                kind
            };
            (
                kind,
                RawMemberRef::Method {
                    name: reference.name.to_string(),
                    parameter_types,
                    return_type,
                },
            )
        }
    };
    Ok(Some(CodeRef {
        pc,
        kind,
        owner,
        member: Some(member),
    }))
}
