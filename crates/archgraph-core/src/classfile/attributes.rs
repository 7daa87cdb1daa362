//! Attribute decoding: annotations, `Code`, `Exceptions`, `SourceFile`.

use super::bytecode::{self, CodeRef};
use super::constant_pool::{Constant, ConstantPool};
use super::cursor::Cursor;
use super::descriptor::{class_ref_type_name, parse_field_descriptor, parse_return_descriptor};
use super::MalformedArtifactError;
use crate::names::referenced_class;
use crate::raw::{Annotation, AnnotationValue, AccessKind};

/// Nested annotations deeper than this are rejected.
const MAX_ANNOTATION_DEPTH: usize = 32;

pub(crate) const SOURCE_FILE: &str = "SourceFile";
pub(crate) const CODE: &str = "Code";
pub(crate) const EXCEPTIONS: &str = "Exceptions";
pub(crate) const LINE_NUMBER_TABLE: &str = "LineNumberTable";
pub(crate) const VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
pub(crate) const INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";

/// One attribute: resolved name plus a cursor over its body.
pub(crate) struct Attribute<'a, 'p> {
    pub name: &'p str,
    pub body: Cursor<'a>,
}

/// Reads an attribute table, handing each attribute to `visit`.
pub(crate) fn read_attributes<'a, 'p, F>(
    cursor: &mut Cursor<'a>,
    pool: &'p ConstantPool,
    mut visit: F,
) -> Result<(), MalformedArtifactError>
where
    F: FnMut(Attribute<'a, 'p>) -> Result<(), MalformedArtifactError>,
{
    let count = cursor.u2()?;
    for _ in 0..count {
        let name = pool.utf8(cursor.u2()?)?;
        let len = cursor.u4()?;
        let body = cursor.sub(len as usize)?;
        visit(Attribute { name, body })?;
    }
    Ok(())
}

pub(crate) fn is_annotations(name: &str) -> bool {
    name == VISIBLE_ANNOTATIONS || name == INVISIBLE_ANNOTATIONS
}

// ────────────────────────────────────────────
// Annotations
// ────────────────────────────────────────────

/// Parses a `Runtime(In)VisibleAnnotations` body.
pub(crate) fn parse_annotations(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, MalformedArtifactError> {
    let count = body.u2()?;
    (0..count)
        .map(|_| parse_annotation(body, pool, 0))
        .collect()
}

fn parse_annotation(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
    depth: usize,
) -> Result<Annotation, MalformedArtifactError> {
    if depth > MAX_ANNOTATION_DEPTH {
        return Err(MalformedArtifactError::NestingTooDeep {
            limit: MAX_ANNOTATION_DEPTH,
        });
    }
    let type_name = parse_field_descriptor(pool.utf8(body.u2()?)?)?;
    let pairs = body.u2()?;
    let mut annotation = Annotation::new(type_name);
    for _ in 0..pairs {
        let name = pool.utf8(body.u2()?)?.to_string();
        let value = parse_element_value(body, pool, depth)?;
        annotation.values.push((name, value));
    }
    Ok(annotation)
}

fn parse_element_value(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
    depth: usize,
) -> Result<AnnotationValue, MalformedArtifactError> {
    let tag = body.u1()?;
    let value = match tag {
        b'B' | b'C' | b'I' | b'S' | b'Z' => {
            let index = body.u2()?;
            let Constant::Integer(v) = pool.get(index)? else {
                return Err(pool.unexpected(index, "Integer"));
            };
            let v = *v;
            let narrowing = || MalformedArtifactError::UnexpectedConstant {
                index,
                expected: "Integer in range",
                found: "Integer",
            };
            match tag {
                b'B' => AnnotationValue::Byte(i8::try_from(v).map_err(|_| narrowing())?),
                b'S' => AnnotationValue::Short(i16::try_from(v).map_err(|_| narrowing())?),
                b'Z' => AnnotationValue::Boolean(v != 0),
                b'C' => AnnotationValue::Char(
                    u32::try_from(v)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(narrowing)?,
                ),
                _ => AnnotationValue::Int(v),
            }
        }
        b'J' => {
            let index = body.u2()?;
            match pool.get(index)? {
                Constant::Long(v) => AnnotationValue::Long(*v),
                _ => return Err(pool.unexpected(index, "Long")),
            }
        }
        b'F' => {
            let index = body.u2()?;
            match pool.get(index)? {
                Constant::Float(v) => AnnotationValue::Float(*v),
                _ => return Err(pool.unexpected(index, "Float")),
            }
        }
        b'D' => {
            let index = body.u2()?;
            match pool.get(index)? {
                Constant::Double(v) => AnnotationValue::Double(*v),
                _ => return Err(pool.unexpected(index, "Double")),
            }
        }
        b's' => AnnotationValue::String(pool.utf8(body.u2()?)?.to_string()),
        b'e' => {
            let type_name = parse_field_descriptor(pool.utf8(body.u2()?)?)?;
            let constant = pool.utf8(body.u2()?)?.to_string();
            AnnotationValue::Enum {
                type_name,
                constant,
            }
        }
        b'c' => AnnotationValue::Class(parse_return_descriptor(pool.utf8(body.u2()?)?)?),
        b'@' => AnnotationValue::Annotation(Box::new(parse_annotation(body, pool, depth + 1)?)),
        b'[' => {
            let count = body.u2()?;
            let values = (0..count)
                .map(|_| parse_element_value(body, pool, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            AnnotationValue::Array(values)
        }
        _ => {
            return Err(MalformedArtifactError::InvalidElementTag {
                tag,
                offset: body.offset() - 1,
            })
        }
    };
    Ok(value)
}

// ────────────────────────────────────────────
// Method attributes
// ────────────────────────────────────────────

/// A reference from a method body with its resolved line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyReference {
    pub reference: CodeRef,
    pub line: Option<u32>,
}

/// Sorted `(start_pc, line)` pairs from all `LineNumberTable`s of a method.
#[derive(Debug, Default)]
struct LineTable(Vec<(usize, u32)>);

impl LineTable {
    fn read(&mut self, body: &mut Cursor<'_>) -> Result<(), MalformedArtifactError> {
        let count = body.u2()?;
        for _ in 0..count {
            let start = usize::from(body.u2()?);
            let line = u32::from(body.u2()?);
            self.0.push((start, line));
        }
        Ok(())
    }

    fn line_for(&self, pc: usize) -> Option<u32> {
        let idx = self.0.partition_point(|(start, _)| *start <= pc);
        idx.checked_sub(1).map(|i| self.0[i].1)
    }
}

/// Parses a `Code` attribute into the references its instructions make,
/// including exception handler catch types.
pub(crate) fn parse_code(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<BodyReference>, MalformedArtifactError> {
    body.skip(4)?; // max_stack, max_locals
    let code_len = body.u4()?;
    let mut code = body.sub(code_len as usize)?;
    let mut refs = bytecode::scan(&mut code, pool)?;

    let handlers = body.u2()?;
    for _ in 0..handlers {
        body.skip(4)?; // start_pc, end_pc
        let handler_pc = usize::from(body.u2()?);
        let catch_type = body.u2()?;
        if catch_type == 0 {
            continue;
        }
        let type_name = class_ref_type_name(pool.class_name(catch_type)?)?;
        if let Some(owner) = referenced_class(&type_name) {
            refs.push(CodeRef {
                pc: handler_pc,
                kind: AccessKind::TypeReference,
                owner: owner.to_string(),
                member: None,
            });
        }
    }

    let mut lines = LineTable::default();
    read_attributes(body, pool, |mut attr| {
        if attr.name == LINE_NUMBER_TABLE {
            lines.read(&mut attr.body)?;
        }
        Ok(())
    })?;
    lines.0.sort_unstable();

    Ok(refs
        .into_iter()
        .map(|reference| BodyReference {
            line: lines.line_for(reference.pc),
            reference,
        })
        .collect())
}

/// Parses an `Exceptions` attribute into thrown type names.
pub(crate) fn parse_exceptions(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<Vec<String>, MalformedArtifactError> {
    let count = body.u2()?;
    (0..count)
        .map(|_| class_ref_type_name(pool.class_name(body.u2()?)?))
        .collect()
}

/// Parses a `SourceFile` attribute.
pub(crate) fn parse_source_file(
    body: &mut Cursor<'_>,
    pool: &ConstantPool,
) -> Result<String, MalformedArtifactError> {
    Ok(pool.utf8(body.u2()?)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_table_picks_closest_preceding_entry() {
        let table = LineTable(vec![(0, 10), (5, 11), (12, 14)]);
        assert_eq!(table.line_for(0), Some(10));
        assert_eq!(table.line_for(4), Some(10));
        assert_eq!(table.line_for(5), Some(11));
        assert_eq!(table.line_for(100), Some(14));
        assert_eq!(LineTable::default().line_for(3), None);
    }

    #[test]
    fn line_table_before_first_entry_is_unknown() {
        let table = LineTable(vec![(4, 7)]);
        assert_eq!(table.line_for(2), None);
    }
}
