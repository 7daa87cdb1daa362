//! Field and method descriptor parsing.
//!
//! Descriptors are converted to binary type names: `Ljava/lang/String;`
//! becomes `java.lang.String`, `[[I` becomes `int[][]`.

use super::MalformedArtifactError;

fn invalid(descriptor: &str) -> MalformedArtifactError {
    MalformedArtifactError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
    }
}

/// Converts an internal name (`java/lang/String`) to a binary name.
pub(crate) fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Type name of a `Class` constant, which holds either an internal name or,
/// for array classes, an array descriptor.
pub(crate) fn class_ref_type_name(internal: &str) -> Result<String, MalformedArtifactError> {
    if internal.starts_with('[') {
        parse_field_descriptor(internal)
    } else if internal.is_empty() {
        Err(invalid(internal))
    } else {
        Ok(binary_name(internal))
    }
}

/// Parses a field descriptor into a type name.
pub(crate) fn parse_field_descriptor(descriptor: &str) -> Result<String, MalformedArtifactError> {
    let mut pos = 0;
    let ty = parse_type(descriptor, &mut pos, false)?;
    if pos != descriptor.len() {
        return Err(invalid(descriptor));
    }
    Ok(ty)
}

/// Parses a return descriptor (a field descriptor or `V`).
pub(crate) fn parse_return_descriptor(descriptor: &str) -> Result<String, MalformedArtifactError> {
    let mut pos = 0;
    let ty = parse_type(descriptor, &mut pos, true)?;
    if pos != descriptor.len() {
        return Err(invalid(descriptor));
    }
    Ok(ty)
}

/// Parses a method descriptor into parameter type names and the return type.
pub(crate) fn parse_method_descriptor(
    descriptor: &str,
) -> Result<(Vec<String>, String), MalformedArtifactError> {
    let rest = descriptor
        .strip_prefix('(')
        .ok_or_else(|| invalid(descriptor))?;
    let close = rest.find(')').ok_or_else(|| invalid(descriptor))?;
    let params_part = &rest[..close];

    let mut params = Vec::new();
    let mut pos = 0;
    while pos < params_part.len() {
        params.push(parse_type(params_part, &mut pos, false).map_err(|_| invalid(descriptor))?);
    }
    let return_type =
        parse_return_descriptor(&rest[close + 1..]).map_err(|_| invalid(descriptor))?;
    Ok((params, return_type))
}

fn parse_type(
    descriptor: &str,
    pos: &mut usize,
    allow_void: bool,
) -> Result<String, MalformedArtifactError> {
    let bytes = descriptor.as_bytes();
    let mut dimensions = 0;
    while bytes.get(*pos) == Some(&b'[') {
        dimensions += 1;
        *pos += 1;
    }
    let base = match bytes.get(*pos) {
        Some(b'B') => "byte".to_string(),
        Some(b'C') => "char".to_string(),
        Some(b'D') => "double".to_string(),
        Some(b'F') => "float".to_string(),
        Some(b'I') => "int".to_string(),
        Some(b'J') => "long".to_string(),
        Some(b'S') => "short".to_string(),
        Some(b'Z') => "boolean".to_string(),
        Some(b'V') if allow_void && dimensions == 0 => "void".to_string(),
        Some(b'L') => {
            let start = *pos + 1;
            let end = descriptor[start..]
                .find(';')
                .map(|i| start + i)
                .ok_or_else(|| invalid(descriptor))?;
            if end == start {
                return Err(invalid(descriptor));
            }
            *pos = end;
            binary_name(&descriptor[start..end])
        }
        _ => return Err(invalid(descriptor)),
    };
    *pos += 1;
    Ok(base + &"[]".repeat(dimensions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_descriptors() {
        assert_eq!(parse_field_descriptor("I").unwrap(), "int");
        assert_eq!(
            parse_field_descriptor("Ljava/lang/String;").unwrap(),
            "java.lang.String"
        );
        assert_eq!(parse_field_descriptor("[[J").unwrap(), "long[][]");
        assert_eq!(
            parse_field_descriptor("[La/B$C;").unwrap(),
            "a.B$C[]"
        );
    }

    #[test]
    fn parses_method_descriptors() {
        let (params, ret) = parse_method_descriptor("(ILjava/lang/String;[D)V").unwrap();
        assert_eq!(params, vec!["int", "java.lang.String", "double[]"]);
        assert_eq!(ret, "void");

        let (params, ret) = parse_method_descriptor("()[Ljava/lang/Object;").unwrap();
        assert!(params.is_empty());
        assert_eq!(ret, "java.lang.Object[]");
    }

    #[test]
    fn rejects_malformed_descriptors() {
        for bad in ["", "V", "[V", "Ljava/lang/String", "L;", "II", "(V)V", "(I", "()"] {
            let result = if bad.starts_with('(') {
                parse_method_descriptor(bad).map(|_| ())
            } else {
                parse_field_descriptor(bad).map(|_| ())
            };
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn class_refs_accept_internal_names_and_arrays() {
        assert_eq!(class_ref_type_name("a/b/C").unwrap(), "a.b.C");
        assert_eq!(class_ref_type_name("[I").unwrap(), "int[]");
        assert_eq!(class_ref_type_name("[[La/B;").unwrap(), "a.B[][]");
    }
}
