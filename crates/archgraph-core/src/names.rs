//! Helpers for fully qualified type names.
//!
//! Type names use the binary form with `.` package separators and `$` for
//! nested classes (`com.example.Outer$Inner`). Array types carry one `[]`
//! suffix per dimension (`java.lang.String[][]`).

/// Names of the primitive types (including `void`).
pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Returns the package part of a type name (empty for the default package).
///
/// # Example
///
/// ```
/// use archgraph_core::names::package_of;
/// assert_eq!(package_of("com.example.Foo"), "com.example");
/// assert_eq!(package_of("Foo"), "");
/// ```
#[must_use]
pub fn package_of(name: &str) -> &str {
    let name = element_type(name);
    name.rfind('.').map_or("", |i| &name[..i])
}

/// Returns the simple name of a type: the last segment after both the
/// package separator and any nesting separator.
#[must_use]
pub fn simple_name_of(name: &str) -> &str {
    let last = name.rsplit('.').next().unwrap_or(name);
    last.rsplit('$').next().unwrap_or(last)
}

/// Strips every array dimension from a type name.
#[must_use]
pub fn element_type(name: &str) -> &str {
    let mut name = name;
    while let Some(stripped) = name.strip_suffix("[]") {
        name = stripped;
    }
    name
}

/// Returns true for primitive types and `void`.
#[must_use]
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Returns the class a type name refers to, if any.
///
/// Arrays resolve to their element type; primitives (and arrays of
/// primitives) refer to no class.
#[must_use]
pub fn referenced_class(name: &str) -> Option<&str> {
    let element = element_type(name);
    if element.is_empty() || is_primitive(element) {
        None
    } else {
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("com.example.Foo"), "com.example");
        assert_eq!(package_of("com.example.Foo$Bar"), "com.example");
        assert_eq!(package_of("com.example.Foo[]"), "com.example");
        assert_eq!(package_of("Foo"), "");
    }

    #[test]
    fn test_simple_name_of() {
        assert_eq!(simple_name_of("com.example.Foo"), "Foo");
        assert_eq!(simple_name_of("com.example.Foo$Bar"), "Bar");
        assert_eq!(simple_name_of("Foo"), "Foo");
    }

    #[test]
    fn test_referenced_class() {
        assert_eq!(referenced_class("java.lang.String[][]"), Some("java.lang.String"));
        assert_eq!(referenced_class("int[]"), None);
        assert_eq!(referenced_class("void"), None);
        assert_eq!(referenced_class("a.B"), Some("a.B"));
    }
}
