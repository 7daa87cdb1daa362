//! Pure domain model for declarative architecture rules.
//!
//! This module contains no serde and no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes.

use crate::pattern::{PackagePattern, PatternError};
use crate::raw::AccessKind;
use crate::types::Severity;
use std::collections::HashMap;
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated scope name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeName(String);

impl ScopeName {
    /// Creates a new scope name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyScopeName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ModelError::InvalidScopeName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compiles a non-empty list of package patterns.
///
/// # Errors
///
/// Returns error if the list is empty or any pattern is invalid.
pub fn package_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PackagePattern>, ModelError> {
    if patterns.is_empty() {
        return Err(ModelError::NoPatterns);
    }
    patterns
        .iter()
        .map(|p| PackagePattern::new(p.as_ref()).map_err(ModelError::from))
        .collect()
}

/// A validated regular expression over fully qualified class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern(String);

impl NamePattern {
    /// Creates a new name pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the expression does not compile.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        regex::Regex::new(pattern).map_err(|e| ModelError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(pattern.to_string()))
    }

    /// Returns the expression as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ────────────────────────────────────────────
// Scopes
// ────────────────────────────────────────────

/// A named set of classes, selected by package.
#[derive(Debug, Clone)]
pub struct Scope {
    name: ScopeName,
    packages: Vec<PackagePattern>,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub fn new(name: ScopeName, packages: Vec<PackagePattern>) -> Self {
        Self { name, packages }
    }

    /// Returns the scope name.
    #[must_use]
    pub fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Returns the package patterns.
    #[must_use]
    pub fn packages(&self) -> &[PackagePattern] {
        &self.packages
    }

    /// Tests whether a package belongs to this scope.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p.matches(package))
    }
}

/// Where a rule applies: a named scope or inline package patterns.
#[derive(Debug, Clone)]
pub enum ScopeRef {
    /// Reference to a `[[scopes]]` entry.
    Named(ScopeName),
    /// Inline `packages = [...]`.
    Inline(Vec<PackagePattern>),
}

// ────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────

/// Classes in scope must not access targets in denied packages.
#[derive(Debug, Clone)]
pub struct RestrictAccess {
    name: String,
    scope: ScopeRef,
    deny: Vec<PackagePattern>,
    kinds: Vec<AccessKind>,
    message: String,
    doc_ref: Option<String>,
    severity: Severity,
}

impl RestrictAccess {
    /// Creates a new restrict-access rule.
    #[must_use]
    pub fn new(
        name: String,
        scope: ScopeRef,
        deny: Vec<PackagePattern>,
        kinds: Vec<AccessKind>,
        message: String,
        doc_ref: Option<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name,
            scope,
            deny,
            kinds,
            message,
            doc_ref,
            severity,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope reference.
    #[must_use]
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Returns the denied target packages.
    #[must_use]
    pub fn deny(&self) -> &[PackagePattern] {
        &self.deny
    }

    /// Returns the restricted access kinds; empty means all kinds.
    #[must_use]
    pub fn kinds(&self) -> &[AccessKind] {
        &self.kinds
    }

    /// Returns the rationale.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// A scope dependency constraint: deny dependencies from one scope to others.
#[derive(Debug, Clone)]
pub struct ScopeDep {
    name: Option<String>,
    from: ScopeName,
    to: Vec<ScopeName>,
    message: String,
    doc_ref: Option<String>,
    severity: Severity,
}

impl ScopeDep {
    /// Creates a new scope dependency rule.
    #[must_use]
    pub fn new(
        name: Option<String>,
        from: ScopeName,
        to: Vec<ScopeName>,
        message: String,
        doc_ref: Option<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name,
            from,
            to,
            message,
            doc_ref,
            severity,
        }
    }

    /// Returns the configured name, or one derived from the scopes.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            let to: Vec<&str> = self.to.iter().map(ScopeName::as_str).collect();
            format!("{}-not-depend-on-{}", self.from, to.join("-"))
        })
    }

    /// Returns the source scope.
    #[must_use]
    pub fn from_scope(&self) -> &ScopeName {
        &self.from
    }

    /// Returns the denied target scopes.
    #[must_use]
    pub fn denied_targets(&self) -> &[ScopeName] {
        &self.to
    }

    /// Returns the rationale.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Checks if a target scope is denied.
    #[must_use]
    pub fn is_denied(&self, target: &ScopeName) -> bool {
        self.to.contains(target)
    }
}

/// What a class name must look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRule {
    /// Simple name ends with the text.
    Suffix(String),
    /// Simple name starts with the text.
    Prefix(String),
    /// Fully qualified name matches the expression.
    Pattern(NamePattern),
}

/// A naming convention for the classes in a scope.
#[derive(Debug, Clone)]
pub struct Naming {
    name: String,
    scope: ScopeRef,
    rule: NameRule,
    message: Option<String>,
    doc_ref: Option<String>,
    severity: Severity,
}

impl Naming {
    /// Creates a new naming convention.
    #[must_use]
    pub fn new(
        name: String,
        scope: ScopeRef,
        rule: NameRule,
        message: Option<String>,
        doc_ref: Option<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name,
            scope,
            rule,
            message,
            doc_ref,
            severity,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope reference.
    #[must_use]
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Returns the required name shape.
    #[must_use]
    pub fn rule(&self) -> &NameRule {
        &self.rule
    }

    /// Returns the rationale, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// How `[[free-of-cycles]]` cuts the graph into slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceSpec {
    /// One slice per package.
    Package,
    /// Slices named by the capture groups of a pattern.
    Pattern(PackagePattern),
}

impl SliceSpec {
    /// Parses `"package"` or a package pattern with a capture group.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is invalid or has no capture group.
    pub fn new(value: &str) -> Result<Self, ModelError> {
        if value == "package" {
            return Ok(Self::Package);
        }
        let pattern = PackagePattern::new(value)?;
        if pattern.group_count() == 0 {
            return Err(ModelError::NoCaptureGroup {
                pattern: value.to_string(),
            });
        }
        Ok(Self::Pattern(pattern))
    }
}

/// Slices must not depend on each other cyclically.
#[derive(Debug, Clone)]
pub struct FreeOfCycles {
    name: String,
    slices: SliceSpec,
    message: Option<String>,
    doc_ref: Option<String>,
    severity: Severity,
}

impl FreeOfCycles {
    /// Creates a new cycle-freedom rule.
    #[must_use]
    pub fn new(
        name: String,
        slices: SliceSpec,
        message: Option<String>,
        doc_ref: Option<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name,
            slices,
            message,
            doc_ref,
            severity,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the slicing.
    #[must_use]
    pub fn slices(&self) -> &SliceSpec {
        &self.slices
    }

    /// Returns the rationale, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated declarative configuration.
///
/// All cross-references are verified at construction time.
/// This is the aggregate root; all queries go through here.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeConfig {
    scopes: HashMap<ScopeName, Scope>,
    restrict_accesses: Vec<RestrictAccess>,
    scope_deps: Vec<ScopeDep>,
    namings: Vec<Naming>,
    cycle_rules: Vec<FreeOfCycles>,
}

impl DeclarativeConfig {
    /// Creates a new declarative config with full validation.
    ///
    /// # Errors
    ///
    /// Returns errors if any cross-references are invalid
    /// (e.g., named scope ref that doesn't exist) or a scope is defined twice.
    pub fn new(
        scopes: Vec<Scope>,
        restrict_accesses: Vec<RestrictAccess>,
        scope_deps: Vec<ScopeDep>,
        namings: Vec<Naming>,
        cycle_rules: Vec<FreeOfCycles>,
    ) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();
        let mut scope_map: HashMap<ScopeName, Scope> = HashMap::new();
        for scope in scopes {
            if scope_map.contains_key(&scope.name) {
                errors.push(ModelError::DuplicateScope {
                    name: scope.name.clone(),
                });
            } else {
                scope_map.insert(scope.name.clone(), scope);
            }
        }

        let mut check_ref = |context: String, scope_ref: &ScopeRef| {
            if let ScopeRef::Named(name) = scope_ref {
                if !scope_map.contains_key(name) {
                    errors.push(ModelError::UnknownScope {
                        context,
                        name: name.clone(),
                    });
                }
            }
        };
        for rule in &restrict_accesses {
            check_ref(format!("restrict-access '{}'", rule.name), &rule.scope);
        }
        for rule in &namings {
            check_ref(format!("naming '{}'", rule.name), &rule.scope);
        }

        for dep in &scope_deps {
            if !scope_map.contains_key(&dep.from) {
                errors.push(ModelError::UnknownScope {
                    context: "deny-scope-dep.from".to_string(),
                    name: dep.from.clone(),
                });
            }
            for target in &dep.to {
                if !scope_map.contains_key(target) {
                    errors.push(ModelError::UnknownScope {
                        context: format!("deny-scope-dep.to (from '{}')", dep.from),
                        name: target.clone(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(Self {
                scopes: scope_map,
                restrict_accesses,
                scope_deps,
                namings,
                cycle_rules,
            })
        } else {
            Err(errors)
        }
    }

    /// Creates an empty declarative config (no declarative rules).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no declarative rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restrict_accesses.is_empty()
            && self.scope_deps.is_empty()
            && self.namings.is_empty()
            && self.cycle_rules.is_empty()
    }

    /// Returns all defined scopes.
    #[must_use]
    pub fn scopes(&self) -> &HashMap<ScopeName, Scope> {
        &self.scopes
    }

    /// Returns all restrict-access rules.
    #[must_use]
    pub fn restrict_accesses(&self) -> &[RestrictAccess] {
        &self.restrict_accesses
    }

    /// Returns all scope dependency rules.
    #[must_use]
    pub fn scope_deps(&self) -> &[ScopeDep] {
        &self.scope_deps
    }

    /// Returns all naming conventions.
    #[must_use]
    pub fn namings(&self) -> &[Naming] {
        &self.namings
    }

    /// Returns all cycle-freedom rules.
    #[must_use]
    pub fn cycle_rules(&self) -> &[FreeOfCycles] {
        &self.cycle_rules
    }

    /// Gets a scope by name.
    #[must_use]
    pub fn scope(&self, name: &ScopeName) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Resolves which scopes a package belongs to, sorted by name.
    #[must_use]
    pub fn scopes_for_package(&self, package: &str) -> Vec<&ScopeName> {
        let mut names: Vec<&ScopeName> = self
            .scopes
            .values()
            .filter(|s| s.contains(package))
            .map(Scope::name)
            .collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }

    /// Returns the package patterns a scope reference stands for.
    #[must_use]
    pub fn scope_ref_patterns<'a>(&'a self, scope_ref: &'a ScopeRef) -> Option<&'a [PackagePattern]> {
        match scope_ref {
            ScopeRef::Named(name) => self.scopes.get(name).map(Scope::packages),
            ScopeRef::Inline(patterns) => Some(patterns.as_slice()),
        }
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Scope name is empty.
    #[error("scope name must not be empty")]
    EmptyScopeName,

    /// Scope name contains invalid characters.
    #[error("invalid scope name `{name}`: must be [a-z0-9-]")]
    InvalidScopeName {
        /// The invalid name.
        name: String,
    },

    /// A pattern list is empty.
    #[error("at least one package pattern is required")]
    NoPatterns,

    /// Package pattern has invalid syntax.
    #[error(transparent)]
    InvalidPackagePattern(#[from] PatternError),

    /// Name pattern is not a valid regular expression.
    #[error("invalid name pattern `{pattern}`: {reason}")]
    InvalidRegex {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// A slice pattern cannot name slices.
    #[error("slice pattern `{pattern}` needs a `(*)` or `(**)` capture group")]
    NoCaptureGroup {
        /// The pattern.
        pattern: String,
    },

    /// Two scopes share a name.
    #[error("scope `{name}` is defined more than once")]
    DuplicateScope {
        /// The repeated name.
        name: ScopeName,
    },

    /// A scope reference points to an undefined scope.
    #[error("{context}: unknown scope `{name}`")]
    UnknownScope {
        /// Where the reference was found.
        context: String,
        /// The undefined scope name.
        name: ScopeName,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(name: &str, packages: &[&str]) -> Scope {
        Scope::new(
            ScopeName::new(name).unwrap(),
            package_patterns(packages).unwrap(),
        )
    }

    // -- ScopeName --

    #[test]
    fn scope_name_valid() {
        assert!(ScopeName::new("domain").is_ok());
        assert!(ScopeName::new("my-scope-123").is_ok());
    }

    #[test]
    fn scope_name_empty_rejected() {
        assert!(matches!(
            ScopeName::new(""),
            Err(ModelError::EmptyScopeName)
        ));
    }

    #[test]
    fn scope_name_invalid_chars_rejected() {
        assert!(matches!(
            ScopeName::new("Domain"),
            Err(ModelError::InvalidScopeName { .. })
        ));
        assert!(matches!(
            ScopeName::new("my_scope"),
            Err(ModelError::InvalidScopeName { .. })
        ));
    }

    // -- Patterns --

    #[test]
    fn package_patterns_reject_empty_list_and_bad_syntax() {
        assert!(matches!(
            package_patterns::<&str>(&[]),
            Err(ModelError::NoPatterns)
        ));
        assert!(matches!(
            package_patterns(&["com...x"]),
            Err(ModelError::InvalidPackagePattern(_))
        ));
    }

    #[test]
    fn scope_contains_package() {
        let s = scope("report", &["..report.."]);
        assert!(s.contains("com.acme.report"));
        assert!(s.contains("com.acme.report.pdf"));
        assert!(!s.contains("com.acme.importer"));
    }

    #[test]
    fn name_pattern_rejects_bad_regex() {
        assert!(NamePattern::new(".*Service").is_ok());
        assert!(matches!(
            NamePattern::new("(unclosed"),
            Err(ModelError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn slice_spec_requires_capture_group() {
        assert_eq!(SliceSpec::new("package").unwrap(), SliceSpec::Package);
        assert!(matches!(
            SliceSpec::new("com.acme.(*).."),
            Ok(SliceSpec::Pattern(_))
        ));
        assert!(matches!(
            SliceSpec::new("com.acme.."),
            Err(ModelError::NoCaptureGroup { .. })
        ));
    }

    // -- Aggregate root --

    #[test]
    fn unknown_scope_references_are_collected() {
        let dep = ScopeDep::new(
            None,
            ScopeName::new("domain").unwrap(),
            vec![ScopeName::new("infra").unwrap()],
            "no".into(),
            None,
            Severity::Error,
        );
        let naming = Naming::new(
            "services".into(),
            ScopeRef::Named(ScopeName::new("missing").unwrap()),
            NameRule::Suffix("Service".into()),
            None,
            None,
            Severity::Warning,
        );
        let errors = DeclarativeConfig::new(
            vec![scope("domain", &["..domain.."])],
            vec![],
            vec![dep],
            vec![naming],
            vec![],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ModelError::UnknownScope { .. })));
    }

    #[test]
    fn duplicate_scopes_are_rejected() {
        let errors = DeclarativeConfig::new(
            vec![scope("domain", &["..a.."]), scope("domain", &["..b.."])],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(errors[0], ModelError::DuplicateScope { .. }));
    }

    #[test]
    fn scopes_for_package_are_sorted() {
        let config = DeclarativeConfig::new(
            vec![
                scope("web", &["..web.."]),
                scope("api", &["..web.api.."]),
                scope("db", &["..db.."]),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        let names: Vec<&str> = config
            .scopes_for_package("com.acme.web.api")
            .into_iter()
            .map(ScopeName::as_str)
            .collect();
        assert_eq!(names, ["api", "web"]);
        assert!(config.is_empty());
    }

    #[test]
    fn scope_dep_default_name() {
        let dep = ScopeDep::new(
            None,
            ScopeName::new("domain").unwrap(),
            vec![
                ScopeName::new("infra").unwrap(),
                ScopeName::new("web").unwrap(),
            ],
            "no".into(),
            None,
            Severity::Error,
        );
        assert_eq!(dep.name(), "domain-not-depend-on-infra-web");
        assert!(dep.is_denied(&ScopeName::new("web").unwrap()));
    }
}
