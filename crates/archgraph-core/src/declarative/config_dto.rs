//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative rules.
///
/// Shares the file with the base `Config`; only the `[[scopes]]`,
/// `[[restrict-access]]`, `[[deny-scope-dep]]`, `[[naming]]` and
/// `[[free-of-cycles]]` sections are read here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Named scope definitions.
    #[serde(rename = "scopes", default)]
    pub scopes: Vec<ScopeDto>,

    /// Access-restriction rules.
    #[serde(rename = "restrict-access", default)]
    pub restrict_access: Vec<RestrictAccessDto>,

    /// Scope dependency constraints.
    #[serde(rename = "deny-scope-dep", default)]
    pub deny_scope_dep: Vec<ScopeDepDto>,

    /// Naming conventions.
    #[serde(rename = "naming", default)]
    pub naming: Vec<NamingDto>,

    /// Cycle-freedom rules.
    #[serde(rename = "free-of-cycles", default)]
    pub free_of_cycles: Vec<FreeOfCyclesDto>,
}

/// TOML representation of a named scope.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeDto {
    /// Scope name (e.g., "report").
    pub name: String,
    /// Package patterns (e.g., `..report..`).
    pub packages: Vec<String>,
}

/// TOML representation of a restrict-access rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RestrictAccessDto {
    /// Rule name (e.g., "report-not-importer").
    pub name: String,
    /// Named scope reference (mutually exclusive with `packages`).
    #[serde(default)]
    pub scope: Option<String>,
    /// Inline package patterns (mutually exclusive with `scope`).
    #[serde(default)]
    pub packages: Option<Vec<String>>,
    /// Denied target package patterns.
    pub deny: Vec<String>,
    /// Restricted access kinds (default: all).
    #[serde(default)]
    pub kinds: Vec<String>,
    /// Rationale.
    pub message: String,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// TOML representation of a scope dependency constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeDepDto {
    /// Optional rule name (e.g., "no-domain-to-infra").
    #[serde(default)]
    pub name: Option<String>,
    /// Source scope name.
    pub from: String,
    /// Denied target scope names.
    pub to: Vec<String>,
    /// Rationale.
    pub message: String,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// TOML representation of a naming convention.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingDto {
    /// Rule name.
    pub name: String,
    /// Named scope reference.
    #[serde(default)]
    pub scope: Option<String>,
    /// Inline package patterns.
    #[serde(default)]
    pub packages: Option<Vec<String>>,
    /// Required simple-name suffix.
    #[serde(default)]
    pub suffix: Option<String>,
    /// Required simple-name prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Required fully qualified name regex.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Rationale.
    #[serde(default)]
    pub message: Option<String>,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Severity (default: "warning").
    #[serde(default = "default_severity_warning_str")]
    pub severity: String,
}

/// TOML representation of a cycle-freedom rule.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeOfCyclesDto {
    /// Rule name.
    pub name: String,
    /// `"package"` or a package pattern with a capture group.
    pub slices: String,
    /// Rationale.
    #[serde(default)]
    pub message: Option<String>,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_severity_warning_str() -> String {
    "warning".to_string()
}
