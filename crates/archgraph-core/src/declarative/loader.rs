//! DTO → Domain model conversion with validation.

use crate::raw::AccessKind;
use crate::types::Severity;

use super::config_dto::{
    DeclarativeConfigDto, FreeOfCyclesDto, NamingDto, RestrictAccessDto, ScopeDepDto, ScopeDto,
};
use super::model::{
    package_patterns, DeclarativeConfig, FreeOfCycles, ModelError, NamePattern, NameRule, Naming,
    RestrictAccess, Scope, ScopeDep, ScopeName, ScopeRef, SliceSpec,
};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "scopes[0].name").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// The `scope` and `packages` fields are both set or both missing.
    #[error("{rule_name}: exactly one of `scope` or `packages` must be set")]
    AmbiguousScope {
        /// The rule that has the conflict.
        rule_name: String,
    },

    /// A naming rule sets zero or several of `suffix`, `prefix`, `pattern`.
    #[error("naming '{rule_name}': exactly one of `suffix`, `prefix` or `pattern` must be set")]
    AmbiguousNaming {
        /// The rule that has the conflict.
        rule_name: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown access kind string.
    #[error("{context}: unknown access kind `{value}`")]
    UnknownAccessKind {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn validation(context: impl Into<String>) -> impl FnOnce(ModelError) -> LoadError {
    let context = context.into();
    move |source| LoadError::Validation { context, source }
}

/// Converts a `DeclarativeConfigDto` to a validated `DeclarativeConfig`.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: DeclarativeConfigDto) -> Result<DeclarativeConfig, LoadError> {
    let scopes = dto
        .scopes
        .iter()
        .enumerate()
        .map(|(i, s)| convert_scope(s, i))
        .collect::<Result<Vec<_>, _>>()?;

    let restrict_accesses = dto
        .restrict_access
        .into_iter()
        .map(convert_restrict_access)
        .collect::<Result<Vec<_>, _>>()?;

    let scope_deps = dto
        .deny_scope_dep
        .into_iter()
        .enumerate()
        .map(|(i, d)| convert_scope_dep(d, i))
        .collect::<Result<Vec<_>, _>>()?;

    let namings = dto
        .naming
        .into_iter()
        .map(convert_naming)
        .collect::<Result<Vec<_>, _>>()?;

    let cycle_rules = dto
        .free_of_cycles
        .into_iter()
        .map(convert_free_of_cycles)
        .collect::<Result<Vec<_>, _>>()?;

    DeclarativeConfig::new(scopes, restrict_accesses, scope_deps, namings, cycle_rules)
        .map_err(LoadError::CrossRef)
}

fn convert_scope(dto: &ScopeDto, index: usize) -> Result<Scope, LoadError> {
    let ctx = format!("scopes[{index}]");
    let name = ScopeName::new(&dto.name).map_err(validation(format!("{ctx}.name")))?;
    let packages = package_patterns(&dto.packages).map_err(validation(format!("{ctx}.packages")))?;
    Ok(Scope::new(name, packages))
}

fn resolve_scope_ref(
    scope: Option<String>,
    packages: Option<Vec<String>>,
    context: &str,
) -> Result<ScopeRef, LoadError> {
    match (scope, packages) {
        (Some(name), None) => {
            let scope_name =
                ScopeName::new(&name).map_err(validation(format!("{context}.scope")))?;
            Ok(ScopeRef::Named(scope_name))
        }
        (None, Some(patterns)) => {
            let compiled =
                package_patterns(&patterns).map_err(validation(format!("{context}.packages")))?;
            Ok(ScopeRef::Inline(compiled))
        }
        _ => Err(LoadError::AmbiguousScope {
            rule_name: context.to_string(),
        }),
    }
}

fn convert_restrict_access(dto: RestrictAccessDto) -> Result<RestrictAccess, LoadError> {
    let ctx = format!("restrict-access '{}'", dto.name);
    let scope = resolve_scope_ref(dto.scope, dto.packages, &ctx)?;
    let deny = package_patterns(&dto.deny).map_err(validation(format!("{ctx}.deny")))?;

    let kinds = dto
        .kinds
        .iter()
        .enumerate()
        .map(|(i, k)| {
            AccessKind::from_name(k).ok_or_else(|| LoadError::UnknownAccessKind {
                context: format!("{ctx}.kinds[{i}]"),
                value: k.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let severity = parse_severity(&dto.severity, &ctx)?;

    Ok(RestrictAccess::new(
        dto.name,
        scope,
        deny,
        kinds,
        dto.message,
        dto.doc,
        severity,
    ))
}

fn convert_scope_dep(dto: ScopeDepDto, index: usize) -> Result<ScopeDep, LoadError> {
    let ctx = format!("deny-scope-dep[{index}]");
    let from = ScopeName::new(&dto.from).map_err(validation(format!("{ctx}.from")))?;

    let to = dto
        .to
        .iter()
        .enumerate()
        .map(|(i, name)| ScopeName::new(name).map_err(validation(format!("{ctx}.to[{i}]"))))
        .collect::<Result<Vec<_>, _>>()?;

    let severity = parse_severity(&dto.severity, &ctx)?;

    Ok(ScopeDep::new(
        dto.name,
        from,
        to,
        dto.message,
        dto.doc,
        severity,
    ))
}

fn convert_naming(dto: NamingDto) -> Result<Naming, LoadError> {
    let ctx = format!("naming '{}'", dto.name);
    let scope = resolve_scope_ref(dto.scope, dto.packages, &ctx)?;

    let rule = match (dto.suffix, dto.prefix, dto.pattern) {
        (Some(suffix), None, None) => NameRule::Suffix(suffix),
        (None, Some(prefix), None) => NameRule::Prefix(prefix),
        (None, None, Some(pattern)) => NameRule::Pattern(
            NamePattern::new(&pattern).map_err(validation(format!("{ctx}.pattern")))?,
        ),
        _ => {
            return Err(LoadError::AmbiguousNaming {
                rule_name: dto.name,
            })
        }
    };

    let severity = parse_severity(&dto.severity, &ctx)?;

    Ok(Naming::new(
        dto.name,
        scope,
        rule,
        dto.message,
        dto.doc,
        severity,
    ))
}

fn convert_free_of_cycles(dto: FreeOfCyclesDto) -> Result<FreeOfCycles, LoadError> {
    let ctx = format!("free-of-cycles '{}'", dto.name);
    let slices = SliceSpec::new(&dto.slices).map_err(validation(format!("{ctx}.slices")))?;
    let severity = parse_severity(&dto.severity, &ctx)?;
    Ok(FreeOfCycles::new(
        dto.name,
        slices,
        dto.message,
        dto.doc,
        severity,
    ))
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(value).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}
