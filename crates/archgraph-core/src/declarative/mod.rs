//! Declarative architecture rules driven by TOML configuration.
//!
//! This module provides a scope-based model for defining architecture
//! constraints without writing Rust rule code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! DeclarativeConfig (pure domain model)
//!   ↓ create_rules()
//! Vec<ArchRuleBox>
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;
pub mod rules;

use crate::rule::ArchRuleBox;
use tracing::debug;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),

    /// A validated rule could not be assembled.
    #[error("{0}")]
    Create(#[from] rules::CreateRuleError),
}

/// Parses TOML content and creates all declared rules.
///
/// Returns `Ok(vec![])` if no declarative sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<ArchRuleBox>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    let config = loader::load(dto)?;
    Ok(create_rules(&config)?)
}

/// Creates all declarative rules from a validated [`model::DeclarativeConfig`].
///
/// Rules come out in section order: restrict-access, deny-scope-dep,
/// naming, free-of-cycles; within a section, in file order.
///
/// # Errors
///
/// Returns an error if a rule cannot be assembled from the model.
pub fn create_rules(config: &model::DeclarativeConfig) -> Result<Vec<ArchRuleBox>, rules::CreateRuleError> {
    if config.is_empty() {
        return Ok(vec![]);
    }

    let mut result: Vec<ArchRuleBox> = Vec::new();
    for rule in config.restrict_accesses() {
        result.push(Box::new(rules::restrict_access_rule(config, rule)?));
    }
    for dep in config.scope_deps() {
        result.push(Box::new(rules::scope_dep_rule(config, dep)?));
    }
    for naming in config.namings() {
        result.push(Box::new(rules::naming_rule(config, naming)?));
    }
    for rule in config.cycle_rules() {
        result.push(Box::new(rules::cycle_rule(rule)?));
    }

    debug!("Created {} declarative rules", result.len());
    Ok(result)
}
