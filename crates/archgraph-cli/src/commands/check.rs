//! Check command implementation.

use anyhow::{Context, Result};
use archgraph_core::{Evaluator, Importer};
use std::path::PathBuf;

use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `true` if the report fails the configured policy.
pub fn run(artifacts: &[PathBuf], format: OutputFormat, source: &ConfigSource) -> Result<bool> {
    let loaded = config_resolver::load(source)?;
    if loaded.rules.is_empty() {
        tracing::warn!("No rules configured; nothing will be checked");
    }
    let fail_on = loaded.config.fail_threshold();
    let fail_on_empty_scope = loaded.config.fail_on_empty_scope;

    let import = Importer::from_config(&loaded.config.import)
        .import_paths(artifacts)
        .context("Import failed")?;
    for skipped in &import.skipped {
        tracing::warn!("Skipped {}: {}", skipped.artifact, skipped.error);
    }

    let evaluator = Evaluator::builder()
        .rules(loaded.rules)
        .config(loaded.config)
        .build();

    tracing::info!(
        "Checking {} classes with {} rules",
        import.graph.full_count(),
        evaluator.rule_count()
    );

    let report = evaluator.evaluate(&import.graph);

    super::output::print(&report, format)?;

    Ok(report.fails(fail_on, fail_on_empty_scope))
}
