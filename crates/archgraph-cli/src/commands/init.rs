//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "archgraph.toml";

const DEFAULT_CONFIG: &str = r#"# archgraph configuration

# Severity at which `archgraph check` exits non-zero: error, warning or info
fail_on = "error"

# Treat rules whose scope matched nothing as failures
fail_on_empty_scope = false

[import]
# Skip class files that cannot be decoded (their classes become stubs)
skip_malformed = true
# parallelism = 4

# Named class sets, selected by package pattern
# (`..` matches any number of packages, `*` one package name)
[[scopes]]
name = "report"
packages = ["..report.."]

[[scopes]]
name = "importer"
packages = ["..importer.."]

[[deny-scope-dep]]
from = "report"
to = ["importer"]
message = "Reports must not depend on the importer."

# [[restrict-access]]
# name = "no-jdbc-in-report"
# scope = "report"
# deny = ["java.sql.."]
# kinds = ["method-call"]
# message = "Reports read data through the importer API."

# [[naming]]
# name = "services"
# packages = ["..service.."]
# suffix = "Service"

[[free-of-cycles]]
name = "packages-acyclic"
slices = "package"

# Per-rule overrides
# [rules.packages-acyclic]
# enabled = true
# severity = "warning"
"#;

/// Runs the init command, writing the template into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to describe your architecture");
    println!("  2. Run: archgraph check path/to/classes/**/*.class");

    Ok(())
}
