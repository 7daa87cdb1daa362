//! Configuration file resolution and loading.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/archgraph.toml` or `.archgraph.toml`
//! 3. `$ARCHGRAPH_CONFIG_DIR/config.toml` or `~/.archgraph/config.toml`
//! 4. No config found → defaults, no rules
//!
//! The resolved file is read once; its base settings and its declarative
//! rule sections are parsed from the same text.

use anyhow::{Context, Result};
use archgraph_core::{declarative, ArchRuleBox, Config};
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.archgraph/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Base settings plus the rules declared next to them.
pub struct LoadedConfig {
    /// Base settings (`fail_on`, `[import]`, `[rules.*]`).
    pub config: Config,
    /// Rules from the declarative sections, in file order per section.
    pub rules: Vec<ArchRuleBox>,
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["archgraph.toml", ".archgraph.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory path.
///
/// Resolution: `$ARCHGRAPH_CONFIG_DIR` > `~/.archgraph/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ARCHGRAPH_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".archgraph"))
}

/// Reads the resolved file and builds its settings and rules.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if either the base
/// settings or the declarative sections are invalid.
pub fn load(source: &ConfigSource) -> Result<LoadedConfig> {
    let Some(path) = source.path() else {
        return Ok(LoadedConfig {
            config: Config::default(),
            rules: Vec::new(),
        });
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = Config::parse(&content)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let rules = declarative::load_rules_from_toml(&content)
        .with_context(|| format!("Invalid rules in {}", path.display()))?;
    tracing::debug!("Loaded {} rules from {}", rules.len(), path.display());

    Ok(LoadedConfig { config, rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::{ArchRule, Severity};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();

        let project = tmp.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("archgraph.toml"), "").unwrap();

        let result = resolve_inner(&project, Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve_inner(
            Path::new("/tmp"),
            Some(Path::new("/nonexistent.toml")),
            None,
        );
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn project_archgraph_toml_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".archgraph.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".archgraph.toml"))
        );

        fs::write(tmp.path().join("archgraph.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("archgraph.toml"))
        );
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn global_dir_missing_config_file_returns_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn load_default_has_no_rules() {
        let loaded = load(&ConfigSource::Default).unwrap();
        assert!(loaded.rules.is_empty());
        assert_eq!(loaded.config.fail_threshold(), Severity::Error);
    }

    #[test]
    fn load_reads_settings_and_rules_from_one_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("archgraph.toml");
        fs::write(
            &path,
            r#"
fail_on = "warning"

[[free-of-cycles]]
name = "packages"
slices = "package"
"#,
        )
        .unwrap();

        let loaded = load(&ConfigSource::Project(path)).unwrap();
        assert_eq!(loaded.config.fail_threshold(), Severity::Warning);
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.rules[0].name(), "packages");
    }

    #[test]
    fn load_reports_invalid_rules() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("archgraph.toml");
        fs::write(
            &path,
            r#"
[[naming]]
name = "broken"
packages = ["..x.."]
"#,
        )
        .unwrap();

        let err = load(&ConfigSource::Explicit(path)).err().unwrap();
        assert!(format!("{err:#}").contains("exactly one of `suffix`, `prefix` or `pattern`"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        assert!(load(&ConfigSource::Explicit(PathBuf::from("/nonexistent/archgraph.toml"))).is_err());
    }
}
