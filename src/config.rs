//! Configuration file support for sbom-assembler.
//!
//! Provides YAML-based configuration through `sbom-assembler.config.yml`
//! files, including data structures, file loading, and validation.
//! Command-line flags always override values read here.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::application::dto::OutputFormat;
use crate::sbom_generation::domain::{ComponentType, SpecVersion};
use crate::sbom_generation::services::ProjectIdentity;
use crate::shared::security::read_checked_file;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "sbom-assembler.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub spec_version: Option<String>,
    pub required_only: Option<bool>,
    pub only: Option<Vec<String>>,
    pub filter: Option<Vec<String>>,
    pub auto_compositions: Option<bool>,
    pub authors: Option<Vec<String>>,
    pub project_name: Option<String>,
    pub project_group: Option<String>,
    pub project_version: Option<String>,
    pub project_type: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(|f| f.parse::<OutputFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }

    pub fn spec_version(&self) -> Result<Option<SpecVersion>> {
        self.spec_version
            .as_deref()
            .map(str::parse::<SpecVersion>)
            .transpose()
    }

    /// Explicit project identity, present only when `project_name` is set
    pub fn project_identity(&self) -> Result<Option<ProjectIdentity>> {
        let Some(name) = self.project_name.as_deref().filter(|n| !n.trim().is_empty()) else {
            return Ok(None);
        };
        let component_type = self
            .project_type
            .as_deref()
            .map(str::parse::<ComponentType>)
            .transpose()?;

        Ok(Some(ProjectIdentity {
            name: name.trim().to_string(),
            group: self.project_group.clone(),
            version: self.project_version.clone(),
            component_type,
        }))
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_checked_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Err(e) = config.output_format() {
        bail!("Invalid config: format: {}", e);
    }
    if let Err(e) = config.spec_version() {
        bail!("Invalid config: spec_version: {}", e);
    }
    if let Err(e) = config.project_identity() {
        bail!("Invalid config: project_type: {}", e);
    }
    for (key, values) in [("only", &config.only), ("filter", &config.filter)] {
        if let Some(values) = values {
            if let Some(i) = values.iter().position(|v| v.trim().is_empty()) {
                bail!(
                    "Invalid config: {}[{}] must not be empty.\n\n\
                     💡 Hint: Each entry is a substring matched against component purls.",
                    key,
                    i
                );
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "unknown config field will be ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
format: xml
spec_version: "1.5"
required_only: true
only:
  - pkg:npm
filter:
  - "@types"
auto_compositions: false
authors:
  - Platform Team
project_name: shop
project_group: acme
project_version: 2.0.0
project_type: container
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.output_format().unwrap(), Some(OutputFormat::Xml));
        assert_eq!(config.spec_version().unwrap(), Some(SpecVersion::V1_5));
        assert_eq!(config.required_only, Some(true));
        assert_eq!(config.only.as_deref(), Some(&["pkg:npm".to_string()][..]));
        assert_eq!(config.filter.as_deref(), Some(&["@types".to_string()][..]));
        assert_eq!(config.auto_compositions, Some(false));
        assert_eq!(config.authors.clone().unwrap(), vec!["Platform Team".to_string()]);

        let identity = config.project_identity().unwrap().unwrap();
        assert_eq!(identity.name, "shop");
        assert_eq!(identity.group.as_deref(), Some("acme"));
        assert_eq!(identity.version.as_deref(), Some("2.0.0"));
        assert_eq!(identity.component_type, Some(ComponentType::Container));
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "format: json\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.output_format().unwrap(), Some(OutputFormat::Json));
        assert!(config.project_identity().unwrap().is_none());
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_spec_version_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "spec_version: \"2.0\"\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("spec_version"));
        assert!(err.contains("2.0"));
    }

    #[test]
    fn test_empty_filter_entry_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "filter:\n  - \"\"\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("filter[0] must not be empty"));
    }

    #[test]
    fn test_unknown_fields_are_captured() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "format: json\ncheck_cve: true\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert!(config.unknown_fields.contains_key("check_cve"));
    }
}
