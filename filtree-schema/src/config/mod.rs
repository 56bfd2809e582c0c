//! Configuration file parsing for `filtree.toml`.
//!
//! ```toml
//! [[fields]]
//! id = "age"
//! label = "Age"
//! type = "number"
//!
//! [validation]
//! require_value_for_valueless_operators = false
//!
//! [limits]
//! max_depth = 16
//!
//! [localization]
//! equals = "Is"
//!
//! [logging]
//! level = "debug"
//! format = "pretty"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FilterField;
use crate::registry::FieldRegistry;
use crate::types::DataType;

/// Main configuration structure for `filtree.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FiltreeConfig {
    /// Filterable fields, in display order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    /// Validation behavior.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Limits applied when decoding untrusted payloads.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Label overrides keyed by operator or UI key.
    #[serde(default)]
    pub localization: IndexMap<String, String>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FiltreeConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SchemaResult<Self> {
        let expanded = expand_env_vars(content);

        let config: Self =
            toml::from_str(&expanded).map_err(|e| SchemaError::TomlError { source: e })?;
        config.limits.check()?;
        config.logging.check()?;
        tracing::debug!(
            fields = config.fields.len(),
            overrides = config.localization.len(),
            "Loaded filtree configuration"
        );
        Ok(config)
    }

    /// Build the field registry described by `[[fields]]`.
    pub fn registry(&self) -> SchemaResult<FieldRegistry> {
        FieldRegistry::new(self.fields.iter().cloned().map(FilterField::from))
    }
}

/// A field entry in `[[fields]]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Field id.
    pub id: SmolStr,
    /// Display label; defaults to the id.
    #[serde(default)]
    pub label: Option<String>,
    /// Data type.
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl From<FieldConfig> for FilterField {
    fn from(config: FieldConfig) -> Self {
        let label = config.label.unwrap_or_else(|| config.id.to_string());
        FilterField::new(config.id, label, config.data_type)
    }
}

/// Validation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Report a missing value even for `isBlank` / `isNotBlank`.
    #[serde(default)]
    pub require_value_for_valueless_operators: bool,
}

/// Decoding limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum nesting depth of groups.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum size of a JSON payload in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// Maximum number of nodes in one tree.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_payload_bytes: default_max_payload_bytes(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl LimitsConfig {
    fn check(&self) -> SchemaResult<()> {
        if self.max_depth == 0 || self.max_payload_bytes == 0 || self.max_nodes == 0 {
            return Err(SchemaError::config("limits must be greater than zero"));
        }
        Ok(())
    }
}

fn default_max_depth() -> usize { 32 }
fn default_max_payload_bytes() -> usize { 64 * 1024 }
fn default_max_nodes() -> usize { 1000 }

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    /// Get the format name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default)]
    pub level: Option<String>,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    fn check(&self) -> SchemaResult<()> {
        match self.level.as_deref() {
            None | Some("trace" | "debug" | "info" | "warn" | "error") => Ok(()),
            Some(other) => Err(SchemaError::config(format!("unknown log level `{}`", other))),
        }
    }
}

/// Expand `${VAR}` references from the environment. Unset variables are left as-is.
fn expand_env_vars(content: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return content.to_string();
    };

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let full_match = &cap[0];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = FiltreeConfig::default();
        assert!(config.fields.is_empty());
        assert_eq!(config.limits.max_depth, 32);
        assert_eq!(config.limits.max_payload_bytes, 65536);
        assert!(!config.validation.require_value_for_valueless_operators);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_fields() {
        let config = FiltreeConfig::from_str(
            r#"
            [[fields]]
            id = "age"
            label = "Age"
            type = "number"

            [[fields]]
            id = "created"
            type = "datetime"
            "#,
        )
        .unwrap();

        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("created").unwrap().label, "created");
        assert_eq!(registry.get("created").unwrap().data_type, DataType::Datetime);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = FiltreeConfig::from_str(
            r#"
            [validation]
            strict = true
            "#,
        );
        assert!(matches!(result, Err(SchemaError::TomlError { .. })));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = FiltreeConfig::from_str(
            r#"
            [[fields]]
            id = "x"
            type = "money"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = FiltreeConfig::from_str(
            r#"
            [limits]
            max_depth = 0
            "#,
        );
        assert!(matches!(result, Err(SchemaError::ConfigError { .. })));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let result = FiltreeConfig::from_str(
            r#"
            [logging]
            level = "loud"
            "#,
        );
        assert!(matches!(result, Err(SchemaError::ConfigError { .. })));
    }

    #[test]
    fn test_localization_overrides_keep_order() {
        let config = FiltreeConfig::from_str(
            r#"
            [localization]
            equals = "Is"
            between = "In range"
            "#,
        )
        .unwrap();
        let keys: Vec<_> = config.localization.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["equals", "between"]);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: test-local variable name, not read elsewhere.
        unsafe { std::env::set_var("FILTREE_TEST_LABEL", "Years") };
        let config = FiltreeConfig::from_str(
            r#"
            [[fields]]
            id = "age"
            label = "${FILTREE_TEST_LABEL}"
            type = "number"
            "#,
        )
        .unwrap();
        assert_eq!(config.fields[0].label.as_deref(), Some("Years"));
    }

    #[test]
    fn test_unset_env_var_left_untouched() {
        let expanded = expand_env_vars("label = \"${FILTREE_SURELY_UNSET_VAR}\"");
        assert_eq!(expanded, "label = \"${FILTREE_SURELY_UNSET_VAR}\"");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtree.toml");
        std::fs::write(&path, "[[fields]]\nid = \"flag\"\ntype = \"boolean\"\n").unwrap();

        let config = FiltreeConfig::from_file(&path).unwrap();
        assert_eq!(config.fields.len(), 1);

        let missing = FiltreeConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(SchemaError::IoError { .. })));
    }
}
