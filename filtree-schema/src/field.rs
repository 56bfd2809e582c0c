//! Filterable field definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::DataType;

/// Display-only formatter attached to a field.
///
/// Formatters never influence validation; they only shape how a value is shown.
#[derive(Clone)]
pub struct FieldFormatter(Arc<dyn Fn(&serde_json::Value) -> String + Send + Sync>);

impl FieldFormatter {
    /// Wrap a formatting function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Format a value.
    pub fn format(&self, value: &serde_json::Value) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for FieldFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldFormatter(..)")
    }
}

/// A filterable attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    /// Stable identifier referenced by conditions.
    pub id: SmolStr,
    /// Display name.
    pub label: String,
    /// Data type; decides which operators are legal.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Optional display formatter.
    #[serde(skip)]
    pub format: Option<FieldFormatter>,
}

impl FilterField {
    /// Create a new field without a formatter.
    pub fn new(id: impl Into<SmolStr>, label: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data_type,
            format: None,
        }
    }

    /// Attach a display formatter.
    pub fn with_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> String + Send + Sync + 'static,
    {
        self.format = Some(FieldFormatter::new(f));
        self
    }

    /// Get the id as a string slice.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render a value for display, using the formatter when one is set.
    ///
    /// Without a formatter strings are shown unquoted and everything else
    /// as compact JSON.
    pub fn format_value(&self, value: &serde_json::Value) -> String {
        match (&self.format, value) {
            (Some(formatter), _) => formatter.format(value),
            (None, serde_json::Value::String(s)) => s.clone(),
            (None, other) => other.to_string(),
        }
    }
}

/// Field equality ignores the formatter.
impl PartialEq for FilterField {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label && self.data_type == other.data_type
    }
}
