//! Display labels for operators and editor controls.
//!
//! Lookups never fail: a key with no label (or an empty one) is echoed
//! back unchanged.

use filtree_schema::FiltreeConfig;
use indexmap::IndexMap;

use crate::operators::{
    BOOLEAN_OPERATORS, DATE_OPERATORS, LOGICAL_OPERATORS, NUMBER_OPERATORS, STRING_OPERATORS,
};

/// Keys for editor controls.
pub mod ui_keys {
    /// "Add Condition" button.
    pub const ADD_CONDITION: &str = "addCondition";
    /// "Add Group" button.
    pub const ADD_GROUP: &str = "addGroup";
    /// Remove button.
    pub const REMOVE: &str = "remove";
    /// Clear-all button.
    pub const CLEAR_ALL: &str = "clearAll";
    /// Apply button.
    pub const APPLY: &str = "apply";
    /// Value input placeholder.
    pub const ENTER_VALUE: &str = "enterValue";
    /// Field selector placeholder.
    pub const SELECT_FIELD: &str = "selectField";
    /// Operator selector placeholder.
    pub const SELECT_OPERATOR: &str = "selectOperator";
}

const UI_LABELS: &[(&str, &str)] = &[
    (ui_keys::ADD_CONDITION, "Add Condition"),
    (ui_keys::ADD_GROUP, "Add Group"),
    (ui_keys::REMOVE, "Remove"),
    (ui_keys::CLEAR_ALL, "Clear All"),
    (ui_keys::APPLY, "Apply Filters"),
    (ui_keys::ENTER_VALUE, "Enter value"),
    (ui_keys::SELECT_FIELD, "Select field"),
    (ui_keys::SELECT_OPERATOR, "Select operator"),
];

/// A key to label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    labels: IndexMap<String, String>,
}

impl Default for Localization {
    fn default() -> Self {
        let mut labels = IndexMap::new();

        let operators = [
            LOGICAL_OPERATORS,
            STRING_OPERATORS,
            NUMBER_OPERATORS,
            DATE_OPERATORS,
            BOOLEAN_OPERATORS,
        ];
        for op in operators.into_iter().flatten() {
            labels
                .entry(op.value.to_string())
                .or_insert_with(|| op.label.to_string());
        }
        for (key, label) in UI_LABELS {
            labels.insert((*key).to_string(), (*label).to_string());
        }

        Self { labels }
    }
}

impl Localization {
    /// The built-in English table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with no labels; every lookup echoes its key.
    pub fn empty() -> Self {
        Self {
            labels: IndexMap::new(),
        }
    }

    /// The built-in table with `overrides` applied on top.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        table.extend(overrides);
        table
    }

    /// The built-in table with the `[localization]` section applied.
    pub fn from_config(config: &FiltreeConfig) -> Self {
        Self::with_overrides(
            config
                .localization
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Set or replace one label.
    pub fn set(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(key.into(), label.into());
    }

    /// Look up a label, echoing `key` when there is none.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        match self.labels.get(key) {
            Some(label) if !label.is_empty() => label,
            _ => key,
        }
    }

    /// Whether a label exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Iterate labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Localization {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, label) in iter {
            self.set(key, label);
        }
    }
}

/// Label for an operator key, or the key itself.
pub fn format_operator_label<'a>(operator: &'a str, localization: &'a Localization) -> &'a str {
    localization.label(operator)
}
