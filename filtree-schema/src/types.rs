//! Data types that determine which comparison operators a field accepts.

use serde::{Deserialize, Serialize};

/// The data type of a filterable field.
///
/// `Numeric` and `Datetime` are aliases of `Number` and `Date`; use
/// [`DataType::canonical`] to collapse them before looking up operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Numeric values.
    Number,
    /// Alias of [`DataType::Number`].
    Numeric,
    /// Text values.
    String,
    /// Calendar dates.
    Date,
    /// Alias of [`DataType::Date`].
    Datetime,
    /// True/false values.
    Boolean,
    /// Structured objects. Not filterable by comparison.
    Object,
    /// Arrays. Not filterable by comparison.
    Array,
}

impl DataType {
    /// Every data type in declaration order.
    pub const ALL: [DataType; 8] = [
        Self::Number,
        Self::Numeric,
        Self::String,
        Self::Date,
        Self::Datetime,
        Self::Boolean,
        Self::Object,
        Self::Array,
    ];

    /// Parse a data type from its lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "number" => Some(Self::Number),
            "numeric" => Some(Self::Numeric),
            "string" => Some(Self::String),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::Datetime),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Get the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Collapse alias types onto the type whose operator set they share.
    pub fn canonical(self) -> Self {
        match self {
            Self::Numeric => Self::Number,
            Self::Datetime => Self::Date,
            other => other,
        }
    }

    /// Whether values of this type can be compared with operators at all.
    pub fn is_filterable(&self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
