//! Operator catalogs keyed by data type.
//!
//! Each data type maps to a fixed, ordered table of legal operators.
//! The tables never change at runtime.
//!
//! ```rust
//! use filtree_query::operators::{default_operator, is_valid_operator, operators_for};
//! use filtree_schema::DataType;
//!
//! let ops: Vec<_> = operators_for(DataType::Boolean).iter().map(|op| op.value).collect();
//! assert_eq!(ops, ["equals", "notEquals"]);
//!
//! assert!(is_valid_operator("between", DataType::Numeric));
//! assert!(!is_valid_operator("contains", DataType::Number));
//! assert_eq!(default_operator(DataType::Date), "equals");
//! ```

use std::fmt;

use filtree_schema::DataType;
use serde::{Deserialize, Serialize};

/// Operator keys.
pub mod operator_keys {
    /// Logical AND.
    pub const AND: &str = "AND";
    /// Logical OR.
    pub const OR: &str = "OR";
    /// Equality.
    pub const EQUALS: &str = "equals";
    /// Inequality.
    pub const NOT_EQUALS: &str = "notEquals";
    /// Substring match.
    pub const CONTAINS: &str = "contains";
    /// Prefix match.
    pub const STARTS_WITH: &str = "startsWith";
    /// Suffix match.
    pub const ENDS_WITH: &str = "endsWith";
    /// Value is blank.
    pub const IS_BLANK: &str = "isBlank";
    /// Value is not blank.
    pub const IS_NOT_BLANK: &str = "isNotBlank";
    /// Strictly greater.
    pub const GREATER_THAN: &str = "greaterThan";
    /// Strictly less.
    pub const LESS_THAN: &str = "lessThan";
    /// Greater or equal.
    pub const GREATER_THAN_OR_EQUAL: &str = "greaterThanOrEqual";
    /// Less or equal.
    pub const LESS_THAN_OR_EQUAL: &str = "lessThanOrEqual";
    /// Inclusive range; the value is a two-element list.
    pub const BETWEEN: &str = "between";
    /// Earlier date.
    pub const BEFORE: &str = "before";
    /// Later date.
    pub const AFTER: &str = "after";
}

use operator_keys::*;

/// Seed operator handed out when a type has no operators.
///
/// Not guaranteed to be valid for that type.
pub const DEFAULT_OPERATOR_FALLBACK: &str = EQUALS;

/// An operator key with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FilterOperator {
    /// Semantic key used by validation.
    pub value: &'static str,
    /// Display label.
    pub label: &'static str,
}

impl FilterOperator {
    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Group combinators.
pub const LOGICAL_OPERATORS: &[FilterOperator] = &[
    FilterOperator::new(AND, "AND"),
    FilterOperator::new(OR, "OR"),
];

/// Operators for `string` fields.
pub const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::new(EQUALS, "Equals"),
    FilterOperator::new(CONTAINS, "Contains"),
    FilterOperator::new(STARTS_WITH, "Starts with"),
    FilterOperator::new(ENDS_WITH, "Ends with"),
    FilterOperator::new(IS_BLANK, "Is blank"),
    FilterOperator::new(IS_NOT_BLANK, "Is not blank"),
];

/// Operators for `number` and `numeric` fields.
pub const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::new(EQUALS, "Equals"),
    FilterOperator::new(NOT_EQUALS, "Not equals"),
    FilterOperator::new(GREATER_THAN, "Greater than"),
    FilterOperator::new(LESS_THAN, "Less than"),
    FilterOperator::new(GREATER_THAN_OR_EQUAL, "Greater than or equal"),
    FilterOperator::new(LESS_THAN_OR_EQUAL, "Less than or equal"),
    FilterOperator::new(BETWEEN, "Between"),
];

/// Operators for `date` and `datetime` fields.
pub const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::new(EQUALS, "Equals"),
    FilterOperator::new(NOT_EQUALS, "Not equals"),
    FilterOperator::new(BEFORE, "Before"),
    FilterOperator::new(AFTER, "After"),
    FilterOperator::new(BETWEEN, "Between"),
];

/// Operators for `boolean` fields.
pub const BOOLEAN_OPERATORS: &[FilterOperator] = &[
    FilterOperator::new(EQUALS, "Equals"),
    FilterOperator::new(NOT_EQUALS, "Not equals"),
];

/// The ordered operator table for a data type.
///
/// `object` and `array` have no comparison operators.
pub fn operators_for(data_type: DataType) -> &'static [FilterOperator] {
    match data_type.canonical() {
        DataType::String => STRING_OPERATORS,
        DataType::Number => NUMBER_OPERATORS,
        DataType::Date => DATE_OPERATORS,
        DataType::Boolean => BOOLEAN_OPERATORS,
        _ => &[],
    }
}

/// Whether `operator` is legal for `data_type`, compared by key.
pub fn is_valid_operator(operator: &str, data_type: DataType) -> bool {
    operators_for(data_type).iter().any(|op| op.value == operator)
}

/// The first operator of the type's table, or [`DEFAULT_OPERATOR_FALLBACK`].
pub fn default_operator(data_type: DataType) -> &'static str {
    operators_for(data_type)
        .first()
        .map(|op| op.value)
        .unwrap_or(DEFAULT_OPERATOR_FALLBACK)
}

/// Operators that test a field on its own and take no comparand.
pub fn is_valueless_operator(operator: &str) -> bool {
    matches!(operator, IS_BLANK | IS_NOT_BLANK)
}

/// The combinator of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    /// Every child must match.
    #[default]
    #[serde(rename = "AND")]
    And,
    /// Any child may match.
    #[serde(rename = "OR")]
    Or,
}

impl LogicalOperator {
    /// Parse `AND` / `OR`. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            AND => Some(Self::And),
            OR => Some(Self::Or),
            _ => None,
        }
    }

    /// Get the operator key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => AND,
            Self::Or => OR,
        }
    }

    /// The other combinator.
    pub fn toggled(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
