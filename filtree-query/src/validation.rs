//! Recursive validation of filter trees against a field registry.
//!
//! Validation never fails: it always returns a [`ValidationResult`]
//! listing zero or more findings. Every rule is evaluated, so several
//! problems on one condition are all reported.
//!
//! Aggregation order for a group is fixed: the group's own findings,
//! then the findings of its conditions in child order, then the findings
//! of its nested groups in child order.
//!
//! ```rust
//! use filtree_query::{validate_condition, Condition};
//! use filtree_schema::{DataType, FieldRegistry, FilterField};
//!
//! let fields = FieldRegistry::new([FilterField::new("age", "Age", DataType::Number)]).unwrap();
//!
//! let ok = Condition::new("age", "between").with_value(vec![18, 65]);
//! assert!(validate_condition(&ok, &fields).is_valid);
//!
//! let bad = Condition::new("age", "contains").with_value("x");
//! let result = validate_condition(&bad, &fields);
//! assert_eq!(result.messages(), ["Invalid operator for selected field type"]);
//! ```

use std::fmt;

use filtree_schema::config::ValidationConfig;
use filtree_schema::{DataType, FieldRegistry};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use smol_str::SmolStr;

use crate::node::{Condition, FilterNode, Group};
use crate::operators::{LogicalOperator, is_valid_operator, is_valueless_operator};
use crate::value::FilterValue;
use crate::visitor::FilterVisitor;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFinding {
    /// The condition names no field.
    MissingField,
    /// The condition names a field the registry does not know.
    UnknownField {
        /// The unresolved field id.
        field: SmolStr,
    },
    /// The condition has no operator.
    MissingOperator,
    /// The operator is not legal for the field's data type.
    IncompatibleOperator {
        /// The offending operator key.
        operator: SmolStr,
        /// The field's data type.
        data_type: DataType,
    },
    /// The condition has no value, or an empty string.
    MissingValue,
    /// The group combinator is not `AND`/`OR`.
    InvalidGroupOperator {
        /// The offending operator text.
        operator: String,
    },
}

impl ValidationFinding {
    /// The user-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingField => "Field is required",
            Self::UnknownField { .. } => "Selected field does not exist",
            Self::MissingOperator => "Operator is required",
            Self::IncompatibleOperator { .. } => "Invalid operator for selected field type",
            Self::MissingValue => "Value is required",
            Self::InvalidGroupOperator { .. } => "Invalid group operator",
        }
    }

    /// A stable key for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::UnknownField { .. } => "unknown_field",
            Self::MissingOperator => "missing_operator",
            Self::IncompatibleOperator { .. } => "incompatible_operator",
            Self::MissingValue => "missing_value",
            Self::InvalidGroupOperator { .. } => "invalid_group_operator",
        }
    }

    /// Whether the finding belongs to a group rather than a condition.
    pub fn is_group_level(&self) -> bool {
        matches!(self, Self::InvalidGroupOperator { .. })
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of validating a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub is_valid: bool,
    /// Findings in aggregation order.
    pub errors: Vec<ValidationFinding>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// A result with no findings.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a result from findings.
    pub fn from_findings(errors: Vec<ValidationFinding>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The messages of every finding, in order.
    pub fn messages(&self) -> Vec<&'static str> {
        self.errors.iter().map(ValidationFinding::message).collect()
    }

    /// The first message, if any.
    pub fn first_message(&self) -> Option<&'static str> {
        self.errors.first().map(ValidationFinding::message)
    }

    /// Append another result's findings after this one's.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.is_valid = self.errors.is_empty();
    }
}

/// Serialized as `{"isValid": bool, "errors": [message, ...]}`.
impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("isValid", &self.is_valid)?;
        state.serialize_field("errors", &self.messages())?;
        state.end()
    }
}

/// Knobs for the validation rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report [`ValidationFinding::MissingValue`] even for `isBlank` / `isNotBlank`.
    pub require_value_for_valueless_operators: bool,
}

impl ValidationOptions {
    /// Require a value for every operator.
    pub fn strict() -> Self {
        Self {
            require_value_for_valueless_operators: true,
        }
    }

    /// Options taken from the `[validation]` table of `filtree.toml`.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            require_value_for_valueless_operators: config.require_value_for_valueless_operators,
        }
    }
}

fn check_condition(
    field: &str,
    operator: &str,
    value: Option<&FilterValue>,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    if field.is_empty() {
        findings.push(ValidationFinding::MissingField);
    }

    let resolved = registry.get(field);
    if resolved.is_none() {
        findings.push(ValidationFinding::UnknownField {
            field: field.into(),
        });
    }

    if operator.is_empty() {
        findings.push(ValidationFinding::MissingOperator);
    }

    if let Some(def) = resolved {
        if !operator.is_empty() && !is_valid_operator(operator, def.data_type) {
            findings.push(ValidationFinding::IncompatibleOperator {
                operator: operator.into(),
                data_type: def.data_type,
            });
        }
    }

    let missing = match value {
        None => true,
        Some(v) => v.is_empty_string(),
    };
    let exempt = is_valueless_operator(operator) && !options.require_value_for_valueless_operators;
    if missing && !exempt {
        findings.push(ValidationFinding::MissingValue);
    }

    findings
}

fn check_group_operator(operator: &str) -> Option<ValidationFinding> {
    match LogicalOperator::parse(operator) {
        Some(_) => None,
        None => Some(ValidationFinding::InvalidGroupOperator {
            operator: operator.to_string(),
        }),
    }
}

/// Validates a typed tree.
#[derive(Debug, Clone, Copy)]
pub struct ValidationVisitor<'a> {
    registry: &'a FieldRegistry,
    options: ValidationOptions,
}

impl<'a> ValidationVisitor<'a> {
    /// Create a visitor with default options.
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self::with_options(registry, ValidationOptions::default())
    }

    /// Create a visitor with explicit options.
    pub fn with_options(registry: &'a FieldRegistry, options: ValidationOptions) -> Self {
        Self { registry, options }
    }
}

impl FilterVisitor for ValidationVisitor<'_> {
    type Output = ValidationResult;

    fn visit_group(&mut self, group: &Group) -> ValidationResult {
        // A typed group always holds AND or OR; only raw payloads can carry
        // a bad operator (see `validate_payload`).
        let mut result = ValidationResult::valid();

        for child in group.children().iter().filter(|c| c.is_condition()) {
            result.merge(child.accept(self));
        }
        for child in group.children().iter().filter(|c| c.is_group()) {
            result.merge(child.accept(self));
        }
        result
    }

    fn visit_condition(&mut self, condition: &Condition) -> ValidationResult {
        ValidationResult::from_findings(check_condition(
            condition.field(),
            condition.operator(),
            condition.value(),
            self.registry,
            self.options,
        ))
    }
}

/// Validate one condition with default options.
pub fn validate_condition(condition: &Condition, registry: &FieldRegistry) -> ValidationResult {
    validate_condition_with(condition, registry, ValidationOptions::default())
}

/// Validate one condition.
pub fn validate_condition_with(
    condition: &Condition,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> ValidationResult {
    condition.accept(&mut ValidationVisitor::with_options(registry, options))
}

/// Validate a group and everything below it with default options.
pub fn validate_group(group: &Group, registry: &FieldRegistry) -> ValidationResult {
    validate_group_with(group, registry, ValidationOptions::default())
}

/// Validate a group and everything below it.
pub fn validate_group_with(
    group: &Group,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> ValidationResult {
    let result = group.accept(&mut ValidationVisitor::with_options(registry, options));
    tracing::debug!(
        children = group.len(),
        findings = result.errors.len(),
        "Validated filter group"
    );
    result
}

/// Validate any node with default options.
pub fn validate_node(node: &FilterNode, registry: &FieldRegistry) -> ValidationResult {
    validate_node_with(node, registry, ValidationOptions::default())
}

/// Validate any node.
pub fn validate_node_with(
    node: &FilterNode,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> ValidationResult {
    match node {
        FilterNode::Condition(c) => validate_condition_with(c, registry, options),
        FilterNode::Group(g) => validate_group_with(g, registry, options),
    }
}

/// Validate a raw JSON payload without decoding it first.
///
/// This is the lenient path for editor state that may not decode yet: a
/// bad group operator becomes a finding instead of an error. Nodes whose
/// `type` tag is not recognized are skipped; decoding rejects them.
pub fn validate_payload(payload: &Value, registry: &FieldRegistry) -> ValidationResult {
    validate_payload_with(payload, registry, ValidationOptions::default())
}

/// Validate a raw JSON payload with explicit options.
pub fn validate_payload_with(
    payload: &Value,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> ValidationResult {
    let result = ValidationResult::from_findings(payload_findings(payload, registry, options));
    tracing::debug!(findings = result.errors.len(), "Validated filter payload");
    result
}

fn payload_kind(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

fn payload_findings(
    node: &Value,
    registry: &FieldRegistry,
    options: ValidationOptions,
) -> Vec<ValidationFinding> {
    let text = |key: &str| node.get(key).and_then(Value::as_str).unwrap_or("");

    match payload_kind(node) {
        Some("condition") => {
            let value = node.get("value").cloned().map(FilterValue::from);
            check_condition(text("field"), text("operator"), value.as_ref(), registry, options)
        }
        Some("group") => {
            let mut findings: Vec<_> = check_group_operator(text("operator")).into_iter().collect();
            let children = node
                .get("children")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for kind in ["condition", "group"] {
                for child in children.iter().filter(|c| payload_kind(c) == Some(kind)) {
                    findings.extend(payload_findings(child, registry, options));
                }
            }
            findings
        }
        _ => Vec::new(),
    }
}

/// A single-condition rule for form fields: the first message, or `None` when valid.
pub fn validation_rule(registry: &FieldRegistry) -> impl Fn(&Condition) -> Option<&'static str> + '_ {
    move |condition| validate_condition(condition, registry).first_message()
}
