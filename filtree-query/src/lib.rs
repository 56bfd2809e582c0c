//! # filtree-query
//!
//! Nested filter expressions for search and query builders.
//!
//! This crate provides:
//! - The filter tree: [`Condition`] leaves and [`Group`] composites
//! - Operator catalogs keyed by [`DataType`](filtree_schema::DataType)
//! - Recursive validation that aggregates every finding
//! - A visitor protocol for adding operations without touching the nodes
//! - A strict JSON codec with limits for untrusted payloads
//! - Localized labels and plain-text rendering
//!
//! ## Building and validating
//!
//! ```rust
//! use filtree_query::{validate_group, Condition, Group};
//! use filtree_schema::{DataType, FieldRegistry, FilterField};
//!
//! let fields = FieldRegistry::new([
//!     FilterField::new("age", "Age", DataType::Number),
//!     FilterField::new("name", "Name", DataType::String),
//! ])
//! .unwrap();
//!
//! let mut root = Group::and();
//! root.add_child(Condition::new("age", "greaterThan").with_value(18));
//! root.add_child(Condition::new("name", "greaterThan").with_value("m"));
//!
//! let result = validate_group(&root, &fields);
//! assert!(!result.is_valid);
//! assert_eq!(result.messages(), ["Invalid operator for selected field type"]);
//! ```
//!
//! ## Serialization
//!
//! ```rust
//! use filtree_query::{Condition, FilterNode, Group};
//!
//! let tree = FilterNode::from(
//!     Group::or()
//!         .with_child(Condition::new("status", "equals").with_value("open"))
//!         .with_child(Condition::new("status", "isBlank")),
//! );
//!
//! let json = tree.to_json_string().unwrap();
//! let back: FilterNode = json.parse().unwrap();
//! assert_eq!(back, tree);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use filtree_query::{ErrorCode, FilterNode};
//!
//! let err = FilterNode::from_json(&serde_json::json!({"type": "bogus"})).unwrap_err();
//! assert_eq!(err.code, ErrorCode::UnknownNodeType);
//! ```

pub mod decorator;
pub mod error;
pub mod json;
pub mod localization;
pub mod logging;
pub mod node;
pub mod operators;
pub mod render;
pub mod shared;
pub mod validation;
pub mod value;
pub mod visitor;

pub use decorator::{Decorated, FilterDecorator, LabeledNode};
pub use error::{ErrorCode, ErrorContext, FilterError, FilterResult};
pub use json::{JsonVisitor, ParseLimits};
pub use localization::{Localization, format_operator_label};
pub use node::{Condition, FilterNode, Group, NodeId};
pub use operators::{
    DEFAULT_OPERATOR_FALLBACK, FilterOperator, LogicalOperator, default_operator,
    is_valid_operator, is_valueless_operator, operators_for,
};
pub use render::TextRenderer;
pub use shared::SharedFilter;
pub use validation::{
    ValidationFinding, ValidationOptions, ValidationResult, ValidationVisitor, validate_condition,
    validate_condition_with, validate_group, validate_group_with, validate_node,
    validate_node_with, validate_payload, validate_payload_with, validation_rule,
};
pub use value::FilterValue;
pub use visitor::{
    ConditionCollector, FieldRenamer, FilterVisitor, FilterVisitorMut, walk_children,
    walk_children_mut,
};

// Re-export logging utilities
pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_from_config,
    init_with_level, is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FilterError, FilterResult};
    pub use crate::node::{Condition, FilterNode, Group, NodeId};
    pub use crate::operators::{LogicalOperator, operators_for};
    pub use crate::validation::{ValidationResult, validate_group, validate_node};
    pub use crate::value::FilterValue;
    pub use crate::visitor::{FilterVisitor, FilterVisitorMut};
}
