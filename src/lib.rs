//! # Filtree
//!
//! Composable filter expressions for advanced search and query builders.
//!
//! Filtree provides:
//! - A filter tree of conditions combined by nested AND/OR groups
//! - Operator catalogs tied to field data types
//! - Recursive validation that reports every problem at once
//! - A visitor protocol for exporting, rendering and rewriting trees
//! - Strict JSON round-tripping with limits for untrusted input
//! - `filtree.toml` configuration for fields, limits and labels
//!
//! ## Quick Start
//!
//! ```rust
//! use filtree::prelude::*;
//!
//! let config = FiltreeConfig::from_str(r#"
//! [[fields]]
//! id = "age"
//! type = "number"
//!
//! [[fields]]
//! id = "name"
//! label = "Full name"
//! type = "string"
//! "#).unwrap();
//! let fields = config.registry().unwrap();
//!
//! let mut root = Group::and();
//! root.add_child(Condition::new("age", "between").with_value(vec![18, 65]));
//! let any_name = root.add_group(LogicalOperator::Or);
//!
//! root.find_mut(&any_name)
//!     .and_then(FilterNode::as_group_mut)
//!     .unwrap()
//!     .add_child(Condition::new("name", "startsWith").with_value("A"));
//!
//! assert!(validate_group(&root, &fields).is_valid);
//!
//! let json = root.to_json_string().unwrap();
//! let restored: Group = json.parse().unwrap();
//! assert_eq!(restored, root);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Field definitions, registries and configuration.
pub mod schema {
    pub use filtree_schema::*;
}

/// Filter trees, operators, validation and serialization.
pub mod query {
    pub use filtree_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::query::prelude::*;
    pub use crate::query::{ParseLimits, ValidationOptions, validate_condition};
    pub use crate::schema::{DataType, FieldRegistry, FiltreeConfig, FilterField};
}

// Re-export key types at the crate root
pub use query::{Condition, FilterError, FilterNode, Group, ValidationResult};
pub use schema::{FieldRegistry, SchemaError};
