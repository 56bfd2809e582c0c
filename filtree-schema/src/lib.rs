//! # filtree-schema
//!
//! Field definitions and configuration for filtree.
//!
//! This crate provides:
//! - The closed [`DataType`] enumeration that drives operator legality
//! - [`FilterField`] descriptions of filterable attributes
//! - The read-only [`FieldRegistry`] consulted by validation
//! - Configuration parsing for `filtree.toml` files
//!
//! ## Example
//!
//! ```rust
//! use filtree_schema::{DataType, FieldRegistry, FilterField};
//!
//! let registry = FieldRegistry::new([
//!     FilterField::new("age", "Age", DataType::Number),
//!     FilterField::new("name", "Name", DataType::String),
//! ])
//! .unwrap();
//!
//! assert_eq!(registry.get("age").map(|f| f.data_type), Some(DataType::Number));
//! assert!(!registry.contains("email"));
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod registry;
pub mod types;

pub use config::FiltreeConfig;
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldFormatter, FilterField};
pub use registry::FieldRegistry;
pub use types::DataType;
