//! Error types for field registries and configuration.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building a field registry or loading configuration.
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(filtree::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML")]
    #[diagnostic(code(filtree::schema::toml_error))]
    TomlError {
        #[source]
        source: toml::de::Error,
    },

    /// Two fields share the same id.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(
        code(filtree::schema::duplicate),
        help("field ids must be unique within a registry")
    )]
    Duplicate { kind: String, name: String },

    /// Invalid field definition.
    #[error("invalid field `{field}`: {message}")]
    #[diagnostic(code(filtree::schema::invalid_field))]
    InvalidField { field: String, message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    #[diagnostic(code(filtree::schema::config_error))]
    ConfigError { message: String },
}

impl SchemaError {
    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}
