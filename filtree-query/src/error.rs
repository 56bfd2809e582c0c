//! Error types for decoding filter trees.
//!
//! Validation problems are not errors: they are reported as
//! [`ValidationFinding`](crate::validation::ValidationFinding)s. The
//! errors in this module are structural failures that stop decoding
//! before a partially built tree can escape.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: F{category}{number}
//! - 1xxx: Structural errors (unknown node tag, malformed node)
//! - 2xxx: Limit errors (depth, node count, payload size)
//! - 3xxx: Encoding errors (invalid JSON, serialization)
//!
//! ```rust
//! use filtree_query::{ErrorCode, FilterError};
//!
//! let err = FilterError::unknown_node_type("bogus", "$");
//! assert_eq!(err.code, ErrorCode::UnknownNodeType);
//! assert_eq!(err.code.code(), "F1001");
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for filter decoding operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Structural errors (1xxx)
    /// Node `type` tag is neither `condition` nor `group` (F1001).
    UnknownNodeType = 1001,
    /// Group operator is not `AND`/`OR` (F1002).
    InvalidGroupOperator = 1002,
    /// Node is missing a member or has one of the wrong shape (F1003).
    MalformedNode = 1003,

    // Limit errors (2xxx)
    /// Tree nests deeper than allowed (F2001).
    DepthExceeded = 2001,
    /// Tree has more nodes than allowed (F2002).
    TooManyNodes = 2002,
    /// Payload is larger than allowed (F2003).
    PayloadTooLarge = 2003,

    // Encoding errors (3xxx)
    /// Input is not valid JSON (F3001).
    InvalidJson = 3001,
    /// Tree could not be encoded (F3002).
    SerializationError = 3002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "F1001").
    pub fn code(&self) -> String {
        format!("F{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnknownNodeType => "Unknown node type",
            Self::InvalidGroupOperator => "Invalid group operator",
            Self::MalformedNode => "Malformed node",
            Self::DepthExceeded => "Maximum depth exceeded",
            Self::TooManyNodes => "Too many nodes",
            Self::PayloadTooLarge => "Payload too large",
            Self::InvalidJson => "Invalid JSON",
            Self::SerializationError => "Serialization error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// JSON path of the offending node (e.g. `$.children[1]`).
    pub path: Option<String>,
    /// Node kind being decoded, when known.
    pub node_type: Option<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while decoding or encoding a filter tree.
#[derive(Error, Debug)]
pub struct FilterError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(path) = &self.context.path {
            write!(f, " at {}", path)?;
        }
        Ok(())
    }
}

impl FilterError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Set the JSON path.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.context.path = Some(path.into());
        self
    }

    /// Set the node kind.
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.context.node_type = Some(node_type.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an unknown node type error.
    pub fn unknown_node_type(tag: impl fmt::Display, path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnknownNodeType,
            format!("Unknown node type `{}`", tag),
        )
        .at(path)
        .with_help("Node `type` must be \"condition\" or \"group\"")
    }

    /// Create an invalid group operator error.
    pub fn invalid_group_operator(operator: impl fmt::Display, path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidGroupOperator,
            format!("Invalid group operator `{}`", operator),
        )
        .at(path)
        .with_node_type("group")
        .with_help("Group `operator` must be \"AND\" or \"OR\"")
    }

    /// Create a malformed node error.
    pub fn malformed(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedNode, message).at(path)
    }

    /// Create a depth exceeded error.
    pub fn depth_exceeded(max_depth: usize, path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::DepthExceeded,
            format!("Filter nests deeper than {} levels", max_depth),
        )
        .at(path)
    }

    /// Create a too many nodes error.
    pub fn too_many_nodes(max_nodes: usize) -> Self {
        Self::new(
            ErrorCode::TooManyNodes,
            format!("Filter has more than {} nodes", max_nodes),
        )
    }

    /// Create a payload too large error.
    pub fn payload_too_large(len: usize, max_bytes: usize) -> Self {
        Self::new(
            ErrorCode::PayloadTooLarge,
            format!(
                "Filter JSON is {} bytes, exceeding the maximum of {} bytes",
                len, max_bytes
            ),
        )
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(source: serde_json::Error) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid filter JSON: {}", source))
            .with_source(source)
    }

    /// Create a serialization error.
    pub fn serialization(source: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("Failed to encode filter: {}", source),
        )
        .with_source(source)
    }

    // ============== Error Checks ==============

    /// Whether the payload itself was structurally wrong.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::UnknownNodeType | ErrorCode::InvalidGroupOperator | ErrorCode::MalformedNode
        )
    }

    /// Whether a decoding limit was hit.
    pub fn is_limit(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::DepthExceeded | ErrorCode::TooManyNodes | ErrorCode::PayloadTooLarge
        )
    }
}
