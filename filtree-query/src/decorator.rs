//! Wrappers that attach extra data to a node without changing it.
//!
//! A decorator owns its inner node and forwards traversal, validation and
//! serialization to it, so decorated trees behave exactly like plain ones.

use filtree_schema::FieldRegistry;
use serde_json::Value;

use crate::localization::Localization;
use crate::node::FilterNode;
use crate::render::TextRenderer;
use crate::validation::{ValidationResult, validate_node};
use crate::visitor::FilterVisitor;

/// A node wrapped with extra behavior.
pub trait FilterDecorator {
    /// The wrapped node.
    fn wrapped(&self) -> &FilterNode;

    /// Run a visitor over the wrapped node.
    fn accept<V: FilterVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output
    where
        Self: Sized,
    {
        self.wrapped().accept(visitor)
    }

    /// Validate the wrapped node.
    fn validate(&self, registry: &FieldRegistry) -> ValidationResult {
        validate_node(self.wrapped(), registry)
    }

    /// Serialize the wrapped node.
    fn to_json(&self) -> Value {
        self.wrapped().to_json()
    }
}

/// A node paired with an owned piece of extra data.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorated<T> {
    inner: FilterNode,
    extra: T,
}

impl<T> Decorated<T> {
    /// Wrap a node.
    pub fn new(inner: impl Into<FilterNode>, extra: T) -> Self {
        Self {
            inner: inner.into(),
            extra,
        }
    }

    /// The attached data.
    pub fn extra(&self) -> &T {
        &self.extra
    }

    /// Replace the attached data, keeping the node.
    pub fn map_extra<U>(self, f: impl FnOnce(T) -> U) -> Decorated<U> {
        Decorated {
            inner: self.inner,
            extra: f(self.extra),
        }
    }

    /// Split into node and data.
    pub fn into_parts(self) -> (FilterNode, T) {
        (self.inner, self.extra)
    }
}

impl<T> FilterDecorator for Decorated<T> {
    fn wrapped(&self) -> &FilterNode {
        &self.inner
    }
}

/// A node with its rendered text computed once.
pub type LabeledNode = Decorated<String>;

impl LabeledNode {
    /// Wrap `node` and render its label.
    pub fn labeled(
        node: impl Into<FilterNode>,
        registry: &FieldRegistry,
        localization: &Localization,
    ) -> Self {
        let node = node.into();
        let label = TextRenderer::new(registry, localization).render(&node);
        Self::new(node, label)
    }

    /// The cached label.
    pub fn label(&self) -> &str {
        &self.extra
    }
}
