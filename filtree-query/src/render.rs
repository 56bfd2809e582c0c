//! Plain-text rendering of filter trees.
//!
//! ```rust
//! use filtree_query::localization::Localization;
//! use filtree_query::render::TextRenderer;
//! use filtree_query::{Condition, Group};
//! use filtree_schema::{DataType, FieldRegistry, FilterField};
//!
//! let fields = FieldRegistry::new([
//!     FilterField::new("age", "Age", DataType::Number),
//!     FilterField::new("name", "Name", DataType::String),
//! ])
//! .unwrap();
//! let l10n = Localization::new();
//!
//! let tree = Group::and()
//!     .with_child(Condition::new("age", "between").with_value(vec![18, 65]))
//!     .with_child(
//!         Group::or()
//!             .with_child(Condition::new("name", "startsWith").with_value("A"))
//!             .with_child(Condition::new("name", "isBlank")),
//!     );
//!
//! let text = TextRenderer::new(&fields, &l10n).render_group(&tree);
//! assert_eq!(text, "Age Between 18 and 65 AND (Name Starts with A OR Name Is blank)");
//! ```

use filtree_schema::FieldRegistry;

use crate::localization::Localization;
use crate::node::{Condition, FilterNode, Group};
use crate::operators::is_valueless_operator;
use crate::operators::operator_keys::BETWEEN;
use crate::value::FilterValue;
use crate::visitor::{FilterVisitor, walk_children};

/// Renders a tree as a single line of text.
///
/// Field ids are replaced by their labels and values go through the
/// field's formatter. Nested groups are parenthesized; empty groups
/// render as nothing.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'a> {
    registry: &'a FieldRegistry,
    localization: &'a Localization,
    depth: usize,
}

impl<'a> TextRenderer<'a> {
    /// Create a renderer.
    pub fn new(registry: &'a FieldRegistry, localization: &'a Localization) -> Self {
        Self {
            registry,
            localization,
            depth: 0,
        }
    }

    /// Render any node.
    pub fn render(&mut self, node: &FilterNode) -> String {
        node.accept(self)
    }

    /// Render a root group.
    pub fn render_group(&mut self, group: &Group) -> String {
        group.accept(self)
    }

    fn format_value(&self, field: &str, value: &FilterValue) -> String {
        let json = value.to_json();
        match self.registry.get(field) {
            Some(def) => def.format_value(&json),
            None => match json {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
        }
    }
}

impl FilterVisitor for TextRenderer<'_> {
    type Output = String;

    fn visit_group(&mut self, group: &Group) -> String {
        self.depth += 1;
        let parts: Vec<String> = walk_children(self, group)
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        self.depth -= 1;

        if parts.is_empty() {
            return String::new();
        }

        let separator = format!(" {} ", self.localization.label(group.operator().as_str()));
        let joined = parts.join(&separator);
        if self.depth > 0 && parts.len() > 1 {
            format!("({joined})")
        } else {
            joined
        }
    }

    fn visit_condition(&mut self, condition: &Condition) -> String {
        let field = self
            .registry
            .get(condition.field())
            .map(|def| def.label.as_str())
            .unwrap_or(condition.field());
        let operator = self.localization.label(condition.operator());

        if is_valueless_operator(condition.operator()) {
            return format!("{field} {operator}");
        }

        match condition.value() {
            None => format!("{field} {operator}"),
            Some(FilterValue::List(bounds)) if condition.operator() == BETWEEN && bounds.len() == 2 => {
                format!(
                    "{field} {operator} {} and {}",
                    self.format_value(condition.field(), &bounds[0]),
                    self.format_value(condition.field(), &bounds[1]),
                )
            }
            Some(value) => format!(
                "{field} {operator} {}",
                self.format_value(condition.field(), value)
            ),
        }
    }
}
