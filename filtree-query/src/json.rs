//! JSON encoding and decoding of filter trees.
//!
//! The canonical shapes are:
//!
//! ```json
//! { "type": "condition", "field": "age", "operator": "between", "value": [18, 65] }
//! { "type": "group", "operator": "AND", "children": [ ... ] }
//! ```
//!
//! Decoding is strict: an unknown `type` tag, a group operator other than
//! `AND`/`OR`, or a node of the wrong shape fails the whole decode. No
//! partially built tree is ever returned. Node ids are not encoded; a
//! decoded tree gets fresh ids.
//!
//! `from_json`, [`FromStr`] and the serde impls decode whatever the
//! encoder produces, however large. Input from outside the process goes
//! through `from_json_with` or `parse_with` with [`ParseLimits`].
//!
//! ```rust
//! use filtree_query::{Condition, FilterNode, Group};
//!
//! let tree = FilterNode::from(
//!     Group::and().with_child(Condition::new("age", "between").with_value(vec![18, 65])),
//! );
//! let text = tree.to_json_string().unwrap();
//! let back: FilterNode = text.parse().unwrap();
//! assert_eq!(back, tree);
//!
//! assert!(r#"{"type":"bogus"}"#.parse::<FilterNode>().is_err());
//! ```

use std::str::FromStr;

use filtree_schema::config::LimitsConfig;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::error::{FilterError, FilterResult};
use crate::node::{Condition, FilterNode, Group};
use crate::operators::LogicalOperator;
use crate::value::FilterValue;
use crate::visitor::{FilterVisitor, walk_children};

/// Maximum nesting depth accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Maximum number of nodes accepted by default.
pub const DEFAULT_MAX_NODES: usize = 1000;

/// Maximum size of filter JSON in bytes accepted by default (64KB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Bounds applied while decoding untrusted input.
///
/// Only the `_with` entry points take limits. The defaults match the
/// `[limits]` table of `filtree.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum nesting depth; a lone root is depth 1.
    pub max_depth: usize,
    /// Maximum total node count.
    pub max_nodes: usize,
    /// Maximum size of a JSON text, checked before parsing.
    pub max_payload_bytes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl ParseLimits {
    /// No limits at all; for trusted input only.
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_nodes: usize::MAX,
            max_payload_bytes: usize::MAX,
        }
    }

    /// Limits taken from the `[limits]` table of `filtree.toml`.
    pub fn from_config(config: &LimitsConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum node count.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set the maximum payload size.
    pub fn with_max_payload_bytes(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }
}

/// Encodes a tree into its canonical JSON shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonVisitor;

impl FilterVisitor for JsonVisitor {
    type Output = Value;

    fn visit_group(&mut self, group: &Group) -> Value {
        json!({
            "type": "group",
            "operator": group.operator().as_str(),
            "children": walk_children(self, group),
        })
    }

    fn visit_condition(&mut self, condition: &Condition) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from("condition"));
        map.insert("field".into(), Value::from(condition.field()));
        map.insert("operator".into(), Value::from(condition.operator()));
        if let Some(value) = condition.value() {
            map.insert("value".into(), value.to_json());
        }
        Value::Object(map)
    }
}

struct Decoder<'a> {
    limits: &'a ParseLimits,
    nodes: usize,
}

impl Decoder<'_> {
    fn node(&mut self, value: &Value, path: &str, depth: usize) -> FilterResult<FilterNode> {
        if depth > self.limits.max_depth {
            return Err(FilterError::depth_exceeded(self.limits.max_depth, path));
        }
        self.nodes += 1;
        if self.nodes > self.limits.max_nodes {
            return Err(FilterError::too_many_nodes(self.limits.max_nodes).at(path));
        }

        let obj = value
            .as_object()
            .ok_or_else(|| FilterError::malformed("Node must be a JSON object", path))?;

        match obj.get("type") {
            Some(Value::String(tag)) if tag == "condition" => {
                self.condition(obj, path).map(FilterNode::Condition)
            }
            Some(Value::String(tag)) if tag == "group" => {
                self.group(obj, path, depth).map(FilterNode::Group)
            }
            Some(Value::String(tag)) => Err(FilterError::unknown_node_type(tag, path)),
            Some(other) => Err(FilterError::unknown_node_type(other, path)),
            None => Err(FilterError::unknown_node_type("<missing>", path)
                .with_help("Every node needs a `type` tag of \"condition\" or \"group\"")),
        }
    }

    fn condition(&mut self, obj: &Map<String, Value>, path: &str) -> FilterResult<Condition> {
        let field = string_member(obj, "field", path)?;
        let operator = string_member(obj, "operator", path)?;
        let mut condition = Condition::new(field, operator);
        condition.set_value_opt(obj.get("value").cloned().map(FilterValue::from));
        Ok(condition)
    }

    fn group(&mut self, obj: &Map<String, Value>, path: &str, depth: usize) -> FilterResult<Group> {
        let operator = match obj.get("operator") {
            Some(Value::String(op)) => LogicalOperator::parse(op)
                .ok_or_else(|| FilterError::invalid_group_operator(op, path))?,
            Some(other) => return Err(FilterError::invalid_group_operator(other, path)),
            None => return Err(FilterError::invalid_group_operator("<missing>", path)),
        };

        let children = match obj.get("children") {
            Some(Value::Array(children)) => children,
            _ => {
                return Err(FilterError::malformed("Group `children` must be an array", path)
                    .with_node_type("group"));
            }
        };

        let mut group = Group::new(operator);
        for (i, child) in children.iter().enumerate() {
            let child_path = format!("{}.children[{}]", path, i);
            group.push_child(self.node(child, &child_path, depth + 1)?);
        }
        Ok(group)
    }
}

fn string_member<'v>(obj: &'v Map<String, Value>, key: &str, path: &str) -> FilterResult<&'v str> {
    obj.get(key).and_then(Value::as_str).ok_or_else(|| {
        FilterError::malformed(format!("Condition `{}` must be a string", key), path)
            .with_node_type("condition")
    })
}

fn check_payload(text: &str, limits: &ParseLimits) -> FilterResult<Value> {
    if text.len() > limits.max_payload_bytes {
        return Err(FilterError::payload_too_large(text.len(), limits.max_payload_bytes));
    }
    serde_json::from_str(text).map_err(FilterError::invalid_json)
}

impl FilterNode {
    /// Encode into the canonical JSON shape.
    pub fn to_json(&self) -> Value {
        self.accept(&mut JsonVisitor)
    }

    /// Encode into a compact JSON string.
    pub fn to_json_string(&self) -> FilterResult<String> {
        serde_json::to_string(&self.to_json()).map_err(FilterError::serialization)
    }

    /// Encode into an indented JSON string.
    pub fn to_json_string_pretty(&self) -> FilterResult<String> {
        serde_json::to_string_pretty(&self.to_json()).map_err(FilterError::serialization)
    }

    /// Decode from a JSON value with no size limits.
    pub fn from_json(value: &Value) -> FilterResult<Self> {
        Self::from_json_with(value, &ParseLimits::unlimited())
    }

    /// Decode from a JSON value with explicit limits.
    pub fn from_json_with(value: &Value, limits: &ParseLimits) -> FilterResult<Self> {
        let mut decoder = Decoder { limits, nodes: 0 };
        match decoder.node(value, "$", 1) {
            Ok(node) => {
                tracing::debug!(nodes = decoder.nodes, "Decoded filter tree");
                Ok(node)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected filter payload");
                Err(e)
            }
        }
    }

    /// Decode from JSON text with explicit limits.
    pub fn parse_with(text: &str, limits: &ParseLimits) -> FilterResult<Self> {
        let value = check_payload(text, limits)?;
        Self::from_json_with(&value, limits)
    }
}

impl FromStr for FilterNode {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Self::parse_with(s, &ParseLimits::unlimited())
    }
}

impl Group {
    /// Encode into the canonical JSON shape.
    pub fn to_json(&self) -> Value {
        self.accept(&mut JsonVisitor)
    }

    /// Encode into a compact JSON string.
    pub fn to_json_string(&self) -> FilterResult<String> {
        serde_json::to_string(&self.to_json()).map_err(FilterError::serialization)
    }

    /// Decode a root group from a JSON value with no size limits.
    pub fn from_json(value: &Value) -> FilterResult<Self> {
        Self::from_json_with(value, &ParseLimits::unlimited())
    }

    /// Decode a root group from a JSON value; a condition at the root is rejected.
    pub fn from_json_with(value: &Value, limits: &ParseLimits) -> FilterResult<Self> {
        match FilterNode::from_json_with(value, limits)? {
            FilterNode::Group(group) => Ok(group),
            FilterNode::Condition(_) => Err(FilterError::malformed("Expected a group at the root", "$")
                .with_node_type("condition")),
        }
    }

    /// Decode a root group from JSON text with explicit limits.
    pub fn parse_with(text: &str, limits: &ParseLimits) -> FilterResult<Self> {
        let value = check_payload(text, limits)?;
        Self::from_json_with(&value, limits)
    }
}

impl FromStr for Group {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        Self::parse_with(s, &ParseLimits::unlimited())
    }
}

impl Condition {
    /// Encode into the canonical JSON shape.
    pub fn to_json(&self) -> Value {
        self.accept(&mut JsonVisitor)
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn sample() -> FilterNode {
        FilterNode::from(
            Group::and()
                .with_child(Condition::new("age", "between").with_value(vec![18, 65]))
                .with_child(
                    Group::or()
                        .with_child(Condition::new("name", "isBlank"))
                        .with_child(Condition::new("score", "greaterThan").with_value(2.5))
                        .with_child(Condition::new("active", "equals").with_value(true)),
                ),
        )
    }

    #[test]
    fn test_canonical_shape() {
        assert_eq!(
            sample().to_json(),
            json!({
                "type": "group",
                "operator": "AND",
                "children": [
                    {"type": "condition", "field": "age", "operator": "between", "value": [18, 65]},
                    {
                        "type": "group",
                        "operator": "OR",
                        "children": [
                            {"type": "condition", "field": "name", "operator": "isBlank"},
                            {"type": "condition", "field": "score", "operator": "greaterThan", "value": 2.5},
                            {"type": "condition", "field": "active", "operator": "equals", "value": true}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let tree = sample();
        let back = FilterNode::from_json(&tree.to_json()).unwrap();
        assert_eq!(back, tree);

        let text = tree.to_json_string_pretty().unwrap();
        assert_eq!(text.parse::<FilterNode>().unwrap(), tree);
    }

    #[test]
    fn test_null_value_is_kept_apart_from_absent() {
        let node = FilterNode::from_json(
            &json!({"type": "condition", "field": "a", "operator": "equals", "value": null}),
        )
        .unwrap();
        assert_eq!(node.as_condition().unwrap().value(), Some(&FilterValue::Null));

        let node = FilterNode::from_json(&json!({"type": "condition", "field": "a", "operator": "equals"}))
            .unwrap();
        assert_eq!(node.as_condition().unwrap().value(), None);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = FilterNode::from_json(&json!({"type": "bogus", "field": "a"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownNodeType);
        assert_eq!(err.context.path.as_deref(), Some("$"));

        let err = FilterNode::from_json(&json!({"field": "a", "operator": "equals"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownNodeType);
    }

    #[test]
    fn test_nested_error_reports_path() {
        let err = FilterNode::from_json(&json!({
            "type": "group",
            "operator": "AND",
            "children": [
                {"type": "condition", "field": "a", "operator": "equals", "value": 1},
                {"type": "group", "operator": "XOR", "children": []}
            ]
        }))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidGroupOperator);
        assert_eq!(err.context.path.as_deref(), Some("$.children[1]"));
    }

    #[test]
    fn test_group_operator_is_case_sensitive() {
        let err = FilterNode::from_json(&json!({"type": "group", "operator": "and", "children": []}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidGroupOperator);

        let err = FilterNode::from_json(&json!({"type": "group", "children": []})).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidGroupOperator);
    }

    #[test]
    fn test_malformed_nodes() {
        for payload in [
            json!([1, 2]),
            json!({"type": "group", "operator": "OR"}),
            json!({"type": "group", "operator": "OR", "children": {}}),
            json!({"type": "condition", "operator": "equals"}),
            json!({"type": "condition", "field": 7, "operator": "equals"}),
        ] {
            let err = FilterNode::from_json(&payload).unwrap_err();
            assert_eq!(err.code, ErrorCode::MalformedNode, "{payload}");
        }
    }

    #[test]
    fn test_depth_limit() {
        let mut payload = json!({"type": "group", "operator": "AND", "children": []});
        for _ in 0..4 {
            payload = json!({"type": "group", "operator": "AND", "children": [payload]});
        }
        let limits = ParseLimits::default().with_max_depth(4);
        let err = FilterNode::from_json_with(&payload, &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::DepthExceeded);

        let limits = ParseLimits::default().with_max_depth(5);
        assert_eq!(FilterNode::from_json_with(&payload, &limits).unwrap().depth(), 5);
    }

    #[test]
    fn test_node_limit() {
        let children: Vec<_> = (0..5)
            .map(|i| json!({"type": "condition", "field": format!("f{i}"), "operator": "equals", "value": i}))
            .collect();
        let payload = json!({"type": "group", "operator": "OR", "children": children});
        let limits = ParseLimits::default().with_max_nodes(5);
        let err = FilterNode::from_json_with(&payload, &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyNodes);
        assert!(FilterNode::from_json_with(&payload, &limits.with_max_nodes(6)).is_ok());
    }

    #[test]
    fn test_payload_limit_and_bad_json() {
        let limits = ParseLimits::default().with_max_payload_bytes(8);
        let err = FilterNode::parse_with(r#"{"type":"group","operator":"AND","children":[]}"#, &limits)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PayloadTooLarge);

        let err = "not json".parse::<FilterNode>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJson);
    }

    #[test]
    fn test_group_root_required() {
        let err = Group::from_json(&json!({"type": "condition", "field": "a", "operator": "equals"}))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedNode);
        let group: Group = r#"{"type":"group","operator":"OR","children":[]}"#.parse().unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_serde_integration() {
        let tree = sample();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value, tree.to_json());
        let back: FilterNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);

        let err = serde_json::from_value::<FilterNode>(json!({"type": "bogus"})).unwrap_err();
        assert!(err.to_string().contains("F1001"));
    }

    fn wide_and_deep() -> Group {
        let mut tree = Group::and().with_children(
            (0..1200).map(|i| Condition::new(format!("field_{i}"), "contains").with_value(i)),
        );
        for level in 0..40 {
            let operator = if level % 2 == 0 {
                LogicalOperator::Or
            } else {
                LogicalOperator::And
            };
            tree = Group::new(operator)
                .with_child(Condition::new("level", "equals").with_value(level))
                .with_child(tree);
        }
        tree
    }

    #[test]
    fn test_large_tree_round_trips_without_limits() {
        let tree = wide_and_deep();
        let node = FilterNode::from(tree.clone());
        assert!(node.depth() > DEFAULT_MAX_DEPTH);
        assert!(node.node_count() > DEFAULT_MAX_NODES);

        let text = tree.to_json_string().unwrap();
        assert!(text.len() > DEFAULT_MAX_PAYLOAD_BYTES);
        assert_eq!(text.parse::<Group>().unwrap(), tree);
        assert_eq!(Group::from_json(&tree.to_json()).unwrap(), tree);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(serde_json::from_value::<Group>(value.clone()).unwrap(), tree);
        assert_eq!(serde_json::from_value::<FilterNode>(value).unwrap(), node);
    }

    #[test]
    fn test_large_tree_rejected_by_explicit_limits() {
        let tree = wide_and_deep();
        let text = tree.to_json_string().unwrap();
        let limits = ParseLimits::default();

        let err = Group::parse_with(&text, &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::PayloadTooLarge);

        let err = Group::from_json_with(&tree.to_json(), &limits).unwrap_err();
        assert!(err.is_limit());
    }

    #[test]
    fn test_limits_from_config() {
        let config = LimitsConfig {
            max_depth: 3,
            max_payload_bytes: 100,
            max_nodes: 9,
        };
        let limits = ParseLimits::from_config(&config);
        assert_eq!(limits.max_depth, 3);
        assert_eq!(limits.max_nodes, 9);
        assert_eq!(limits.max_payload_bytes, 100);
    }
}
