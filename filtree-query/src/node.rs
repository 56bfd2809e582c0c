//! The filter tree: conditions (leaves) and groups (composites).
//!
//! A tree is a closed tagged union of exactly two node kinds. Every node
//! owns its children outright, so cloning and removal cascade through
//! the subtree and no node can ever appear in two trees.
//!
//! Equality is structural: two nodes are equal when they carry the same
//! operator, the same ordered children, and the same field, operator and
//! value on every leaf. Node ids do not take part in equality.
//!
//! ```rust
//! use filtree_query::{Condition, FilterNode, Group, LogicalOperator};
//!
//! let mut root = Group::and();
//! root.add_child(Condition::new("age", "between").with_value(vec![18, 65]));
//! let nested = root.add_group(LogicalOperator::Or);
//!
//! assert_eq!(root.len(), 2);
//! assert!(root.find(&nested).is_some_and(FilterNode::is_group));
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::operators::LogicalOperator;
use crate::value::FilterValue;

/// Identity of a node, assigned at creation.
///
/// Stable for the node's lifetime; used for list keys and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A leaf node testing one field with one operator against one value.
///
/// Setters perform no validation so a tree may hold invalid states while
/// it is being edited; run [`validate_condition`](crate::validate_condition)
/// when a verdict is needed.
#[derive(Debug, Clone)]
pub struct Condition {
    id: NodeId,
    field: SmolStr,
    operator: SmolStr,
    value: Option<FilterValue>,
}

impl Condition {
    /// Create a condition with no value.
    pub fn new(field: impl Into<SmolStr>, operator: impl Into<SmolStr>) -> Self {
        Self {
            id: NodeId::new(),
            field: field.into(),
            operator: operator.into(),
            value: None,
        }
    }

    /// Set the comparand.
    pub fn with_value(mut self, value: impl Into<FilterValue>) -> Self {
        self.set_value(value);
        self
    }

    /// Get the node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the referenced field id.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the operator key.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Get the comparand; `None` means no value was provided.
    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    /// Point the condition at another field.
    pub fn set_field(&mut self, field: impl Into<SmolStr>) {
        self.field = field.into();
    }

    /// Change the operator.
    pub fn set_operator(&mut self, operator: impl Into<SmolStr>) {
        self.operator = operator.into();
    }

    /// Replace the comparand.
    ///
    /// The value is stored in its [normalized](FilterValue::normalize) form.
    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.value = Some(value.into().normalize());
    }

    /// Remove the comparand, returning the previous one.
    pub fn clear_value(&mut self) -> Option<FilterValue> {
        self.value.take()
    }

    /// Replace the comparand with an optional value; `None` clears it.
    pub(crate) fn set_value_opt(&mut self, value: Option<FilterValue>) {
        self.value = value.map(FilterValue::normalize);
    }

    fn refresh_ids(&mut self) {
        self.id = NodeId::new();
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.operator == other.operator && self.value == other.value
    }
}

/// A composite node combining its children with AND or OR.
///
/// Children keep insertion order. Order is meaningful for display and
/// serialization, not for evaluation.
#[derive(Debug, Clone, Default)]
pub struct Group {
    id: NodeId,
    operator: LogicalOperator,
    children: Vec<FilterNode>,
}

impl Group {
    /// Create an empty group.
    pub fn new(operator: LogicalOperator) -> Self {
        Self {
            id: NodeId::new(),
            operator,
            children: Vec::new(),
        }
    }

    /// Create an empty AND group.
    pub fn and() -> Self {
        Self::new(LogicalOperator::And)
    }

    /// Create an empty OR group.
    pub fn or() -> Self {
        Self::new(LogicalOperator::Or)
    }

    /// Append a child, builder style.
    pub fn with_child(mut self, child: impl Into<FilterNode>) -> Self {
        self.add_child(child);
        self
    }

    /// Append several children, builder style.
    pub fn with_children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<FilterNode>,
    {
        let mut taken = self.subtree_ids();
        for child in children {
            let mut child = child.into();
            child.rekey_collisions(&mut taken);
            self.children.push(child);
        }
        self
    }

    /// Get the node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the combinator.
    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    /// Change the combinator.
    pub fn set_operator(&mut self, operator: LogicalOperator) {
        self.operator = operator;
    }

    /// Read-only view of the children in order.
    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the group has no children ("no filter" for a root).
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child and return its id.
    ///
    /// Ids stay unique within this group's subtree: an incoming node whose
    /// id is already taken, such as a [`Clone`] of a sibling, gets a fresh
    /// one. The returned id is the one the child ends up with.
    pub fn add_child(&mut self, child: impl Into<FilterNode>) -> NodeId {
        let mut child = child.into();
        child.rekey_collisions(&mut self.subtree_ids());
        let id = child.id();
        self.children.push(child);
        id
    }

    /// Append a freshly decoded child without checking ids.
    pub(crate) fn push_child(&mut self, child: FilterNode) {
        self.children.push(child);
    }

    /// Append an empty-valued condition and return its id.
    pub fn add_condition(
        &mut self,
        field: impl Into<SmolStr>,
        operator: impl Into<SmolStr>,
    ) -> NodeId {
        self.add_child(Condition::new(field, operator))
    }

    /// Append an empty nested group and return its id.
    pub fn add_group(&mut self, operator: LogicalOperator) -> NodeId {
        self.add_child(Group::new(operator))
    }

    /// Detach the direct child with the given id.
    ///
    /// Removal is by identity, so structurally equal siblings stay put.
    pub fn remove_child(&mut self, id: &NodeId) -> Option<FilterNode> {
        let index = self.children.iter().position(|child| child.id() == *id)?;
        Some(self.children.remove(index))
    }

    /// Detach the node with the given id from anywhere in the subtree.
    pub fn remove_descendant(&mut self, id: &NodeId) -> Option<FilterNode> {
        if let Some(node) = self.remove_child(id) {
            return Some(node);
        }
        self.children.iter_mut().find_map(|child| match child {
            FilterNode::Group(group) => group.remove_descendant(id),
            FilterNode::Condition(_) => None,
        })
    }

    /// Remove every child.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Find a descendant by id.
    pub fn find(&self, id: &NodeId) -> Option<&FilterNode> {
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Find a descendant by id for editing.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut FilterNode> {
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Edit children in place. The sequence itself cannot be reshaped here;
    /// use [`add_child`](Self::add_child) and [`remove_child`](Self::remove_child).
    pub fn children_iter_mut(&mut self) -> std::slice::IterMut<'_, FilterNode> {
        self.children.iter_mut()
    }

    fn refresh_ids(&mut self) {
        self.id = NodeId::new();
        for child in &mut self.children {
            child.refresh_ids();
        }
    }

    fn subtree_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::from([self.id]);
        for child in &self.children {
            child.collect_ids(&mut ids);
        }
        ids
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.children == other.children
    }
}

/// Any node of a filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// A leaf.
    Condition(Condition),
    /// A composite.
    Group(Group),
}

impl FilterNode {
    /// Get the node id.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Condition(c) => c.id(),
            Self::Group(g) => g.id(),
        }
    }

    /// The serialized `type` tag of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Condition(_) => "condition",
            Self::Group(_) => "group",
        }
    }

    /// Check if this node is a condition.
    pub fn is_condition(&self) -> bool {
        matches!(self, Self::Condition(_))
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Borrow as a condition.
    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Self::Condition(c) => Some(c),
            Self::Group(_) => None,
        }
    }

    /// Borrow as a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(g) => Some(g),
            Self::Condition(_) => None,
        }
    }

    /// Mutably borrow as a condition.
    pub fn as_condition_mut(&mut self) -> Option<&mut Condition> {
        match self {
            Self::Condition(c) => Some(c),
            Self::Group(_) => None,
        }
    }

    /// Mutably borrow as a group.
    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(g) => Some(g),
            Self::Condition(_) => None,
        }
    }

    /// Find this node or a descendant by id.
    pub fn find(&self, id: &NodeId) -> Option<&FilterNode> {
        if self.id() == *id {
            return Some(self);
        }
        match self {
            Self::Group(g) => g.find(id),
            Self::Condition(_) => None,
        }
    }

    /// Find this node or a descendant by id for editing.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut FilterNode> {
        if self.id() == *id {
            return Some(self);
        }
        match self {
            Self::Group(g) => g.find_mut(id),
            Self::Condition(_) => None,
        }
    }

    /// Levels from this node down to its deepest leaf. A lone node is 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Condition(_) => 1,
            Self::Group(g) => 1 + g.children.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Condition(_) => 1,
            Self::Group(g) => 1 + g.children.iter().map(Self::node_count).sum::<usize>(),
        }
    }

    /// Deep copy with fresh ids, for inserting next to the original.
    ///
    /// [`Clone`] keeps ids and is meant for snapshots.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.refresh_ids();
        copy
    }

    fn refresh_ids(&mut self) {
        match self {
            Self::Condition(c) => c.refresh_ids(),
            Self::Group(g) => g.refresh_ids(),
        }
    }

    fn collect_ids(&self, ids: &mut HashSet<NodeId>) {
        ids.insert(self.id());
        if let Self::Group(g) = self {
            for child in &g.children {
                child.collect_ids(ids);
            }
        }
    }

    /// Give a fresh id to every node in this subtree whose id is taken.
    fn rekey_collisions(&mut self, taken: &mut HashSet<NodeId>) {
        if !taken.insert(self.id()) {
            let id = NodeId::new();
            match self {
                Self::Condition(c) => c.id = id,
                Self::Group(g) => g.id = id,
            }
            taken.insert(id);
        }
        if let Self::Group(g) = self {
            for child in &mut g.children {
                child.rekey_collisions(taken);
            }
        }
    }
}

impl From<Condition> for FilterNode {
    fn from(c: Condition) -> Self {
        Self::Condition(c)
    }
}

impl From<Group> for FilterNode {
    fn from(g: Group) -> Self {
        Self::Group(g)
    }
}
