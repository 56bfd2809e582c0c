//! Double dispatch over the two node kinds.
//!
//! `accept` calls the visitor method matching the node's kind and stops
//! there: recursion into a group's children is up to the visitor, which
//! may prune, reorder or stop early. [`walk_children`] and
//! [`walk_children_mut`] cover the common "visit everything" case.
//!
//! ```rust
//! use filtree_query::visitor::{walk_children, FilterVisitor};
//! use filtree_query::{Condition, Group};
//!
//! /// Counts leaves.
//! struct Leaves;
//!
//! impl FilterVisitor for Leaves {
//!     type Output = usize;
//!
//!     fn visit_group(&mut self, group: &Group) -> usize {
//!         walk_children(self, group).into_iter().sum()
//!     }
//!
//!     fn visit_condition(&mut self, _: &Condition) -> usize {
//!         1
//!     }
//! }
//!
//! let tree = Group::and()
//!     .with_child(Condition::new("a", "equals"))
//!     .with_child(Group::or().with_child(Condition::new("b", "equals")));
//! assert_eq!(tree.accept(&mut Leaves), 2);
//! ```

use smol_str::SmolStr;

use crate::node::{Condition, FilterNode, Group, NodeId};

/// An operation over a filter tree.
pub trait FilterVisitor {
    /// Result of visiting one node.
    type Output;

    /// Called for group nodes.
    fn visit_group(&mut self, group: &Group) -> Self::Output;

    /// Called for condition nodes.
    fn visit_condition(&mut self, condition: &Condition) -> Self::Output;
}

/// An in-place rewrite of a filter tree.
pub trait FilterVisitorMut {
    /// Result of visiting one node.
    type Output;

    /// Called for group nodes.
    fn visit_group_mut(&mut self, group: &mut Group) -> Self::Output;

    /// Called for condition nodes.
    fn visit_condition_mut(&mut self, condition: &mut Condition) -> Self::Output;
}

impl FilterNode {
    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<V: FilterVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Condition(c) => visitor.visit_condition(c),
            Self::Group(g) => visitor.visit_group(g),
        }
    }

    /// Dispatch to the mutating visitor method for this node's kind.
    pub fn accept_mut<V: FilterVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        match self {
            Self::Condition(c) => visitor.visit_condition_mut(c),
            Self::Group(g) => visitor.visit_group_mut(g),
        }
    }
}

impl Group {
    /// Hand this group to the visitor.
    pub fn accept<V: FilterVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_group(self)
    }

    /// Hand this group to the mutating visitor.
    pub fn accept_mut<V: FilterVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        visitor.visit_group_mut(self)
    }
}

impl Condition {
    /// Hand this condition to the visitor.
    pub fn accept<V: FilterVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_condition(self)
    }

    /// Hand this condition to the mutating visitor.
    pub fn accept_mut<V: FilterVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        visitor.visit_condition_mut(self)
    }
}

/// Visit every child of `group` in order and collect the outputs.
pub fn walk_children<V: FilterVisitor + ?Sized>(visitor: &mut V, group: &Group) -> Vec<V::Output> {
    group.children().iter().map(|child| child.accept(visitor)).collect()
}

/// Visit every child of `group` in order with a mutating visitor.
pub fn walk_children_mut<V: FilterVisitorMut + ?Sized>(
    visitor: &mut V,
    group: &mut Group,
) -> Vec<V::Output> {
    group
        .children_iter_mut()
        .map(|child| child.accept_mut(visitor))
        .collect()
}

/// Collects the ids of conditions matching a predicate, in tree order.
pub struct ConditionCollector<P> {
    predicate: P,
    matches: Vec<NodeId>,
}

impl<P> ConditionCollector<P>
where
    P: FnMut(&Condition) -> bool,
{
    /// Create a collector.
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            matches: Vec::new(),
        }
    }

    /// The ids collected so far.
    pub fn matches(&self) -> &[NodeId] {
        &self.matches
    }

    /// Consume the collector and return the ids.
    pub fn into_matches(self) -> Vec<NodeId> {
        self.matches
    }
}

impl<P> FilterVisitor for ConditionCollector<P>
where
    P: FnMut(&Condition) -> bool,
{
    type Output = ();

    fn visit_group(&mut self, group: &Group) {
        walk_children(self, group);
    }

    fn visit_condition(&mut self, condition: &Condition) {
        if (self.predicate)(condition) {
            self.matches.push(condition.id());
        }
    }
}

/// Rewrites every reference to one field id into another.
#[derive(Debug, Clone)]
pub struct FieldRenamer {
    from: SmolStr,
    to: SmolStr,
    renamed: usize,
}

impl FieldRenamer {
    /// Create a renamer.
    pub fn new(from: impl Into<SmolStr>, to: impl Into<SmolStr>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            renamed: 0,
        }
    }

    /// Number of conditions rewritten so far.
    pub fn renamed(&self) -> usize {
        self.renamed
    }
}

impl FilterVisitorMut for FieldRenamer {
    type Output = ();

    fn visit_group_mut(&mut self, group: &mut Group) {
        walk_children_mut(self, group);
    }

    fn visit_condition_mut(&mut self, condition: &mut Condition) {
        if condition.field() == self.from.as_str() {
            condition.set_field(self.to.clone());
            self.renamed += 1;
        }
    }
}
