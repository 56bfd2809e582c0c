//! A filter tree shared between threads.
//!
//! One lock guards the whole tree. Readers see either the state before a
//! write closure ran or the state after it, never a partial edit.
//!
//! ```rust
//! use filtree_query::shared::SharedFilter;
//! use filtree_query::{Condition, Group};
//!
//! let filter = SharedFilter::new(Group::and());
//! let editor = filter.clone();
//!
//! let id = editor.write(|root| root.add_child(Condition::new("age", "equals").with_value(3)));
//! assert!(filter.read(|root| root.find(&id).is_some()));
//! assert_eq!(filter.revision(), 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use filtree_schema::FieldRegistry;
use parking_lot::RwLock;
use serde_json::Value;

use crate::node::Group;
use crate::validation::{ValidationOptions, ValidationResult, validate_group_with};

#[derive(Debug, Default)]
struct Inner {
    root: RwLock<Group>,
    revision: AtomicU64,
}

/// A cheaply clonable handle to one root group.
#[derive(Debug, Clone, Default)]
pub struct SharedFilter {
    inner: Arc<Inner>,
}

impl SharedFilter {
    /// Share `root`.
    pub fn new(root: Group) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: RwLock::new(root),
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Group) -> R) -> R {
        f(&self.inner.root.read())
    }

    /// Run `f` under the write lock and bump the revision.
    pub fn write<R>(&self, f: impl FnOnce(&mut Group) -> R) -> R {
        let mut root = self.inner.root.write();
        let result = f(&mut root);
        let revision = self.inner.revision.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(revision, children = root.len(), "Shared filter updated");
        result
    }

    /// Swap in a new root, returning the old one.
    pub fn replace(&self, root: Group) -> Group {
        self.write(|current| std::mem::replace(current, root))
    }

    /// A deep copy of the current tree.
    pub fn snapshot(&self) -> Group {
        self.read(Group::clone)
    }

    /// Number of completed writes.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Validate the current tree with default options.
    pub fn validate(&self, registry: &FieldRegistry) -> ValidationResult {
        self.validate_with(registry, ValidationOptions::default())
    }

    /// Validate the current tree.
    pub fn validate_with(&self, registry: &FieldRegistry, options: ValidationOptions) -> ValidationResult {
        self.read(|root| validate_group_with(root, registry, options))
    }

    /// Serialize the current tree.
    pub fn to_json(&self) -> Value {
        self.read(Group::to_json)
    }
}

impl From<Group> for SharedFilter {
    fn from(root: Group) -> Self {
        Self::new(root)
    }
}
