//! Immutable request context
//!
//! A [`Context`] is a chain of typed values. Deriving a new value pushes a
//! node in front of the existing chain; the chain behind it is shared and
//! never modified, so every holder of an older context keeps observing
//! exactly what it saw before.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

struct Node {
    parent: Option<Arc<Node>>,
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Logical context carried alongside one request
///
/// Values are keyed by their type. A newer value of the same type shadows
/// older ones for lookups through the derived context only.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Create an empty root context
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value`
    #[must_use]
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        self.with_arc(Arc::new(value))
    }

    /// Derive a context carrying an already shared `value`
    #[must_use]
    pub fn with_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value,
            })),
        }
    }

    /// Borrow the most recently attached value of type `T`
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.find(TypeId::of::<T>())
            .and_then(|node| node.value.downcast_ref::<T>())
    }

    /// Get a shared handle to the most recently attached value of type `T`
    pub fn shared<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.find(TypeId::of::<T>())
            .and_then(|node| Arc::clone(&node.value).downcast::<T>().ok())
    }

    /// Number of values in the chain, including shadowed ones
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Check if no value was ever attached
    #[must_use]
    pub const fn is_background(&self) -> bool {
        self.head.is_none()
    }

    fn find(&self, type_id: TypeId) -> Option<&Node> {
        self.nodes().find(|node| node.type_id == type_id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes().map(|node| node.type_name))
            .finish()
    }
}

impl Drop for Node {
    // Unlink uniquely owned ancestors iteratively; long chains would
    // otherwise overflow the stack through recursive drops.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Arc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}
