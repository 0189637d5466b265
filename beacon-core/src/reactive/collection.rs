//! Shared collection plumbing.
//!
//! Every reactive container raises "item added", "item removed" and
//! "whole collection changed" events. [`CollectionEvents`] owns those three
//! buffers plus the disposal flag, and [`ReactiveCollection`] is the one
//! capability interface the containers expose to generic callers.
//!
//! Containers only implement the events they actually support. Generic
//! entry points that do not fit a container's ordering discipline (`add` and
//! `remove` on a queue or stack) return [`Error::Unsupported`] instead of
//! guessing at push/pop semantics.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::callback::{CallbackBuffer, CombinedSubscription, Disposable, Subscription};
use crate::error::{Error, Result};

/// The closed set of container variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollectionKind {
    /// Index-addressable sequence.
    List,
    /// Unique-key mapping.
    Dictionary,
    /// First in, first out.
    Queue,
    /// Last in, first out.
    Stack,
}

/// Payload of index-qualified list events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedItem<T> {
    /// Position of the item at the time of the event.
    pub index: usize,
    /// The item itself.
    pub item: T,
}

impl<T> IndexedItem<T> {
    /// Pair an item with its index.
    pub fn new(index: usize, item: T) -> Self {
        Self { index, item }
    }
}

/// Subscription to two events of the same collection, released together.
pub type MembershipSubscription<T> = CombinedSubscription<Subscription<T>, Subscription<T>>;

/// Capability interface shared by all reactive containers.
pub trait ReactiveCollection: Disposable {
    /// Element type; for dictionaries a `(key, value)` pair.
    type Item: Clone + Send + Sync + 'static;

    /// Which variant this is.
    fn kind(&self) -> CollectionKind;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the collection holds no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the contents in the container's natural order.
    fn to_vec(&self) -> Vec<Self::Item>;

    /// Generic insertion.
    fn add(&self, item: Self::Item) -> Result<()>;

    /// Generic removal of one matching element.
    fn remove(&self, item: &Self::Item) -> Result<bool>;

    /// Subscribe to "item added".
    fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<Self::Item>>
    where
        F: Fn(&Self::Item) + Send + Sync + 'static;

    /// Subscribe to "item removed".
    fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<Self::Item>>
    where
        F: Fn(&Self::Item) + Send + Sync + 'static;

    /// Subscribe to "whole collection changed", which carries the full contents.
    fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[Self::Item]>>
    where
        F: Fn(&[Self::Item]) + Send + Sync + 'static;

    /// Observe membership through one token covering both "added" and "removed".
    fn observe<A, R>(&self, on_added: A, on_removed: R) -> Result<MembershipSubscription<Self::Item>>
    where
        A: Fn(&Self::Item) + Send + Sync + 'static,
        R: Fn(&Self::Item) + Send + Sync + 'static,
    {
        let added = self.subscribe_added(on_added)?;
        let removed = match self.subscribe_removed(on_removed) {
            Ok(removed) => removed,
            Err(err) => {
                added.release();
                return Err(err);
            }
        };
        Ok(CombinedSubscription::new(added, removed))
    }
}

/// The buffers and disposal flag every container carries.
pub(crate) struct CollectionEvents<T> {
    pub(crate) added: CallbackBuffer<T>,
    pub(crate) removed: CallbackBuffer<T>,
    pub(crate) changed: CallbackBuffer<[T]>,
    disposed: AtomicBool,
    target: &'static str,
}

impl<T: Send + Sync + 'static> CollectionEvents<T> {
    pub(crate) fn new(target: &'static str) -> Self {
        Self {
            added: CallbackBuffer::new(),
            removed: CallbackBuffer::new(),
            changed: CallbackBuffer::new(),
            disposed: AtomicBool::new(false),
            target,
        }
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed {
                target: self.target,
            });
        }
        Ok(())
    }

    pub(crate) fn unsupported(&self, operation: &'static str) -> Error {
        Error::Unsupported {
            operation,
            target: self.target,
        }
    }

    pub(crate) fn empty(&self) -> Error {
        Error::Empty {
            target: self.target,
        }
    }

    /// Broadcast the full contents, copying them only if someone listens.
    pub(crate) fn notify_changed(&self, contents: impl FnOnce() -> Vec<T>) {
        if self.changed.has_subscribers() {
            let contents = contents();
            self.changed.notify(&contents);
        }
    }

    pub(crate) fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        Ok(self.added.subscribe(callback))
    }

    pub(crate) fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        Ok(self.removed.subscribe(callback))
    }

    pub(crate) fn subscribe_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        Ok(self.changed.subscribe(callback))
    }

    /// Mark disposed and drop every subscriber.
    ///
    /// Returns false if the collection was already disposed.
    pub(crate) fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.added.dispose();
        self.removed.dispose();
        self.changed.dispose();
        tracing::debug!(target_type = self.target, "disposed");
        true
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
