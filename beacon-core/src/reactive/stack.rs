//! Reactive Stack
//!
//! A last-in, first-out stack. `push` raises added then collection changed,
//! a successful `pop` raises removed then collection changed. Contents are
//! always reported top first, in the order `pop` would return them.

use std::fmt::{self, Debug};

use parking_lot::RwLock;

use super::collection::{CollectionEvents, CollectionKind, ReactiveCollection};
use crate::callback::{Disposable, Subscription};
use crate::error::{Error, Result};

const TARGET: &str = "ReactiveStack";

/// A reactive LIFO stack. The top is the last element of the backing `Vec`.
pub struct ReactiveStack<T> {
    items: RwLock<Vec<T>>,
    events: CollectionEvents<T>,
}

impl<T> ReactiveStack<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::from_bottom_up(Vec::new())
    }

    /// Create an empty stack with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_bottom_up(Vec::with_capacity(capacity))
    }

    /// Create a stack from `items`, pushed in order so the last one is on top.
    /// Seeding raises no event.
    pub fn from_bottom_up(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            events: CollectionEvents::new(TARGET),
        }
    }

    /// Push `item` on top.
    pub fn push(&self, item: T) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().push(item.clone());

        self.events.added.notify(&item);
        self.notify_changed();
        Ok(())
    }

    /// Remove the top element; fails with [`Error::Empty`] on an empty stack.
    pub fn pop(&self) -> Result<T> {
        self.try_pop()?.ok_or_else(|| self.events.empty())
    }

    /// Remove the top element if there is one.
    ///
    /// An empty stack yields `Ok(None)` and raises nothing.
    pub fn try_pop(&self) -> Result<Option<T>> {
        self.events.ensure_live()?;
        let Some(item) = self.items.write().pop() else {
            return Ok(None);
        };

        self.events.removed.notify(&item);
        self.notify_changed();
        Ok(Some(item))
    }

    /// Copy of the top element; fails with [`Error::Empty`] on an empty stack.
    pub fn peek(&self) -> Result<T> {
        self.try_peek().ok_or_else(|| self.events.empty())
    }

    /// Copy of the top element, if any.
    pub fn try_peek(&self) -> Option<T> {
        self.items.read().last().cloned()
    }

    /// Remove every element. Raises only the collection-changed event.
    pub fn clear(&self) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().clear();
        self.notify_changed();
        Ok(())
    }

    /// Copy of the contents, top first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().iter().rev().cloned().collect()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Subscribe to pushed elements.
    pub fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_added(callback)
    }

    /// Subscribe to popped elements.
    pub fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_removed(callback)
    }

    /// Subscribe to the full contents, top first, after every change.
    pub fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.events.subscribe_changed(callback)
    }

    fn notify_changed(&self) {
        self.events.notify_changed(|| self.to_vec());
    }
}

impl<T> ReactiveStack<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether an element equal to `item` is on the stack.
    pub fn contains(&self, item: &T) -> bool {
        self.items.read().contains(item)
    }
}

/// Shallow copy of the elements with fresh, subscriber-free buffers.
impl<T> Clone for ReactiveStack<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self::from_bottom_up(self.items.read().clone())
    }
}

impl<T> Disposable for ReactiveStack<T>
where
    T: Send + Sync + 'static,
{
    fn dispose(&self) {
        if self.events.dispose() {
            self.items.write().clear();
        }
    }

    fn is_disposed(&self) -> bool {
        self.events.is_disposed()
    }
}

impl<T> ReactiveCollection for ReactiveStack<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn kind(&self) -> CollectionKind {
        CollectionKind::Stack
    }

    fn len(&self) -> usize {
        ReactiveStack::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ReactiveStack::to_vec(self)
    }

    fn add(&self, _item: T) -> Result<()> {
        Err(self.events.unsupported("add"))
    }

    fn remove(&self, _item: &T) -> Result<bool> {
        Err(self.events.unsupported("remove"))
    }

    fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        ReactiveStack::subscribe_added(self, callback)
    }

    fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        ReactiveStack::subscribe_removed(self, callback)
    }

    fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        ReactiveStack::subscribe_collection_changed(self, callback)
    }
}

impl<T> Default for ReactiveStack<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug + Send + Sync + 'static> Debug for ReactiveStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveStack")
            .field("bottom_up", &*self.items.read())
            .field("disposed", &self.events.is_disposed())
            .finish()
    }
}
