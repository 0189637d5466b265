//! Reactive Queue
//!
//! A first-in, first-out queue. Only the ordered operations mutate it:
//! `enqueue` raises added then collection changed, a successful `dequeue`
//! raises removed then collection changed. The generic `add`/`remove` of
//! [`ReactiveCollection`] are rejected with [`Error::Unsupported`].

use std::collections::VecDeque;
use std::fmt::{self, Debug};

use parking_lot::RwLock;

use super::collection::{CollectionEvents, CollectionKind, ReactiveCollection};
use crate::callback::{Disposable, Subscription};
use crate::error::{Error, Result};

const TARGET: &str = "ReactiveQueue";

/// A reactive `VecDeque` used as a FIFO queue.
pub struct ReactiveQueue<T> {
    items: RwLock<VecDeque<T>>,
    events: CollectionEvents<T>,
}

impl<T> ReactiveQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::from_deque(VecDeque::new())
    }

    /// Create an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_deque(VecDeque::with_capacity(capacity))
    }

    /// Create a queue seeded with `items`, front first. Seeding raises no event.
    pub fn from_deque(items: VecDeque<T>) -> Self {
        Self {
            items: RwLock::new(items),
            events: CollectionEvents::new(TARGET),
        }
    }

    /// Append `item` at the back.
    pub fn enqueue(&self, item: T) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().push_back(item.clone());

        self.events.added.notify(&item);
        self.notify_changed();
        Ok(())
    }

    /// Remove the front element; fails with [`Error::Empty`] on an empty queue.
    pub fn dequeue(&self) -> Result<T> {
        self.try_dequeue()?.ok_or_else(|| self.events.empty())
    }

    /// Remove the front element if there is one.
    ///
    /// An empty queue yields `Ok(None)` and raises nothing.
    pub fn try_dequeue(&self) -> Result<Option<T>> {
        self.events.ensure_live()?;
        let Some(item) = self.items.write().pop_front() else {
            return Ok(None);
        };

        self.events.removed.notify(&item);
        self.notify_changed();
        Ok(Some(item))
    }

    /// Copy of the front element; fails with [`Error::Empty`] on an empty queue.
    pub fn peek(&self) -> Result<T> {
        self.try_peek().ok_or_else(|| self.events.empty())
    }

    /// Copy of the front element, if any.
    pub fn try_peek(&self) -> Option<T> {
        self.items.read().front().cloned()
    }

    /// Remove every element. Raises only the collection-changed event.
    pub fn clear(&self) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().clear();
        self.notify_changed();
        Ok(())
    }

    /// Copy of the contents, front first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().iter().cloned().collect()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Subscribe to enqueued elements.
    pub fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_added(callback)
    }

    /// Subscribe to dequeued elements.
    pub fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_removed(callback)
    }

    /// Subscribe to the full contents, front first, after every change.
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

impl<T> ReactiveQueue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether an element equal to `item` is queued.
    pub fn contains(&self, item: &T) -> bool {
        self.items.read().contains(item)
    }
}

/// Shallow copy of the elements with fresh, subscriber-free buffers.
impl<T> Clone for ReactiveQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self::from_deque(self.items.read().clone())
    }
}

impl<T> Disposable for ReactiveQueue<T>
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

impl<T> ReactiveCollection for ReactiveQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn kind(&self) -> CollectionKind {
        CollectionKind::Queue
    }

    fn len(&self) -> usize {
        ReactiveQueue::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ReactiveQueue::to_vec(self)
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
        ReactiveQueue::subscribe_added(self, callback)
    }

    fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        ReactiveQueue::subscribe_removed(self, callback)
    }

    fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        ReactiveQueue::subscribe_collection_changed(self, callback)
    }
}

impl<T> Default for ReactiveQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ReactiveQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_deque(iter.into_iter().collect())
    }
}

impl<T: Debug + Send + Sync + 'static> Debug for ReactiveQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveQueue")
            .field("items", &*self.items.read())
            .field("disposed", &self.events.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn attach(queue: &ReactiveQueue<i32>) -> (Arc<Mutex<Vec<String>>>, Vec<Box<dyn Disposable>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, r, c) = (log.clone(), log.clone(), log.clone());
        let tokens: Vec<Box<dyn Disposable>> = vec![
            Box::new(queue.subscribe_added(move |v| a.lock().push(format!("added {v}"))).unwrap()),
            Box::new(queue.subscribe_removed(move |v| r.lock().push(format!("removed {v}"))).unwrap()),
            Box::new(
                queue
                    .subscribe_collection_changed(move |items| c.lock().push(format!("changed {items:?}")))
                    .unwrap(),
            ),
        ];
        (log, tokens)
    }

    #[test]
    fn fifo_order_and_events() {
        let queue = ReactiveQueue::new();
        let (log, _tokens) = attach(&queue);

        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        assert_eq!(queue.dequeue().unwrap(), 1);

        assert_eq!(
            *log.lock(),
            vec![
                "added 1",
                "changed [1]",
                "added 2",
                "changed [1, 2]",
                "removed 1",
                "changed [2]",
            ]
        );
    }

    #[test]
    fn empty_queue_fails_or_reports_absent() {
        let queue = ReactiveQueue::<i32>::new();
        let (log, _tokens) = attach(&queue);

        assert_eq!(queue.dequeue(), Err(Error::Empty { target: TARGET }));
        assert_eq!(queue.try_dequeue(), Ok(None));
        assert_eq!(queue.peek(), Err(Error::Empty { target: TARGET }));
        assert_eq!(queue.try_peek(), None);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn peek_raises_nothing() {
        let queue: ReactiveQueue<i32> = [4, 5].into_iter().collect();
        let (log, _tokens) = attach(&queue);

        assert_eq!(queue.peek().unwrap(), 4);
        assert_eq!(queue.to_vec(), vec![4, 5]);
        assert!(queue.contains(&5));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn generic_add_and_remove_are_unsupported() {
        let queue = ReactiveQueue::new();
        let (log, _tokens) = attach(&queue);

        let err = ReactiveCollection::add(&queue, 1).unwrap_err();
        assert_eq!(
            err,
            Error::Unsupported {
                operation: "add",
                target: TARGET
            }
        );
        queue.enqueue(1).unwrap();
        log.lock().clear();

        assert!(ReactiveCollection::remove(&queue, &1).is_err());
        assert_eq!(queue.len(), 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn clone_shares_no_subscribers() {
        let queue: ReactiveQueue<i32> = [1, 2].into_iter().collect();
        let (log, _tokens) = attach(&queue);

        let copy = queue.clone();
        copy.enqueue(3).unwrap();
        assert_eq!(copy.to_vec(), vec![1, 2, 3]);
        assert_eq!(queue.to_vec(), vec![1, 2]);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn disposed_queue_rejects_mutation() {
        let queue: ReactiveQueue<i32> = [1].into_iter().collect();
        queue.dispose();
        queue.dispose();

        assert!(queue.is_disposed());
        assert!(queue.is_empty());
        assert!(queue.enqueue(2).is_err());
        assert_eq!(queue.try_dequeue(), Err(Error::Disposed { target: TARGET }));
    }
}
