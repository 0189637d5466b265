//! Reactive List
//!
//! An ordered, index-addressable sequence that allows duplicates and raises
//! events for every structural change.
//!
//! # Events
//!
//! | Operation | Events, in order |
//! | --- | --- |
//! | `add` | added, collection changed |
//! | `insert` | added at, added, collection changed |
//! | `remove_at`, `remove`, `remove_first` | removed at, removed, collection changed |
//! | `remove_all`, `remove_range` | removed (per element), collection changed |
//! | `set` | changed at |
//! | `add_range`, `insert_range`, `sort`, `reverse`, `clear` | collection changed |
//!
//! Removal events carry the element's value (and index) from before the
//! removal. Bulk removals raise a single collection-changed event after all
//! per-element events. `remove_range` raises its removed events while the
//! range is still in place; every other operation raises its events after
//! the storage has changed. Queries raise nothing.
//!
//! Storage is released before any event is raised, so subscribers may read
//! or mutate the list again. Predicates and comparators passed to the list
//! run under its lock and must not access the list.

use std::cmp::Ordering as CmpOrdering;
use std::fmt::{self, Debug};
use std::ops::Range;

use parking_lot::RwLock;

use super::collection::{CollectionEvents, CollectionKind, IndexedItem, ReactiveCollection};
use crate::callback::{CallbackBuffer, Disposable, Subscription};
use crate::error::{Error, Result};

const TARGET: &str = "ReactiveList";

/// A reactive `Vec`.
///
/// # Example
///
/// ```rust
/// use beacon_core::reactive::ReactiveList;
///
/// let list = ReactiveList::<&str>::new();
/// let _token = list
///     .subscribe_collection_changed(|items| println!("now {items:?}"))
///     .unwrap();
///
/// list.add("a").unwrap(); // prints `now ["a"]`
/// list.add("b").unwrap(); // prints `now ["a", "b"]`
/// ```
pub struct ReactiveList<T> {
    items: RwLock<Vec<T>>,
    events: CollectionEvents<T>,
    added_at: CallbackBuffer<IndexedItem<T>>,
    removed_at: CallbackBuffer<IndexedItem<T>>,
    changed_at: CallbackBuffer<IndexedItem<T>>,
}

impl<T> ReactiveList<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    /// Create a list seeded with `items`. Seeding raises no event.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            events: CollectionEvents::new(TARGET),
            added_at: CallbackBuffer::new(),
            removed_at: CallbackBuffer::new(),
            changed_at: CallbackBuffer::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Append `item`.
    pub fn add(&self, item: T) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().push(item.clone());

        self.events.added.notify(&item);
        self.notify_changed();
        Ok(())
    }

    /// Insert `item` at `index`, shifting later elements.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        self.events.ensure_live()?;
        {
            let mut items = self.items.write();
            if index > items.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.insert(index, item.clone());
        }

        self.added_at.notify_with(|| IndexedItem::new(index, item.clone()));
        self.events.added.notify(&item);
        self.notify_changed();
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        self.events.ensure_live()?;
        let item = {
            let mut items = self.items.write();
            if index >= items.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.remove(index)
        };

        self.notify_removed(index, &item);
        self.notify_changed();
        Ok(item)
    }

    /// Remove the first element matching `predicate`.
    ///
    /// The list is write-locked while `predicate` runs; it must not access
    /// the list.
    pub fn remove_first<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.events.ensure_live()?;
        let removed = {
            let mut items = self.items.write();
            let found = items.iter().position(predicate);
            found.map(|index| (index, items.remove(index)))
        };

        let Some((index, item)) = removed else {
            return Ok(None);
        };
        self.notify_removed(index, &item);
        self.notify_changed();
        Ok(Some(item))
    }

    /// Remove every element matching `predicate` and return how many went.
    ///
    /// Raises one removed event per element, then one collection-changed
    /// event. Nothing is raised when no element matches.
    ///
    /// The list is write-locked while `predicate` runs; it must not access
    /// the list. If `predicate` panics, the elements not yet removed stay.
    pub fn remove_all<P>(&self, mut predicate: P) -> Result<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.events.ensure_live()?;
        let mut removed = Vec::new();
        self.items.write().retain(|item| {
            if predicate(item) {
                removed.push(item.clone());
                false
            } else {
                true
            }
        });

        if removed.is_empty() {
            return Ok(0);
        }
        for item in &removed {
            self.events.removed.notify(item);
        }
        self.notify_changed();
        Ok(removed.len())
    }

    /// Remove the elements in `range` and return them.
    ///
    /// One removed event per element is raised before the elements leave
    /// the list, so subscribers still see them in place. The bounds are
    /// checked again afterwards; if a subscriber shrank the list below
    /// `range.end`, nothing is removed and the call fails.
    pub fn remove_range(&self, range: Range<usize>) -> Result<Vec<T>> {
        self.events.ensure_live()?;
        let doomed: Vec<T> = {
            let items = self.items.read();
            check_range(&range, items.len())?;
            items[range.clone()].to_vec()
        };

        for item in &doomed {
            self.events.removed.notify(item);
        }

        let removed: Vec<T> = {
            let mut items = self.items.write();
            check_range(&range, items.len())?;
            items.drain(range).collect()
        };
        self.notify_changed();
        Ok(removed)
    }

    /// Replace the element at `index`.
    ///
    /// This is a content change, not a membership change: only the
    /// changed-at event is raised.
    pub fn set(&self, index: usize, item: T) -> Result<T> {
        self.events.ensure_live()?;
        let previous = {
            let mut items = self.items.write();
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(Error::IndexOutOfRange { index, len })?;
            std::mem::replace(slot, item.clone())
        };

        self.changed_at.notify(&IndexedItem::new(index, item));
        Ok(previous)
    }

    /// Append every element of `items`.
    pub fn add_range<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.events.ensure_live()?;
        self.items.write().extend(items);
        self.notify_changed();
        Ok(())
    }

    /// Insert every element of `items` starting at `index`.
    pub fn insert_range<I>(&self, index: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.events.ensure_live()?;
        {
            let mut current = self.items.write();
            if index > current.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: current.len(),
                });
            }
            current.splice(index..index, items);
        }
        self.notify_changed();
        Ok(())
    }

    /// Sort with a comparator. The sort is stable.
    ///
    /// The list is write-locked while `compare` runs; it must not access
    /// the list.
    pub fn sort_by<F>(&self, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> CmpOrdering,
    {
        self.events.ensure_live()?;
        self.items.write().sort_by(compare);
        self.notify_changed();
        Ok(())
    }

    /// Reverse the order of the elements.
    pub fn reverse(&self) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().reverse();
        self.notify_changed();
        Ok(())
    }

    /// Remove every element. Raises only the collection-changed event.
    pub fn clear(&self) -> Result<()> {
        self.events.ensure_live()?;
        self.items.write().clear();
        self.notify_changed();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// First element matching `predicate`.
    ///
    /// The list is read-locked while `predicate` runs; it must not mutate
    /// the list.
    pub fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.read().iter().find(|item| predicate(*item)).cloned()
    }

    /// Index of the first element matching `predicate`.
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.read().iter().position(predicate)
    }

    /// Copy of the contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Borrow the contents as a slice.
    ///
    /// The list is read-locked while `f` runs; `f` must not mutate it.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    /// Visit every element in order under one read lock. `f` must not
    /// mutate the list.
    pub fn for_each(&self, f: impl FnMut(&T)) {
        self.items.read().iter().for_each(f);
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Subscribe to appended or inserted elements.
    pub fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_added(callback)
    }

    /// Subscribe to removed elements.
    pub fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.events.subscribe_removed(callback)
    }

    /// Subscribe to inserted elements together with their index.
    pub fn subscribe_added_at<F>(&self, callback: F) -> Result<Subscription<IndexedItem<T>>>
    where
        F: Fn(&IndexedItem<T>) + Send + Sync + 'static,
    {
        self.events.ensure_live()?;
        Ok(self.added_at.subscribe(callback))
    }

    /// Subscribe to single-element removals together with their former index.
    pub fn subscribe_removed_at<F>(&self, callback: F) -> Result<Subscription<IndexedItem<T>>>
    where
        F: Fn(&IndexedItem<T>) + Send + Sync + 'static,
    {
        self.events.ensure_live()?;
        Ok(self.removed_at.subscribe(callback))
    }

    /// Subscribe to in-place replacements made through [`set`](Self::set).
    pub fn subscribe_changed_at<F>(&self, callback: F) -> Result<Subscription<IndexedItem<T>>>
    where
        F: Fn(&IndexedItem<T>) + Send + Sync + 'static,
    {
        self.events.ensure_live()?;
        Ok(self.changed_at.subscribe(callback))
    }

    /// Subscribe to the full contents after every structural change.
    pub fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.events.subscribe_changed(callback)
    }

    fn notify_removed(&self, index: usize, item: &T) {
        self.removed_at.notify_with(|| IndexedItem::new(index, item.clone()));
        self.events.removed.notify(item);
    }

    fn notify_changed(&self) {
        self.events.notify_changed(|| self.items.read().clone());
    }
}

impl<T> ReactiveList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Remove the first element equal to `item`.
    pub fn remove(&self, item: &T) -> Result<bool> {
        Ok(self.remove_first(|candidate| candidate == item)?.is_some())
    }

    /// Whether an element equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.items.read().contains(item)
    }

    /// Index of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.read().iter().position(|candidate| candidate == item)
    }

    /// Index of the last element equal to `item`.
    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        self.items.read().iter().rposition(|candidate| candidate == item)
    }
}

impl<T> ReactiveList<T>
where
    T: Clone + Ord + Send + Sync + 'static,
{
    /// Sort in ascending order.
    pub fn sort(&self) -> Result<()> {
        self.sort_by(T::cmp)
    }

    /// Binary search a sorted list. See [`slice::binary_search`].
    pub fn binary_search(&self, item: &T) -> std::result::Result<usize, usize> {
        self.items.read().binary_search(item)
    }
}

impl<T> Disposable for ReactiveList<T>
where
    T: Send + Sync + 'static,
{
    fn dispose(&self) {
        if !self.events.dispose() {
            return;
        }
        self.added_at.dispose();
        self.removed_at.dispose();
        self.changed_at.dispose();
        self.items.write().clear();
    }

    fn is_disposed(&self) -> bool {
        self.events.is_disposed()
    }
}

impl<T> ReactiveCollection for ReactiveList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type Item = T;

    fn kind(&self) -> CollectionKind {
        CollectionKind::List
    }

    fn len(&self) -> usize {
        ReactiveList::len(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ReactiveList::to_vec(self)
    }

    fn add(&self, item: T) -> Result<()> {
        ReactiveList::add(self, item)
    }

    fn remove(&self, item: &T) -> Result<bool> {
        ReactiveList::remove(self, item)
    }

    fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        ReactiveList::subscribe_added(self, callback)
    }

    fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        ReactiveList::subscribe_removed(self, callback)
    }

    fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[T]>>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        ReactiveList::subscribe_collection_changed(self, callback)
    }
}

impl<T> Default for ReactiveList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ReactiveList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for ReactiveList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(Error::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

impl<T: Debug + Send + Sync + 'static> Debug for ReactiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveList")
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

    /// Records every event of a list as a readable line.
    struct Recorder {
        log: Arc<Mutex<Vec<String>>>,
        _tokens: Vec<Box<dyn Disposable>>,
    }

    impl Recorder {
        fn attach(list: &ReactiveList<&'static str>) -> Self {
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut tokens: Vec<Box<dyn Disposable>> = Vec::new();

            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_added(move |v| l.lock().push(format!("added {v}")))
                    .unwrap(),
            ));
            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_removed(move |v| l.lock().push(format!("removed {v}")))
                    .unwrap(),
            ));
            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_added_at(move |e| {
                    l.lock().push(format!("added_at {} {}", e.item, e.index))
                })
                .unwrap(),
            ));
            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_removed_at(move |e| {
                    l.lock().push(format!("removed_at {} {}", e.item, e.index))
                })
                .unwrap(),
            ));
            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_changed_at(move |e| {
                    l.lock().push(format!("changed_at {} {}", e.item, e.index))
                })
                .unwrap(),
            ));
            let l = log.clone();
            tokens.push(Box::new(
                list.subscribe_collection_changed(move |items| {
                    l.lock().push(format!("changed {}", items.join(",")))
                })
                .unwrap(),
            ));

            Self {
                log,
                _tokens: tokens,
            }
        }

        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.lock())
        }
    }

    #[test]
    fn add_raises_added_then_changed() {
        let list = ReactiveList::new();
        let recorder = Recorder::attach(&list);

        list.add("a").unwrap();
        list.add("b").unwrap();
        assert_eq!(
            recorder.take(),
            vec!["added a", "changed a", "added b", "changed a,b"]
        );
    }

    #[test]
    fn insert_raises_indexed_event_first() {
        let list = ReactiveList::from(vec!["a", "c"]);
        let recorder = Recorder::attach(&list);

        list.insert(1, "b").unwrap();
        assert_eq!(
            recorder.take(),
            vec!["added_at b 1", "added b", "changed a,b,c"]
        );
    }

    #[test]
    fn insert_out_of_range_does_nothing() {
        let list = ReactiveList::from(vec!["a"]);
        let recorder = Recorder::attach(&list);

        assert_eq!(
            list.insert(2, "x"),
            Err(Error::IndexOutOfRange { index: 2, len: 1 })
        );
        assert!(recorder.take().is_empty());
        assert_eq!(list.to_vec(), vec!["a"]);

        list.insert(1, "b").unwrap();
        assert_eq!(list.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn remove_at_reports_value_and_index() {
        let list = ReactiveList::from(vec!["a", "b", "c"]);
        let recorder = Recorder::attach(&list);

        assert_eq!(list.remove_at(1).unwrap(), "b");
        assert_eq!(
            recorder.take(),
            vec!["removed_at b 1", "removed b", "changed a,c"]
        );
        assert!(list.remove_at(5).is_err());
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn remove_by_value_and_predicate() {
        let list = ReactiveList::from(vec!["a", "b", "a"]);
        let recorder = Recorder::attach(&list);

        assert!(list.remove(&"a").unwrap());
        assert_eq!(
            recorder.take(),
            vec!["removed_at a 0", "removed a", "changed b,a"]
        );

        assert!(!list.remove(&"z").unwrap());
        assert!(recorder.take().is_empty());

        assert_eq!(list.remove_first(|v| *v == "a").unwrap(), Some("a"));
        assert_eq!(
            recorder.take(),
            vec!["removed_at a 1", "removed a", "changed b"]
        );
    }

    #[test]
    fn remove_all_batches_collection_changed() {
        let list = ReactiveList::from(vec!["x", "a", "x", "b", "x"]);
        let recorder = Recorder::attach(&list);

        assert_eq!(list.remove_all(|v| *v == "x").unwrap(), 3);
        assert_eq!(
            recorder.take(),
            vec!["removed x", "removed x", "removed x", "changed a,b"]
        );

        assert_eq!(list.remove_all(|v| *v == "x").unwrap(), 0);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn remove_range_reports_pre_removal_values() {
        let list = ReactiveList::from(vec!["a", "b", "c", "d"]);
        let recorder = Recorder::attach(&list);

        assert_eq!(list.remove_range(1..3).unwrap(), vec!["b", "c"]);
        assert_eq!(recorder.take(), vec!["removed b", "removed c", "changed a,d"]);

        assert_eq!(
            list.remove_range(1..5),
            Err(Error::RangeOutOfBounds { start: 1, end: 5, len: 2 })
        );
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn remove_range_subscribers_see_elements_in_place() {
        let list = Arc::new(ReactiveList::from(vec!["a", "b", "c", "d"]));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&list);
        let seen_clone = seen.clone();
        let _token = list
            .subscribe_removed(move |v| {
                if let Some(list) = weak.upgrade() {
                    seen_clone.lock().push(format!("{v}: {}", list.to_vec().join(",")));
                }
            })
            .unwrap();

        list.remove_range(1..3).unwrap();
        assert_eq!(*seen.lock(), vec!["b: a,b,c,d", "c: a,b,c,d"]);
        assert_eq!(list.to_vec(), vec!["a", "d"]);
    }

    #[test]
    fn remove_range_fails_when_a_subscriber_shrinks_the_list() {
        let list = Arc::new(ReactiveList::from(vec!["a", "b", "c"]));
        let weak = Arc::downgrade(&list);
        let _token = list
            .subscribe_removed(move |_| {
                if let Some(list) = weak.upgrade() {
                    list.clear().unwrap();
                }
            })
            .unwrap();

        assert_eq!(
            list.remove_range(1..3),
            Err(Error::RangeOutOfBounds { start: 1, end: 3, len: 0 })
        );
        assert!(list.is_empty());
    }

    #[test]
    fn remove_all_keeps_unvisited_elements_when_predicate_panics() {
        let list = ReactiveList::from(vec!["x", "a", "boom", "b"]);
        let recorder = Recorder::attach(&list);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            list.remove_all(|v| {
                assert_ne!(*v, "boom");
                *v == "x"
            })
        }));

        assert!(result.is_err());
        assert_eq!(list.to_vec(), vec!["a", "boom", "b"]);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn set_raises_changed_at_only() {
        let list = ReactiveList::from(vec!["a", "b"]);
        let recorder = Recorder::attach(&list);

        assert_eq!(list.set(1, "z").unwrap(), "b");
        assert_eq!(recorder.take(), vec!["changed_at z 1"]);
        assert_eq!(list.get(1), Some("z"));

        assert!(list.set(2, "y").is_err());
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn bulk_operations_raise_one_changed_event() {
        let list = ReactiveList::new();
        let recorder = Recorder::attach(&list);

        list.add_range(["c", "a", "b"]).unwrap();
        assert_eq!(recorder.take(), vec!["changed c,a,b"]);

        list.sort().unwrap();
        assert_eq!(recorder.take(), vec!["changed a,b,c"]);

        list.reverse().unwrap();
        assert_eq!(recorder.take(), vec!["changed c,b,a"]);

        list.insert_range(1, ["x", "y"]).unwrap();
        assert_eq!(recorder.take(), vec!["changed c,x,y,b,a"]);

        list.clear().unwrap();
        assert_eq!(recorder.take(), vec!["changed "]);
    }

    #[test]
    fn queries_raise_nothing() {
        let list = ReactiveList::from(vec![1, 3, 5, 3]);
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        let _token = list
            .subscribe_collection_changed(move |_| *count_clone.lock() += 1)
            .unwrap();

        assert!(list.contains(&3));
        assert_eq!(list.index_of(&3), Some(1));
        assert_eq!(list.last_index_of(&3), Some(3));
        assert_eq!(list.find(|v| *v > 3), Some(5));
        assert_eq!(list.find_index(|v| *v > 3), Some(2));
        assert_eq!(list.with_items(|items| items.iter().sum::<i32>()), 12);

        let mut visited = Vec::new();
        list.for_each(|v| visited.push(*v));
        assert_eq!(visited, vec![1, 3, 5, 3]);

        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn binary_search_on_sorted_list() {
        let list: ReactiveList<i32> = [5, 1, 3].into_iter().collect();
        list.sort().unwrap();
        assert_eq!(list.binary_search(&3), Ok(1));
        assert_eq!(list.binary_search(&4), Err(2));
    }

    #[test]
    fn disposed_list_rejects_mutation() {
        let list = ReactiveList::from(vec!["a"]);
        list.dispose();
        list.dispose();

        assert!(list.is_disposed());
        assert!(list.is_empty());
        assert_eq!(list.add("b"), Err(Error::Disposed { target: TARGET }));
        assert!(list.remove_at(0).is_err());
        assert!(list.clear().is_err());
        assert!(list.subscribe_added(|_| {}).is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn subscriber_may_mutate_the_list() {
        let list = Arc::new(ReactiveList::new());
        let weak = Arc::downgrade(&list);
        let _token = list
            .subscribe_added(move |v: &i32| {
                if *v < 3 {
                    if let Some(list) = weak.upgrade() {
                        list.add(v + 1).unwrap();
                    }
                }
            })
            .unwrap();

        list.add(1).unwrap();
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn observe_covers_added_and_removed() {
        let list = ReactiveList::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, r) = (log.clone(), log.clone());

        let token = list
            .observe(
                move |v: &i32| a.lock().push(*v),
                move |v: &i32| r.lock().push(-*v),
            )
            .unwrap();

        list.add(1).unwrap();
        list.remove_at(0).unwrap();
        token.release();
        list.add(2).unwrap();

        assert_eq!(*log.lock(), vec![1, -1]);
    }
}
