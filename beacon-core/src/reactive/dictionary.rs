//! Reactive Dictionary
//!
//! A unique-key mapping backed by an `IndexMap`, so enumeration and the
//! whole-collection payload follow insertion order.
//!
//! # Events
//!
//! | Operation | Events, in order |
//! | --- | --- |
//! | `add`, `try_add`, `set` on a new key | added, collection changed |
//! | `set` on an existing key | value changed |
//! | `remove`, `remove_pair` | removed, collection changed |
//! | `clear` | collection changed |
//!
//! `clear` deliberately raises no per-entry removed events, unlike the bulk
//! removals of [`ReactiveList`](super::ReactiveList).

use std::fmt::{self, Debug};
use std::hash::Hash;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::collection::{CollectionEvents, CollectionKind, ReactiveCollection};
use crate::callback::{CallbackBuffer, Disposable, Subscription};
use crate::error::{Error, Result};

const TARGET: &str = "ReactiveDictionary";

/// A reactive `IndexMap`.
pub struct ReactiveDictionary<K, V> {
    entries: RwLock<IndexMap<K, V>>,
    events: CollectionEvents<(K, V)>,
    value_changed: CallbackBuffer<(K, V)>,
}

impl<K, V> ReactiveDictionary<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::from_map(IndexMap::new())
    }

    /// Create an empty dictionary with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_map(IndexMap::with_capacity(capacity))
    }

    /// Create a dictionary seeded with `entries`. Seeding raises no event.
    pub fn from_map(entries: IndexMap<K, V>) -> Self {
        Self {
            entries: RwLock::new(entries),
            events: CollectionEvents::new(TARGET),
            value_changed: CallbackBuffer::new(),
        }
    }

    /// Insert a new entry; fails with [`Error::DuplicateKey`] if `key` exists.
    pub fn add(&self, key: K, value: V) -> Result<()> {
        if self.try_add(key, value)? {
            Ok(())
        } else {
            Err(Error::DuplicateKey)
        }
    }

    /// Insert a new entry unless `key` exists. Returns whether it was inserted.
    pub fn try_add(&self, key: K, value: V) -> Result<bool> {
        self.events.ensure_live()?;
        {
            let mut entries = self.entries.write();
            if entries.contains_key(&key) {
                return Ok(false);
            }
            entries.insert(key.clone(), value.clone());
        }

        self.events.added.notify(&(key, value));
        self.notify_changed();
        Ok(true)
    }

    /// Insert or overwrite the entry for `key`.
    ///
    /// A new key raises added and collection changed; an existing key raises
    /// value changed only. Returns the previous value.
    pub fn set(&self, key: K, value: V) -> Result<Option<V>> {
        self.events.ensure_live()?;
        let previous = self.entries.write().insert(key.clone(), value.clone());

        let entry = (key, value);
        if previous.is_some() {
            self.value_changed.notify(&entry);
        } else {
            self.events.added.notify(&entry);
            self.notify_changed();
        }
        Ok(previous)
    }

    /// Remove the entry for `key` and return its value.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        self.events.ensure_live()?;
        let removed = self.entries.write().shift_remove_entry(key);

        let Some(entry) = removed else {
            return Ok(None);
        };
        self.events.removed.notify(&entry);
        self.notify_changed();
        Ok(Some(entry.1))
    }

    /// Remove every entry. Raises only the collection-changed event.
    pub fn clear(&self) -> Result<()> {
        self.events.ensure_live()?;
        self.entries.write().clear();
        self.notify_changed();
        Ok(())
    }

    /// Copy of the value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().cloned().collect()
    }

    /// Values in insertion order.
    pub fn values(&self) -> Vec<V> {
        self.entries.read().values().cloned().collect()
    }

    /// Copy of the entries in insertion order.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Subscribe to inserted entries.
    pub fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<(K, V)>>
    where
        F: Fn(&(K, V)) + Send + Sync + 'static,
    {
        self.events.subscribe_added(callback)
    }

    /// Subscribe to removed entries.
    pub fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<(K, V)>>
    where
        F: Fn(&(K, V)) + Send + Sync + 'static,
    {
        self.events.subscribe_removed(callback)
    }

    /// Subscribe to overwrites of existing keys.
    pub fn subscribe_value_changed<F>(&self, callback: F) -> Result<Subscription<(K, V)>>
    where
        F: Fn(&(K, V)) + Send + Sync + 'static,
    {
        self.events.ensure_live()?;
        Ok(self.value_changed.subscribe(callback))
    }

    /// Subscribe to the full contents after every structural change.
    pub fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[(K, V)]>>
    where
        F: Fn(&[(K, V)]) + Send + Sync + 'static,
    {
        self.events.subscribe_changed(callback)
    }

    fn notify_changed(&self) {
        self.events.notify_changed(|| self.to_vec());
    }
}

impl<K, V> ReactiveDictionary<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether `key` maps to a value equal to `value`.
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.entries.read().get(key) == Some(value)
    }

    /// Remove the entry for `key` only if it maps to a value equal to `value`.
    pub fn remove_pair(&self, key: &K, value: &V) -> Result<bool> {
        self.events.ensure_live()?;
        let removed = {
            let mut entries = self.entries.write();
            if entries.get(key) != Some(value) {
                return Ok(false);
            }
            entries.shift_remove_entry(key)
        };

        let Some(entry) = removed else {
            return Ok(false);
        };
        self.events.removed.notify(&entry);
        self.notify_changed();
        Ok(true)
    }
}

impl<K, V> Disposable for ReactiveDictionary<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn dispose(&self) {
        if !self.events.dispose() {
            return;
        }
        self.value_changed.dispose();
        self.entries.write().clear();
    }

    fn is_disposed(&self) -> bool {
        self.events.is_disposed()
    }
}

impl<K, V> ReactiveCollection for ReactiveDictionary<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    type Item = (K, V);

    fn kind(&self) -> CollectionKind {
        CollectionKind::Dictionary
    }

    fn len(&self) -> usize {
        ReactiveDictionary::len(self)
    }

    fn to_vec(&self) -> Vec<(K, V)> {
        ReactiveDictionary::to_vec(self)
    }

    fn add(&self, (key, value): (K, V)) -> Result<()> {
        ReactiveDictionary::add(self, key, value)
    }

    fn remove(&self, (key, value): &(K, V)) -> Result<bool> {
        self.remove_pair(key, value)
    }

    fn subscribe_added<F>(&self, callback: F) -> Result<Subscription<(K, V)>>
    where
        F: Fn(&(K, V)) + Send + Sync + 'static,
    {
        ReactiveDictionary::subscribe_added(self, callback)
    }

    fn subscribe_removed<F>(&self, callback: F) -> Result<Subscription<(K, V)>>
    where
        F: Fn(&(K, V)) + Send + Sync + 'static,
    {
        ReactiveDictionary::subscribe_removed(self, callback)
    }

    fn subscribe_collection_changed<F>(&self, callback: F) -> Result<Subscription<[(K, V)]>>
    where
        F: Fn(&[(K, V)]) + Send + Sync + 'static,
    {
        ReactiveDictionary::subscribe_collection_changed(self, callback)
    }
}

impl<K, V> Default for ReactiveDictionary<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for ReactiveDictionary<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K, V> Debug for ReactiveDictionary<K, V>
where
    K: Debug + Send + Sync + 'static,
    V: Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveDictionary")
            .field("entries", &*self.entries.read())
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

    type Dict = ReactiveDictionary<&'static str, i32>;

    fn attach(dict: &Dict) -> (Arc<Mutex<Vec<String>>>, Vec<Box<dyn Disposable>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut tokens: Vec<Box<dyn Disposable>> = Vec::new();

        let l = log.clone();
        tokens.push(Box::new(
            dict.subscribe_added(move |(k, v)| l.lock().push(format!("added {k}={v}")))
                .unwrap(),
        ));
        let l = log.clone();
        tokens.push(Box::new(
            dict.subscribe_removed(move |(k, v)| l.lock().push(format!("removed {k}={v}")))
                .unwrap(),
        ));
        let l = log.clone();
        tokens.push(Box::new(
            dict.subscribe_value_changed(move |(k, v)| {
                l.lock().push(format!("value_changed {k}={v}"))
            })
            .unwrap(),
        ));
        let l = log.clone();
        tokens.push(Box::new(
            dict.subscribe_collection_changed(move |entries| {
                let text: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                l.lock().push(format!("changed {}", text.join(",")))
            })
            .unwrap(),
        ));
        (log, tokens)
    }

    #[test]
    fn set_distinguishes_insert_from_update() {
        let dict = Dict::new();
        let (log, _tokens) = attach(&dict);

        assert_eq!(dict.set("k", 1).unwrap(), None);
        assert_eq!(dict.set("k", 2).unwrap(), Some(1));
        assert_eq!(
            *log.lock(),
            vec!["added k=1", "changed k=1", "value_changed k=2"]
        );
        assert_eq!(dict.get(&"k"), Some(2));
    }

    #[test]
    fn add_rejects_duplicates_silently_for_try_add() {
        let dict = Dict::new();
        let (log, _tokens) = attach(&dict);

        dict.add("a", 1).unwrap();
        assert_eq!(dict.add("a", 2), Err(Error::DuplicateKey));
        assert_eq!(dict.try_add("a", 3), Ok(false));
        assert_eq!(dict.try_add("b", 4), Ok(true));

        assert_eq!(
            *log.lock(),
            vec!["added a=1", "changed a=1", "added b=4", "changed a=1,b=4"]
        );
        assert_eq!(dict.get(&"a"), Some(1));
    }

    #[test]
    fn remove_reports_the_removed_entry() {
        let dict: Dict = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let (log, _tokens) = attach(&dict);

        assert_eq!(dict.remove(&"b").unwrap(), Some(2));
        assert_eq!(dict.remove(&"b").unwrap(), None);
        assert_eq!(*log.lock(), vec!["removed b=2", "changed a=1,c=3"]);
        assert_eq!(dict.keys(), vec!["a", "c"]);
    }

    #[test]
    fn remove_pair_requires_matching_value() {
        let dict: Dict = [("a", 1)].into_iter().collect();
        let (log, _tokens) = attach(&dict);

        assert!(!dict.remove_pair(&"a", &9).unwrap());
        assert!(!dict.remove_pair(&"z", &1).unwrap());
        assert!(log.lock().is_empty());

        assert!(dict.contains(&"a", &1));
        assert!(dict.remove_pair(&"a", &1).unwrap());
        assert_eq!(*log.lock(), vec!["removed a=1", "changed "]);
    }

    #[test]
    fn clear_raises_only_collection_changed() {
        let dict: Dict = [("a", 1), ("b", 2)].into_iter().collect();
        let (log, _tokens) = attach(&dict);

        dict.clear().unwrap();
        assert_eq!(*log.lock(), vec!["changed "]);
        assert!(dict.is_empty());
    }

    #[test]
    fn queries_follow_insertion_order() {
        let dict: Dict = [("z", 26), ("a", 1), ("m", 13)].into_iter().collect();
        assert_eq!(dict.keys(), vec!["z", "a", "m"]);
        assert_eq!(dict.values(), vec![26, 1, 13]);
        assert_eq!(dict.to_vec(), vec![("z", 26), ("a", 1), ("m", 13)]);
        assert!(dict.contains_key(&"m"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn generic_interface_uses_pairs() {
        let dict = Dict::new();
        assert_eq!(dict.kind(), CollectionKind::Dictionary);

        ReactiveCollection::add(&dict, ("a", 1)).unwrap();
        assert!(!ReactiveCollection::remove(&dict, &("a", 2)).unwrap());
        assert!(ReactiveCollection::remove(&dict, &("a", 1)).unwrap());
        assert!(ReactiveCollection::is_empty(&dict));
    }

    #[test]
    fn disposed_dictionary_rejects_mutation() {
        let dict: Dict = [("a", 1)].into_iter().collect();
        dict.dispose();
        dict.dispose();

        assert!(dict.is_disposed());
        assert!(dict.is_empty());
        assert_eq!(dict.set("b", 2), Err(Error::Disposed { target: TARGET }));
        assert!(dict.try_add("b", 2).is_err());
        assert!(dict.remove(&"a").is_err());
        assert!(dict.subscribe_value_changed(|_| {}).is_err());
    }
}
