//! Reactive Property
//!
//! A `ReactiveProperty<T>` holds one value and notifies its subscribers when
//! the value changes.
//!
//! # Change Detection
//!
//! `set` compares the new value with the stored one using `PartialEq`. Equal
//! values are ignored; anything else is stored and then broadcast, first to
//! the permanent subscribers and then to pending one-shot subscribers.
//! Types whose `PartialEq` compares identity rather than contents notify on
//! every distinct instance, which is accepted.
//!
//! # Disposal
//!
//! After `dispose`, reads still return the last value while `set`, `update`
//! and every subscribe call fail with [`Error::Disposed`]. One-shot
//! subscribers that never fired are dropped without running.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::callback::{Callback, CallbackBuffer, Disposable, Subscription};
use crate::error::{Error, Result};

const TARGET: &str = "ReactiveProperty";

/// A single reactive value.
///
/// # Example
///
/// ```rust
/// use beacon_core::reactive::ReactiveProperty;
///
/// let count = ReactiveProperty::new(0);
/// let _token = count.subscribe(|v| println!("count is {v}")).unwrap();
///
/// count.set(1).unwrap(); // prints "count is 1"
/// count.set(1).unwrap(); // unchanged, prints nothing
/// ```
pub struct ReactiveProperty<T> {
    value: RwLock<T>,
    changed: CallbackBuffer<T>,
    disposed: AtomicBool,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: CallbackBuffer::new(),
            disposed: AtomicBool::new(false),
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the current value.
    ///
    /// The value is read-locked while `f` runs; `f` must not set it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Store `value` and notify subscribers if it differs from the current one.
    ///
    /// Returns whether a change happened.
    pub fn set(&self, value: T) -> Result<bool> {
        self.ensure_live()?;
        {
            let mut current = self.value.write();
            if *current == value {
                return Ok(false);
            }
            *current = value.clone();
        }
        self.changed.notify(&value);
        Ok(true)
    }

    /// Compute a new value from the current one and [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<bool> {
        let next = f(&self.value.read());
        self.set(next)
    }

    /// Subscribe to changes and immediately receive the current value.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        let current = self.get();
        Ok(self.changed.subscribe_with_replay(callback, &current))
    }

    /// Subscribe to future changes only.
    pub fn subscribe_deferred<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        Ok(self.changed.subscribe(callback))
    }

    /// Subscribe a shared callback, optionally replaying the current value.
    pub fn subscribe_callback(&self, callback: &Callback<T>, replay: bool) -> Result<Subscription<T>> {
        self.ensure_live()?;
        let subscription = self.changed.subscribe_callback(callback);
        if replay {
            let current = self.get();
            callback(&current);
        }
        Ok(subscription)
    }

    /// Run `callback` on the next change only.
    pub fn subscribe_once<F>(&self, callback: F) -> Result<Subscription<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        Ok(self.changed.subscribe_once(callback))
    }

    /// Remove one registration of `callback`.
    pub fn unsubscribe(&self, callback: &Callback<T>) {
        self.changed.unsubscribe(callback);
    }

    /// Number of permanent subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changed.len()
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(Error::Disposed { target: TARGET });
        }
        Ok(())
    }
}

impl<T: 'static> Disposable for ReactiveProperty<T> {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.changed.dispose();
        tracing::debug!(target_type = TARGET, "disposed");
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl<T> Default for ReactiveProperty<T>
where
    T: Default + Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Debug + 'static> Debug for ReactiveProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveProperty")
            .field("value", &*self.value.read())
            .field("subscribers", &self.changed.len())
            .field("disposed", &self.disposed.load(Ordering::Acquire))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
