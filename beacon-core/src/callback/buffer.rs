//! Callback Buffer
//!
//! A `CallbackBuffer<T>` broadcasts one event type to any number of
//! subscribers. It keeps two lists:
//!
//! - permanent callbacks, invoked on every notify until unsubscribed
//! - one-shot callbacks, invoked on the next notify and then dropped
//!
//! # Delivery
//!
//! `notify` captures both lists under the buffer lock, releases the lock and
//! only then invokes the callbacks. Callbacks may therefore subscribe,
//! unsubscribe, dispose or notify the same buffer again without deadlocking,
//! and the set of callbacks reached by one notify is exactly the set that was
//! registered when it started.
//!
//! # Snapshot Cache
//!
//! The permanent list is flattened into a shared snapshot stamped with the
//! mutation version it reflects. As long as no permanent callback is added or
//! removed, every notify reuses that snapshot and performs no allocation.
//! When the version moves, the snapshot is rebuilt in place if nobody else
//! holds it and its capacity is within a 2x band of the needed length.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::subscription::Subscription;

/// A shared callback receiving a reference to the event payload.
///
/// Identity for [`CallbackBuffer::unsubscribe`] is pointer identity of the `Arc`.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Unique identifier for one registration in a buffer.
///
/// Registering the same callback twice yields two distinct ids, so a token
/// always removes the registration it was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

impl RegistrationId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

struct Registration<T: ?Sized> {
    id: RegistrationId,
    callback: Callback<T>,
}

/// Lock-protected bookkeeping of one buffer.
pub(crate) struct State<T: ?Sized> {
    callbacks: Vec<Registration<T>>,
    once: SmallVec<[Registration<T>; 2]>,
    /// Bumped by every change to the permanent list.
    version: u64,
    snapshot: Arc<Vec<Callback<T>>>,
    snapshot_version: u64,
    disposed: bool,
}

impl<T: ?Sized> State<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            callbacks: Vec::with_capacity(capacity),
            once: SmallVec::new(),
            version: 0,
            snapshot: Arc::new(Vec::with_capacity(capacity)),
            snapshot_version: 0,
            disposed: false,
        }
    }

    /// Remove the registration with the given id from either list.
    ///
    /// Returns false if it was already gone.
    pub(crate) fn remove_registration(&mut self, id: RegistrationId) -> bool {
        if let Some(pos) = self.callbacks.iter().position(|r| r.id == id) {
            self.callbacks.remove(pos);
            self.version += 1;
            return true;
        }
        if let Some(pos) = self.once.iter().position(|r| r.id == id) {
            self.once.remove(pos);
            return true;
        }
        false
    }

    /// Return the snapshot for the current version, rebuilding it if stale.
    fn snapshot(&mut self) -> Arc<Vec<Callback<T>>> {
        if self.snapshot_version != self.version {
            let needed = self.callbacks.len();
            let reused = Arc::get_mut(&mut self.snapshot)
                .is_some_and(|buffer| capacity_fits(buffer.capacity(), needed));

            if reused {
                if let Some(buffer) = Arc::get_mut(&mut self.snapshot) {
                    buffer.clear();
                    buffer.extend(self.callbacks.iter().map(|r| Arc::clone(&r.callback)));
                }
            } else {
                // Headroom keeps one-at-a-time growth inside the band.
                let mut buffer = Vec::with_capacity(needed.next_power_of_two());
                buffer.extend(self.callbacks.iter().map(|r| Arc::clone(&r.callback)));
                self.snapshot = Arc::new(buffer);
            }

            self.snapshot_version = self.version;
            tracing::trace!(version = self.version, len = needed, reused, "callback snapshot rebuilt");
        }
        Arc::clone(&self.snapshot)
    }

    fn clear(&mut self) {
        self.callbacks.clear();
        self.once.clear();
        self.version += 1;
        self.snapshot = Arc::new(Vec::new());
        self.snapshot_version = self.version;
    }
}

fn capacity_fits(capacity: usize, needed: usize) -> bool {
    capacity >= needed && capacity <= needed.max(1) * 2
}

/// A buffered multi-subscriber broadcaster for events of type `T`.
///
/// `T` may be unsized, so a buffer of `[T]` can broadcast a borrowed slice
/// without copying it into an owned payload.
///
/// # Example
///
/// ```rust
/// use beacon_core::callback::CallbackBuffer;
///
/// let buffer = CallbackBuffer::<i32>::new();
/// let token = buffer.subscribe(|value| println!("got {value}"));
/// buffer.notify(&5);
/// token.release();
/// ```
pub struct CallbackBuffer<T: ?Sized> {
    state: Arc<Mutex<State<T>>>,
}

impl<T: ?Sized + 'static> CallbackBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty buffer sized for `capacity` permanent callbacks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::with_capacity(capacity))),
        }
    }

    /// Register a permanent callback.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        self.subscribe_callback(&callback)
    }

    /// Register a shared permanent callback.
    ///
    /// The same callback may be registered several times; it is then invoked
    /// once per registration.
    pub fn subscribe_callback(&self, callback: &Callback<T>) -> Subscription<T> {
        let mut state = self.state.lock();
        if state.disposed {
            tracing::warn!("subscribe on a disposed callback buffer ignored");
            return Subscription::inert();
        }

        let id = RegistrationId::next();
        state.callbacks.push(Registration {
            id,
            callback: Arc::clone(callback),
        });
        state.version += 1;
        Subscription::new(Arc::downgrade(&self.state), id)
    }

    /// Register a permanent callback and immediately invoke it with `replay`.
    ///
    /// The replay goes straight to the new callback; other subscribers are
    /// not notified and the snapshot cache is untouched.
    pub fn subscribe_with_replay<F>(&self, callback: F, replay: &T) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let subscription = self.subscribe_callback(&callback);
        if !subscription.is_released() {
            callback(replay);
        }
        subscription
    }

    /// Register a callback that runs on the next notify only.
    pub fn subscribe_once<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        self.subscribe_once_callback(&callback)
    }

    /// Register a shared callback that runs on the next notify only.
    pub fn subscribe_once_callback(&self, callback: &Callback<T>) -> Subscription<T> {
        let mut state = self.state.lock();
        if state.disposed {
            tracing::warn!("subscribe_once on a disposed callback buffer ignored");
            return Subscription::inert();
        }

        let id = RegistrationId::next();
        state.once.push(Registration {
            id,
            callback: Arc::clone(callback),
        });
        Subscription::new(Arc::downgrade(&self.state), id)
    }

    /// Remove the first permanent registration of `callback` and every pending
    /// one-shot registration of it.
    ///
    /// Unknown callbacks are ignored.
    pub fn unsubscribe(&self, callback: &Callback<T>) {
        let mut state = self.state.lock();
        if let Some(pos) = state
            .callbacks
            .iter()
            .position(|r| Arc::ptr_eq(&r.callback, callback))
        {
            state.callbacks.remove(pos);
            state.version += 1;
        }
        state.once.retain(|r| !Arc::ptr_eq(&r.callback, callback));
    }

    /// Deliver `value` to every permanent callback in subscription order,
    /// then to every pending one-shot callback, which are dropped afterwards.
    ///
    /// A disposed buffer ignores the call. A panicking callback propagates out
    /// of `notify` and later callbacks of this call are not reached.
    pub fn notify(&self, value: &T) {
        let (snapshot, once) = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            let once = std::mem::take(&mut state.once);
            (state.snapshot(), once)
        };

        for callback in snapshot.iter() {
            callback(value);
        }
        // Dropped before the one-shots run so a nested notify from one of
        // them can rebuild the snapshot in place.
        drop(snapshot);

        for registration in once {
            (registration.callback)(value);
        }
    }

    /// Remove every permanent and one-shot callback. The buffer stays usable.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Clear the buffer and stop accepting subscriptions. Idempotent.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.clear();
        drop(state);
        tracing::debug!("callback buffer disposed");
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Number of permanent registrations.
    pub fn len(&self) -> usize {
        self.state.lock().callbacks.len()
    }

    /// Whether no permanent callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pending one-shot registrations.
    pub fn once_len(&self) -> usize {
        self.state.lock().once.len()
    }

    /// Whether a notify would reach at least one callback.
    pub fn has_subscribers(&self) -> bool {
        let state = self.state.lock();
        !state.callbacks.is_empty() || !state.once.is_empty()
    }

    /// Current mutation version of the permanent list.
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }
}

impl<T: 'static> CallbackBuffer<T> {
    /// Notify with a payload built only if someone is listening.
    pub fn notify_with<F>(&self, payload: F)
    where
        F: FnOnce() -> T,
    {
        if self.has_subscribers() {
            self.notify(&payload());
        }
    }
}

impl<T: ?Sized + 'static> Default for CallbackBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CallbackBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CallbackBuffer")
            .field("callbacks", &state.callbacks.len())
            .field("once", &state.once.len())
            .field("version", &state.version)
            .field("disposed", &state.disposed)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
