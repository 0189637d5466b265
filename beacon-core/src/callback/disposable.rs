//! Disposal.
//!
//! [`Disposable`] is the one teardown capability shared by every resource in
//! the crate. [`CompositeDisposable`] aggregates resources and tears them all
//! down together, in registration order, exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// A resource with an idempotent teardown.
pub trait Disposable {
    /// Tear the resource down. Calling it again has no further effect.
    fn dispose(&self);

    /// Whether [`dispose`](Self::dispose) has been called.
    fn is_disposed(&self) -> bool;
}

impl<D: Disposable + ?Sized> Disposable for Arc<D> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

impl<D: Disposable + ?Sized> Disposable for Box<D> {
    fn dispose(&self) {
        (**self).dispose();
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

type Member = Box<dyn Disposable + Send + Sync>;

/// Aggregating disposer.
///
/// Members are disposed in the order they were added when the aggregate is
/// disposed. A member added after that is disposed immediately.
///
/// # Example
///
/// ```rust
/// use beacon_core::callback::{CallbackBuffer, CompositeDisposable, Disposable};
///
/// let buffer = CallbackBuffer::<u32>::new();
/// let bag = CompositeDisposable::new();
/// bag.add(buffer.subscribe(|_| {}));
/// bag.add(buffer.subscribe(|_| {}));
///
/// bag.dispose();
/// assert!(buffer.is_empty());
/// ```
#[derive(Default)]
pub struct CompositeDisposable {
    members: Mutex<Vec<Member>>,
    disposed: AtomicBool,
}

impl CompositeDisposable {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member.
    pub fn add<D>(&self, member: D)
    where
        D: Disposable + Send + Sync + 'static,
    {
        let mut members = self.members.lock();
        if self.disposed.load(Ordering::Acquire) {
            drop(members);
            member.dispose();
            return;
        }
        members.push(Box::new(member));
    }

    /// Number of members still awaiting disposal.
    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    /// Whether no member is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Disposable for CompositeDisposable {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let members = std::mem::take(&mut *self.members.lock());
        tracing::debug!(count = members.len(), "disposing composite");
        for member in &members {
            member.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for CompositeDisposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeDisposable")
            .field("members", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
