//! Subscription tokens.
//!
//! A [`Subscription`] is returned by every subscribe call on a
//! [`CallbackBuffer`](super::CallbackBuffer). It only holds a weak reference to
//! the buffer and the id of one registration, so it never keeps the buffer
//! alive. Dropping a token does not unsubscribe; release it explicitly or hand
//! it to a [`CompositeDisposable`](super::CompositeDisposable).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::buffer::{RegistrationId, State};
use super::disposable::Disposable;

/// Handle that removes exactly one registration from the buffer that produced it.
#[must_use = "dropping a subscription leaves the callback registered"]
pub struct Subscription<T: ?Sized> {
    buffer: Weak<Mutex<State<T>>>,
    id: Option<RegistrationId>,
    /// Shared by every clone of this token.
    released: Arc<AtomicBool>,
}

impl<T: ?Sized> Subscription<T> {
    pub(crate) fn new(buffer: Weak<Mutex<State<T>>>, id: RegistrationId) -> Self {
        Self {
            buffer,
            id: Some(id),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A token that is already released, handed out by disposed buffers.
    pub(crate) fn inert() -> Self {
        Self {
            buffer: Weak::new(),
            id: None,
            released: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The registration this token removes, if any.
    pub fn id(&self) -> Option<RegistrationId> {
        self.id
    }

    /// Remove the registration from its buffer.
    ///
    /// Only the first call has an effect. Releasing after the buffer is gone,
    /// or after the callback was already removed some other way, is a no-op.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let (Some(state), Some(id)) = (self.buffer.upgrade(), self.id) {
            state.lock().remove_registration(id);
        }
    }

    /// Whether [`release`](Self::release) has been called on this token or
    /// any of its clones.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl<T: ?Sized> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: Weak::clone(&self.buffer),
            id: self.id,
            released: Arc::clone(&self.released),
        }
    }
}

impl<T: ?Sized> Disposable for Subscription<T> {
    fn dispose(&self) {
        self.release();
    }

    fn is_disposed(&self) -> bool {
        self.is_released()
    }
}

impl<T: ?Sized> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Two tokens released as one unit.
///
/// Used where one logical subscription spans two buffers, e.g. an "added"
/// and a "removed" callback observing the same collection.
#[must_use = "dropping a subscription leaves the callbacks registered"]
#[derive(Debug, Clone)]
pub struct CombinedSubscription<A, B> {
    first: A,
    second: B,
}

impl<A: Disposable, B: Disposable> CombinedSubscription<A, B> {
    /// Bundle two tokens.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Release both constituents. Each release is idempotent on its own.
    pub fn release(&self) {
        self.first.dispose();
        self.second.dispose();
    }

    /// Whether both constituents are released.
    pub fn is_released(&self) -> bool {
        self.first.is_disposed() && self.second.is_disposed()
    }

    /// Split back into the two tokens.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Disposable, B: Disposable> Disposable for CombinedSubscription<A, B> {
    fn dispose(&self) {
        self.release();
    }

    fn is_disposed(&self) -> bool {
        self.is_released()
    }
}
