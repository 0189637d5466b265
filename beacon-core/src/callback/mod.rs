//! Callback Distribution
//!
//! This module implements the broadcaster that every reactive cell and
//! container in the crate is built on.
//!
//! # Overview
//!
//! - [`CallbackBuffer`] holds the subscribers of one event type and delivers
//!   notifications synchronously, on the calling thread.
//! - [`Subscription`] is the token returned by a subscribe call. Releasing it
//!   removes exactly one registration; releasing it again does nothing.
//! - [`CombinedSubscription`] releases two tokens as one unit.
//! - [`Disposable`] and [`CompositeDisposable`] give every resource the same
//!   idempotent teardown and let owners release many resources at once.
//!
//! # Locking
//!
//! Each buffer owns one `parking_lot::Mutex` guarding its subscriber lists,
//! version counter and snapshot cache. The lock is never held while a
//! callback runs, so callbacks are free to re-enter the buffer.

mod buffer;
mod disposable;
mod subscription;

pub use buffer::{Callback, CallbackBuffer, RegistrationId};
pub use disposable::{CompositeDisposable, Disposable};
pub use subscription::{CombinedSubscription, Subscription};

impl<T: ?Sized + 'static> Disposable for CallbackBuffer<T> {
    fn dispose(&self) {
        CallbackBuffer::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        CallbackBuffer::is_disposed(self)
    }
}
