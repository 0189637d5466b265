//! Reactive Cells and Containers
//!
//! This module turns domain mutations into change notifications. Every type
//! here wraps one piece of state plus the [`CallbackBuffer`]s it drives:
//!
//! - [`ReactiveProperty`]: one value, notified when it changes by `PartialEq`
//! - [`ReactiveList`]: index-addressable sequence
//! - [`ReactiveDictionary`]: unique-key mapping in insertion order
//! - [`ReactiveQueue`] and [`ReactiveStack`]: FIFO and LIFO containers
//!
//! # Delivery
//!
//! A mutating call updates the backing storage, releases its lock, and then
//! notifies the relevant buffers in a fixed, documented order before it
//! returns. Subscribers observe the post-mutation state and may mutate the
//! same object again. The one exception is
//! [`ReactiveList::remove_range`], whose removed events are raised while the
//! range is still in place.
//!
//! # Sharing
//!
//! All methods take `&self`. Share an object between owners, or with its own
//! subscribers, through `Arc`; capture a `Weak` inside callbacks to avoid a
//! reference cycle.
//!
//! # Disposal
//!
//! Disposing a cell or container drops its subscribers and makes every
//! further mutation or subscription fail with
//! [`Error::Disposed`](crate::Error::Disposed). Disposing twice is a no-op.
//!
//! [`CallbackBuffer`]: crate::callback::CallbackBuffer

mod collection;
mod dictionary;
mod list;
mod property;
mod queue;
mod stack;

pub use collection::{CollectionKind, IndexedItem, MembershipSubscription, ReactiveCollection};
pub use dictionary::ReactiveDictionary;
pub use list::ReactiveList;
pub use property::ReactiveProperty;
pub use queue::ReactiveQueue;
pub use stack::ReactiveStack;
