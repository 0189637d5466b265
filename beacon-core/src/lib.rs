//! Beacon Core
//!
//! This crate provides the change-notification core of the Beacon framework.
//! It implements:
//!
//! - A buffered multi-subscriber broadcaster with a versioned snapshot cache
//! - Idempotent subscription tokens and aggregating disposers
//! - Reactive cells and containers that raise canonical change events
//!
//! Everything runs synchronously on the calling thread: a mutating call
//! returns only after every subscriber has been notified.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `callback`: the broadcaster, its tokens and the disposal capability
//! - `reactive`: the property, list, dictionary, queue and stack built on it
//!
//! # Example
//!
//! ```rust
//! use beacon_core::reactive::{ReactiveList, ReactiveProperty};
//! use beacon_core::callback::{CompositeDisposable, Disposable};
//!
//! let title = ReactiveProperty::new(String::from("untitled"));
//! let items = ReactiveList::<u32>::new();
//! let subscriptions = CompositeDisposable::new();
//!
//! subscriptions.add(title.subscribe(|t| println!("title: {t}")).unwrap());
//! subscriptions.add(items.subscribe_added(|i| println!("added {i}")).unwrap());
//!
//! title.set(String::from("groceries")).unwrap();
//! items.add(3).unwrap();
//!
//! subscriptions.dispose();
//! ```

pub mod callback;
pub mod error;
pub mod reactive;

pub use error::{Error, Result};
