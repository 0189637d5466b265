//! Error types for the notification core.
//!
//! Every failure is surfaced synchronously to the caller of the offending
//! operation. A failing call never partially applies its mutation and never
//! raises a notification.

use thiserror::Error;

/// Errors produced by reactive cells and containers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The target was disposed; mutation and subscription are no longer allowed.
    #[error("{target} has been disposed")]
    Disposed {
        /// Name of the disposed type.
        target: &'static str,
    },

    /// An index lies outside the bounds accepted by the operation.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Length of the container at the time of the call.
        len: usize,
    },

    /// A range lies outside the current bounds or is inverted.
    #[error("range {start}..{end} is out of bounds for length {len}")]
    RangeOutOfBounds {
        /// Start of the rejected range.
        start: usize,
        /// End (exclusive) of the rejected range.
        end: usize,
        /// Length of the container at the time of the call.
        len: usize,
    },

    /// The operation is structurally inapplicable to the target.
    #[error("{operation} is not supported by {target}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Name of the type that rejected it.
        target: &'static str,
    },

    /// Pop, dequeue or peek on an empty container.
    #[error("{target} is empty")]
    Empty {
        /// Name of the empty type.
        target: &'static str,
    },

    /// `add` was called with a key that is already present.
    #[error("an item with the same key has already been added")]
    DuplicateKey,
}

impl Error {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Disposed { .. } => "disposed",
            Error::IndexOutOfRange { .. } => "index_out_of_range",
            Error::RangeOutOfBounds { .. } => "range_out_of_bounds",
            Error::Unsupported { .. } => "unsupported_operation",
            Error::Empty { .. } => "empty",
            Error::DuplicateKey => "duplicate_key",
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_target() {
        let err = Error::Disposed { target: "ReactiveList" };
        assert_eq!(err.to_string(), "ReactiveList has been disposed");

        let err = Error::Unsupported {
            operation: "remove",
            target: "ReactiveStack",
        };
        assert_eq!(err.to_string(), "remove is not supported by ReactiveStack");
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Error::DuplicateKey.as_label(), "duplicate_key");
        assert_eq!(
            Error::IndexOutOfRange { index: 3, len: 1 }.as_label(),
            "index_out_of_range"
        );
        assert_eq!(Error::Empty { target: "ReactiveQueue" }.as_label(), "empty");
    }
}
