use thiserror::Error;

/// Errors reported by `TreapSet` and its iterators.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// An operation that has no fallback value was invoked on an empty set.
    #[error("{operation} element was queried while the set was empty")]
    NoSuchElement { operation: &'static str },
    /// The operation is not supported by this collection.
    #[error("{operation} is not supported")]
    UnsupportedOperation { operation: &'static str },
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
