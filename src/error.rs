//! Error types for fallible ring growth and insertion.

use core::fmt;

/// Why a ring could not grow.
///
/// A failed grow leaves the ring exactly as it was: same buffer, same
/// capacity, same elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    /// `capacity * factor` does not fit the ring's length type, or the byte size
    /// of the grown buffer does not fit `isize`.
    #[error("capacity {capacity} cannot grow by a factor of {factor}")]
    CapacityOverflow { capacity: usize, factor: usize },

    /// The allocator could not provide a block for `capacity` slots.
    #[error("failed to allocate {bytes} bytes for {capacity} slots")]
    AllocFailed { capacity: usize, bytes: usize },
}

/// An insert that was rejected because the ring was full and could not grow.
///
/// The rejected value is handed back through [`into_inner`](InsertError::into_inner).
#[derive(thiserror::Error)]
#[error("ring is full and could not grow: {source}")]
pub struct InsertError<T> {
    value: T,
    #[source]
    source: ResizeError,
}

impl<T> InsertError<T> {
    #[inline]
    pub(crate) fn new(value: T, source: ResizeError) -> Self {
        Self { value, source }
    }

    /// Returns the value that could not be inserted.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the underlying grow failure.
    #[inline]
    pub fn reason(&self) -> ResizeError {
        self.source
    }
}

// Like `std::sync::mpsc::SendError`, the payload is not printed so `T` needs no `Debug`.
impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
