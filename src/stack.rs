//! LIFO stack that lives inline and spills to the heap when full.
//!
//! [`SmallStack`] keeps its elements contiguous in `[0, len)`: there is no read
//! cursor, so the ring never wraps and a grow is either one contiguous copy out
//! of the inline buffer or an in-place reallocation of the heap block.

use core::fmt;
use core::slice;

use crate::alloc::{Global, RawAlloc};
use crate::config::{RingConfig, Standard};
use crate::error::{InsertError, ResizeError};
use crate::len_type::LenType;
use crate::ring::RawRing;

/// A stack holding up to `N` elements inline, then growing on the heap by
/// `C::GROWTH_FACTOR`.
///
/// # Generic parameters
/// | Parameter | Meaning |
/// |-----------|--------|
/// | `T` | Element type |
/// | `N` | Inline capacity; power of two in `2..256` |
/// | `C` | [`RingConfig`]: length type, growth factor, validation |
/// | `A` | [`RawAlloc`] used once the stack leaves inline storage |
///
/// ```rust
/// use small_rings::SmallStack;
///
/// let mut s: SmallStack<i32, 4> = SmallStack::new();
/// for i in 0..5 {
///     s.push(i).unwrap();
/// }
/// assert!(!s.is_inline());
/// assert_eq!(s.peek(), Some(&4));
/// assert_eq!(s.pop(), Some(4));
/// ```
pub struct SmallStack<T, const N: usize, C: RingConfig<T> = Standard, A: RawAlloc = Global> {
    len: C::Len,
    raw: RawRing<T, N, C, A>,
}

impl<T, const N: usize, C: RingConfig<T>> SmallStack<T, N, C, Global> {
    /// Creates an empty stack on inline storage.
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> SmallStack<T, N, C, A> {
    /// Creates an empty stack that will use `alloc` once it outgrows `N`.
    pub fn new_in(alloc: A) -> Self {
        Self { len: C::Len::ZERO, raw: RawRing::new_in(alloc) }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.as_usize()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len.is_zero()
    }

    /// Returns `true` when the next push has to grow the buffer.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == self.raw.capacity()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns `true` while the stack still uses its inline buffer.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.raw.is_inline()
    }

    /// Pointer to the first slot of the active buffer.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr()
    }

    /// The live elements, bottom first.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.raw.as_ptr(), self.len()) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        unsafe { slice::from_raw_parts_mut(self.raw.as_mut_ptr(), len) }
    }

    /// Pushes `item` on top, growing the buffer first if the stack is full.
    ///
    /// On failure the stack is unchanged and `item` is returned inside the error.
    #[inline(always)]
    pub fn push(&mut self, item: T) -> Result<(), InsertError<T>> {
        debug_assert!(C::validate(&item), "value rejected by RingConfig::validate");
        if self.is_full() {
            return self.grow_and_push(item);
        }
        unsafe { self.raw.write(self.len(), item) };
        self.len = self.len.inc();
        Ok(())
    }

    #[inline(never)]
    fn grow_and_push(&mut self, item: T) -> Result<(), InsertError<T>> {
        if let Err(e) = self.grow() {
            return Err(InsertError::new(item, e));
        }
        unsafe { self.raw.write(self.len(), item) };
        self.len = self.len.inc();
        Ok(())
    }

    /// Removes and returns the top element, or `None` if empty.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.len = self.len.dec();
        Some(unsafe { self.raw.read(self.len()) })
    }

    /// Returns the top element, or `None` if empty.
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline(always)]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Multiplies capacity by the growth factor. Never wraps, so the elements
    /// stay at `[0, len)`.
    pub fn grow(&mut self) -> Result<(), ResizeError> {
        self.raw.grow(0, self.len()).map(|_| ())
    }

    /// Drops every element. The current buffer, inline or heap, is kept.
    pub fn clear(&mut self) {
        let len = self.len();
        self.len = C::Len::ZERO;
        unsafe { self.raw.drop_window(0, len) };
    }

    /// Drops every element, releases the heap buffer and returns to inline
    /// storage with capacity `N`.
    pub fn reset(&mut self) {
        self.clear();
        self.raw.reset();
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> Drop for SmallStack<T, N, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc + Default> Default for SmallStack<T, N, C, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, const N: usize, C: RingConfig<T>, A: RawAlloc> fmt::Debug
    for SmallStack<T, N, C, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, const N: usize, C: RingConfig<T>, A: RawAlloc> PartialEq
    for SmallStack<T, N, C, A>
{
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize, C: RingConfig<T>, A: RawAlloc> Eq for SmallStack<T, N, C, A> {}
