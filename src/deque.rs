//! Double-ended queue on an inline ring buffer that spills to the heap when full.
//!
//! # Why not `VecDeque` for the heap side?
//! Spilling into a `VecDeque` hands capacity control to std: it grows by its own
//! policy and never releases through a caller-chosen allocator. [`SmallDeque`]
//! keeps one ring for both states instead. The inline array and the heap block
//! are two variants of the same storage, capacity stays a power of two scaled
//! by [`RingConfig::GROWTH_FACTOR`], and a heap ring whose window is contiguous
//! grows with a single `reallocate`.

use core::cmp::Ordering;
use core::fmt;
use std::collections::VecDeque;

use crate::alloc::{Global, RawAlloc};
use crate::config::{RingConfig, Standard};
use crate::error::{InsertError, ResizeError};
use crate::len_type::LenType;
use crate::ring::RawRing;

// ─── AnyDeque ─────────────────────────────────────────────────────────────────

/// An object-safe abstraction over double-ended queue types.
///
/// Implemented by both `VecDeque<T>` (heap) and `SmallDeque<T, N, C, A>` so that
/// code can operate on a deque without knowing which backend is active. Pushes
/// on `VecDeque` never fail.
pub trait AnyDeque<T> {
    /// Returns the number of elements in the deque.
    fn len(&self) -> usize;
    /// Returns `true` if the deque contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Appends an element to the back.
    fn push_back(&mut self, item: T) -> Result<(), InsertError<T>>;
    /// Prepends an element to the front.
    fn push_front(&mut self, item: T) -> Result<(), InsertError<T>>;
    /// Removes and returns the element from the back, or `None` if empty.
    fn pop_back(&mut self) -> Option<T>;
    /// Removes and returns the element from the front, or `None` if empty.
    fn pop_front(&mut self) -> Option<T>;
    /// Removes all elements.
    fn clear(&mut self);
    /// Returns a shared reference to the front element, or `None` if empty.
    fn front(&self) -> Option<&T>;
    /// Returns a shared reference to the back element, or `None` if empty.
    fn back(&self) -> Option<&T>;
    /// Returns an exclusive reference to the front element, or `None` if empty.
    fn front_mut(&mut self) -> Option<&mut T>;
    /// Returns an exclusive reference to the back element, or `None` if empty.
    fn back_mut(&mut self) -> Option<&mut T>;
}

impl<T> AnyDeque<T> for VecDeque<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) -> Result<(), InsertError<T>> {
        self.push_back(item);
        Ok(())
    }
    fn push_front(&mut self, item: T) -> Result<(), InsertError<T>> {
        self.push_front(item);
        Ok(())
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

/// A double-ended queue that lives inline for up to `N` items, then grows on
/// the heap.
///
/// # Ring representation
/// Items occupy slots `(head + i) & (capacity - 1)` for `i < len`.
/// `push_front` steps `head` back one slot (`wrap_sub`), `pop_front` steps it
/// forward; the back end only changes `len`.
///
/// # Generic parameters
/// | Parameter | Meaning |
/// |-----------|--------|
/// | `T` | Element type |
/// | `N` | Inline capacity; **must be a power of two** in `2..256` |
/// | `C` | [`RingConfig`]: length type, growth factor, validation |
/// | `A` | [`RawAlloc`] used once the deque leaves inline storage |
///
/// # Compile-time assertions
/// `new()` checks the bounds on `N` and on the growth factor, and that the
/// inline array is at most 16 KiB.
pub struct SmallDeque<T, const N: usize, C: RingConfig<T> = Standard, A: RawAlloc = Global> {
    len: C::Len,
    head: C::Len,
    raw: RawRing<T, N, C, A>,
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> AnyDeque<T> for SmallDeque<T, N, C, A> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) -> Result<(), InsertError<T>> {
        self.push_back(item)
    }
    fn push_front(&mut self, item: T) -> Result<(), InsertError<T>> {
        self.push_front(item)
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

impl<T, const N: usize, C: RingConfig<T>> SmallDeque<T, N, C, Global> {
    /// Creates a new empty deque backed by inline storage.
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> SmallDeque<T, N, C, A> {
    /// Creates an empty deque that will use `alloc` once it outgrows `N`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            len: C::Len::ZERO,
            head: C::Len::ZERO,
            raw: RawRing::new_in(alloc),
        }
    }

    /// Returns `true` if the deque is currently using inline storage.
    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.raw.is_inline()
    }

    /// Returns the number of elements currently in the deque.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.as_usize()
    }

    /// Returns `true` if the deque contains no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len.is_zero()
    }

    /// Returns `true` when the next push has to grow the ring.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == self.raw.capacity()
    }

    /// Returns the current capacity (`N` until the first grow).
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Pointer to slot 0 of the active buffer.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr()
    }

    #[inline(always)]
    fn head(&self) -> usize {
        self.head.as_usize()
    }

    /// Returns a shared reference to the element at logical `index`, or `None`.
    ///
    /// Logical index 0 is the front.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            let real_idx = self.raw.wrap_add(self.head(), index);
            Some(unsafe { self.raw.slot(real_idx) })
        } else {
            None
        }
    }

    /// Returns an exclusive reference to the element at logical `index`, or `None`.
    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            let real_idx = self.raw.wrap_add(self.head(), index);
            Some(unsafe { self.raw.slot_mut(real_idx) })
        } else {
            None
        }
    }

    /// Appends `item` to the back of the deque, growing the ring if it is full.
    #[inline(always)]
    pub fn push_back(&mut self, item: T) -> Result<(), InsertError<T>> {
        debug_assert!(C::validate(&item), "value rejected by RingConfig::validate");
        if self.is_full() {
            return self.grow_and_push_back(item);
        }
        unsafe { self.write_back(item) };
        Ok(())
    }

    /// Cold path: grows then writes at the back.
    #[inline(never)]
    fn grow_and_push_back(&mut self, item: T) -> Result<(), InsertError<T>> {
        match self.grow() {
            Ok(()) => {
                unsafe { self.write_back(item) };
                Ok(())
            }
            Err(e) => Err(InsertError::new(item, e)),
        }
    }

    /// # Safety
    /// The deque must not be full.
    #[inline(always)]
    unsafe fn write_back(&mut self, item: T) {
        let tail = self.raw.wrap_add(self.head(), self.len());
        unsafe { self.raw.write(tail, item) };
        self.len = self.len.inc();
    }

    /// Prepends `item` to the front of the deque, growing the ring if it is full.
    #[inline(always)]
    pub fn push_front(&mut self, item: T) -> Result<(), InsertError<T>> {
        debug_assert!(C::validate(&item), "value rejected by RingConfig::validate");
        if self.is_full() {
            return self.grow_and_push_front(item);
        }
        unsafe { self.write_front(item) };
        Ok(())
    }

    /// Cold path: grows then writes at the front.
    #[inline(never)]
    fn grow_and_push_front(&mut self, item: T) -> Result<(), InsertError<T>> {
        match self.grow() {
            Ok(()) => {
                unsafe { self.write_front(item) };
                Ok(())
            }
            Err(e) => Err(InsertError::new(item, e)),
        }
    }

    /// # Safety
    /// The deque must not be full.
    #[inline(always)]
    unsafe fn write_front(&mut self, item: T) {
        let head = self.raw.wrap_sub(self.head(), 1);
        unsafe { self.raw.write(head, item) };
        self.head = C::Len::from_usize(head);
        self.len = self.len.inc();
    }

    /// Removes and returns the last element, or `None` if empty.
    #[inline(always)]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.len = self.len.dec();
        let tail = self.raw.wrap_add(self.head(), self.len());
        Some(unsafe { self.raw.read(tail) })
    }

    /// Removes and returns the first element, or `None` if empty.
    #[inline(always)]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let head = self.head();
        let value = unsafe { self.raw.read(head) };
        self.head = C::Len::from_usize(self.raw.wrap_add(head, 1));
        self.len = self.len.dec();
        Some(value)
    }

    /// Returns a shared reference to the front element, or `None` if empty.
    #[inline(always)]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a shared reference to the back element, or `None` if empty.
    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Returns an exclusive reference to the front element, or `None` if empty.
    #[inline(always)]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Returns an exclusive reference to the back element, or `None` if empty.
    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len().checked_sub(1) {
            Some(i) => self.get_mut(i),
            None => None,
        }
    }

    /// Reverses the deque in place; the back becomes the front.
    pub fn reverse(&mut self) {
        unsafe { self.raw.reverse_window(self.head(), self.len()) };
    }

    /// Multiplies capacity by the growth factor, linearizing a wrapped window.
    pub fn grow(&mut self) -> Result<(), ResizeError> {
        let head = self.raw.grow(self.head(), self.len())?;
        self.head = C::Len::from_usize(head);
        Ok(())
    }

    /// Drops every element and rewinds the head. The buffer is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
        self.head = C::Len::ZERO;
    }

    /// Shortens the deque to at most `len` elements, dropping those at the back.
    ///
    /// If `len >= self.len()`, this is a no-op.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len();
        if len < old_len {
            let start = self.raw.wrap_add(self.head(), len);
            self.len = C::Len::from_usize(len);
            unsafe { self.raw.drop_window(start, old_len - len) };
        }
    }

    /// Drops every element, releases the heap buffer and returns to inline
    /// storage with capacity `N`.
    pub fn reset(&mut self) {
        self.clear();
        self.raw.reset();
    }

    /// Returns up to two contiguous slices covering the logical range `[0, len)`.
    ///
    /// Returns `(head_slice, &[])` when the ring hasn't wrapped, or
    /// `(head_slice, tail_slice)` when it has.
    #[inline(always)]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        unsafe { self.raw.window(self.head(), self.len()) }
    }

    /// Mutable counterpart of [`as_slices`](SmallDeque::as_slices).
    #[inline(always)]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (head, len) = (self.head(), self.len());
        unsafe { self.raw.window_mut(head, len) }
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> Drop for SmallDeque<T, N, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, const N: usize, C: RingConfig<T>, A: RawAlloc> fmt::Debug
    for SmallDeque<T, N, C, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s1, s2) = self.as_slices();
        f.debug_list().entries(s1.iter().chain(s2.iter())).finish()
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc + Default> Default for SmallDeque<T, N, C, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: PartialEq, const N: usize, C: RingConfig<T>, A: RawAlloc> PartialEq
    for SmallDeque<T, N, C, A>
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let (s1_a, s2_a) = self.as_slices();
        let (s1_b, s2_b) = other.as_slices();
        s1_a.iter()
            .chain(s2_a.iter())
            .zip(s1_b.iter().chain(s2_b.iter()))
            .all(|(a, b)| a == b)
    }
}
impl<T: Eq, const N: usize, C: RingConfig<T>, A: RawAlloc> Eq for SmallDeque<T, N, C, A> {}

impl<T: PartialOrd, const N: usize, C: RingConfig<T>, A: RawAlloc> PartialOrd
    for SmallDeque<T, N, C, A>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (s1_a, s2_a) = self.as_slices();
        let (s1_b, s2_b) = other.as_slices();
        s1_a.iter()
            .chain(s2_a.iter())
            .partial_cmp(s1_b.iter().chain(s2_b.iter()))
    }
}

impl<T: Ord, const N: usize, C: RingConfig<T>, A: RawAlloc> Ord for SmallDeque<T, N, C, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (s1_a, s2_a) = self.as_slices();
        let (s1_b, s2_b) = other.as_slices();
        s1_a.iter()
            .chain(s2_a.iter())
            .cmp(s1_b.iter().chain(s2_b.iter()))
    }
}
