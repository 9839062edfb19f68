//! FIFO queue on an inline ring buffer that spills to the heap when full.

use core::fmt;

use crate::alloc::{Global, RawAlloc};
use crate::config::{RingConfig, Standard};
use crate::error::{InsertError, ResizeError};
use crate::len_type::LenType;
use crate::ring::RawRing;

/// A FIFO queue holding up to `N` elements inline.
///
/// # Ring representation
/// Elements occupy slots `(head + i) & (capacity - 1)` for `i < len`. Enqueue
/// writes after the last live slot, dequeue advances `head`. When the queue is
/// full the ring grows by `C::GROWTH_FACTOR` first; a wrapped window is
/// linearized into the new buffer so that `head` restarts at 0.
///
/// ```rust
/// use small_rings::SmallQueue;
///
/// let mut q: SmallQueue<f64, 4> = SmallQueue::new();
/// for v in [1.0, 2.5, 3.14, 4.0] {
///     q.enqueue(v).unwrap();
/// }
/// assert!(q.is_full());
/// q.enqueue(5.25).unwrap();
/// assert_eq!(q.capacity(), 8);
/// ```
pub struct SmallQueue<T, const N: usize, C: RingConfig<T> = Standard, A: RawAlloc = Global> {
    len: C::Len,
    head: C::Len,
    raw: RawRing<T, N, C, A>,
}

impl<T, const N: usize, C: RingConfig<T>> SmallQueue<T, N, C, Global> {
    /// Creates an empty queue on inline storage.
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> SmallQueue<T, N, C, A> {
    /// Creates an empty queue that will use `alloc` once it outgrows `N`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            len: C::Len::ZERO,
            head: C::Len::ZERO,
            raw: RawRing::new_in(alloc),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len.as_usize()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len.is_zero()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == self.raw.capacity()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.raw.is_inline()
    }

    /// Pointer to slot 0 of the active buffer (not necessarily the head).
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.raw.as_ptr()
    }

    #[inline(always)]
    fn head(&self) -> usize {
        self.head.as_usize()
    }

    /// Returns the element `index` positions behind the head, or `None`.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            let idx = self.raw.wrap_add(self.head(), index);
            Some(unsafe { self.raw.slot(idx) })
        } else {
            None
        }
    }

    /// Appends `item` at the tail, growing the ring first if the queue is full.
    ///
    /// On failure the queue is unchanged and `item` is returned inside the error.
    #[inline(always)]
    pub fn enqueue(&mut self, item: T) -> Result<(), InsertError<T>> {
        debug_assert!(C::validate(&item), "value rejected by RingConfig::validate");
        if self.is_full() {
            return self.grow_and_enqueue(item);
        }
        unsafe { self.write_tail(item) };
        Ok(())
    }

    #[inline(never)]
    fn grow_and_enqueue(&mut self, item: T) -> Result<(), InsertError<T>> {
        match self.grow() {
            Ok(()) => {
                unsafe { self.write_tail(item) };
                Ok(())
            }
            Err(e) => Err(InsertError::new(item, e)),
        }
    }

    /// # Safety
    /// The queue must not be full.
    #[inline(always)]
    unsafe fn write_tail(&mut self, item: T) {
        let tail = self.raw.wrap_add(self.head(), self.len());
        unsafe { self.raw.write(tail, item) };
        self.len = self.len.inc();
    }

    /// Removes and returns the head element, or `None` if empty.
    #[inline(always)]
    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let head = self.head();
        let value = unsafe { self.raw.read(head) };
        self.head = C::Len::from_usize(self.raw.wrap_add(head, 1));
        self.len = self.len.dec();
        Some(value)
    }

    /// Returns the head element, or `None` if empty.
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline(always)]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            None
        } else {
            let head = self.head();
            Some(unsafe { self.raw.slot_mut(head) })
        }
    }

    /// Reverses the queue so that the current tail becomes the head.
    pub fn reverse(&mut self) {
        unsafe { self.raw.reverse_window(self.head(), self.len()) };
    }

    /// The elements in FIFO order as up to two slices.
    #[inline(always)]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        unsafe { self.raw.window(self.head(), self.len()) }
    }

    /// Multiplies capacity by the growth factor.
    pub fn grow(&mut self) -> Result<(), ResizeError> {
        let head = self.raw.grow(self.head(), self.len())?;
        self.head = C::Len::from_usize(head);
        Ok(())
    }

    /// Drops every element and rewinds the head. The buffer is kept.
    pub fn clear(&mut self) {
        let (head, len) = (self.head(), self.len());
        self.len = C::Len::ZERO;
        self.head = C::Len::ZERO;
        unsafe { self.raw.drop_window(head, len) };
    }

    /// Drops every element, releases the heap buffer and returns to inline
    /// storage with capacity `N`.
    pub fn reset(&mut self) {
        self.clear();
        self.raw.reset();
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> Drop for SmallQueue<T, N, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc + Default> Default for SmallQueue<T, N, C, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, const N: usize, C: RingConfig<T>, A: RawAlloc> fmt::Debug
    for SmallQueue<T, N, C, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s1, s2) = self.as_slices();
        f.debug_list().entries(s1.iter().chain(s2.iter())).finish()
    }
}

impl<T: PartialEq, const N: usize, C: RingConfig<T>, A: RawAlloc> PartialEq
    for SmallQueue<T, N, C, A>
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

impl<T: Eq, const N: usize, C: RingConfig<T>, A: RawAlloc> Eq for SmallQueue<T, N, C, A> {}
