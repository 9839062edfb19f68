//! Ring storage engine shared by [`SmallStack`](crate::SmallStack),
//! [`SmallQueue`](crate::SmallQueue) and [`SmallDeque`](crate::SmallDeque).
//!
//! [`RawRing`] owns the slots and the capacity but not the live window: each
//! adapter keeps its own `len` (and read cursor, for the queue and deque) and
//! passes them in. The ring therefore never reads, writes or drops an element on
//! its own except when copying a live window during [`grow`](RawRing::grow).
//!
//! # Layout
//! Slots live either in the inline array embedded in the container or in a
//! heap block obtained from the container's [`RawAlloc`]. Capacity is always a
//! power of two, so a logical position maps to a physical slot with
//! `idx & (capacity - 1)`.
//!
//! # Growth
//! `grow` multiplies capacity by [`RingConfig::GROWTH_FACTOR`]:
//!
//! | state | action |
//! |-------|--------|
//! | heap, window contiguous | `reallocate` in place, cursor kept |
//! | inline, window contiguous | `allocate`, one copy to offset 0 |
//! | window wrapped | `allocate`, copy `[head, cap)` then `[0, rest)`, release old heap block |
//!
//! After a copy the window starts at slot 0.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ptr::{self, NonNull};
use core::slice;

use crate::alloc::RawAlloc;
use crate::config::RingConfig;
use crate::error::ResizeError;
use crate::len_type::LenType;

/// The active slot storage. Only [`RawRing::grow`] moves `Inline -> Heap` and
/// only [`RawRing::reset`] moves `Heap -> Inline`.
enum Buffer<T, const N: usize> {
    Inline([MaybeUninit<T>; N]),
    Heap(NonNull<T>),
}

pub(crate) struct RawRing<T, const N: usize, C: RingConfig<T>, A: RawAlloc> {
    buf: Buffer<T, N>,
    capacity: C::Len,
    alloc: A,
    _marker: PhantomData<(T, fn() -> C)>,
}

// SAFETY: the ring uniquely owns its heap block, like `Vec<T, A>`.
unsafe impl<T: Send, const N: usize, C: RingConfig<T>, A: RawAlloc + Send> Send
    for RawRing<T, N, C, A>
{
}

// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, const N: usize, C: RingConfig<T>, A: RawAlloc + Sync> Sync
    for RawRing<T, N, C, A>
{
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> RawRing<T, N, C, A> {
    /// Largest inline array a container may embed.
    const MAX_INLINE_SIZE: usize = 16 * 1024;

    /// Creates an empty ring on inline storage.
    ///
    /// # Panics (compile-time)
    /// `N` must be a power of two in `2..256` that fits `C::Len`, the growth
    /// factor a power of two in `2..32`, and the inline array at most 16 KiB.
    pub(crate) fn new_in(alloc: A) -> Self {
        const {
            assert!(N.is_power_of_two(), "inline capacity N must be a power of two");
            assert!(N > 1, "inline capacity N is too small");
            assert!(N < 256, "inline capacity N is too big");
            assert!(
                N <= <C::Len as LenType>::MAX,
                "inline capacity N does not fit the length type"
            );
            assert!(
                C::GROWTH_FACTOR.is_power_of_two(),
                "GROWTH_FACTOR must be a power of two"
            );
            assert!(C::GROWTH_FACTOR > 1, "GROWTH_FACTOR is too small");
            assert!(C::GROWTH_FACTOR < 32, "GROWTH_FACTOR is too big");
            assert!(
                mem::size_of::<[MaybeUninit<T>; N]>() <= RawRing::<T, N, C, A>::MAX_INLINE_SIZE,
                "inline buffer is too large! Reduce N."
            );
        }
        Self {
            buf: Buffer::Inline([const { MaybeUninit::uninit() }; N]),
            capacity: C::Len::from_usize(N),
            alloc,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity.as_usize()
    }

    #[inline(always)]
    pub(crate) fn is_inline(&self) -> bool {
        matches!(self.buf, Buffer::Inline(_))
    }

    /// Physical slot `add` positions after `idx`.
    #[inline(always)]
    pub(crate) fn wrap_add(&self, idx: usize, add: usize) -> usize {
        (idx + add) & (self.capacity() - 1)
    }

    /// Physical slot `sub` positions before `idx`.
    #[inline(always)]
    pub(crate) fn wrap_sub(&self, idx: usize, sub: usize) -> usize {
        idx.wrapping_sub(sub) & (self.capacity() - 1)
    }

    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *const T {
        match &self.buf {
            Buffer::Inline(slots) => slots.as_ptr().cast(),
            Buffer::Heap(ptr) => ptr.as_ptr(),
        }
    }

    #[inline(always)]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.buf {
            Buffer::Inline(slots) => slots.as_mut_ptr().cast(),
            Buffer::Heap(ptr) => ptr.as_ptr(),
        }
    }

    /// # Safety
    /// `idx < capacity` and the slot holds a live element.
    #[inline(always)]
    pub(crate) unsafe fn slot(&self, idx: usize) -> &T {
        unsafe { &*self.as_ptr().add(idx) }
    }

    /// # Safety
    /// `idx < capacity` and the slot holds a live element.
    #[inline(always)]
    pub(crate) unsafe fn slot_mut(&mut self, idx: usize) -> &mut T {
        unsafe { &mut *self.as_mut_ptr().add(idx) }
    }

    /// Moves the element out of slot `idx`; the slot becomes dead.
    ///
    /// # Safety
    /// `idx < capacity` and the slot holds a live element.
    #[inline(always)]
    pub(crate) unsafe fn read(&self, idx: usize) -> T {
        unsafe { ptr::read(self.as_ptr().add(idx)) }
    }

    /// # Safety
    /// `idx < capacity` and the slot is dead.
    #[inline(always)]
    pub(crate) unsafe fn write(&mut self, idx: usize, value: T) {
        unsafe { ptr::write(self.as_mut_ptr().add(idx), value) }
    }

    /// Returns the live window starting at physical slot `start` as up to two
    /// slices: `(start.., ..rest)`.
    ///
    /// # Safety
    /// `start < capacity`, `len <= capacity` and all `len` slots are live.
    #[inline(always)]
    pub(crate) unsafe fn window(&self, start: usize, len: usize) -> (&[T], &[T]) {
        let ptr = self.as_ptr();
        let capacity = self.capacity();
        unsafe {
            if start + len <= capacity {
                (slice::from_raw_parts(ptr.add(start), len), &[])
            } else {
                let head_len = capacity - start;
                (
                    slice::from_raw_parts(ptr.add(start), head_len),
                    slice::from_raw_parts(ptr, len - head_len),
                )
            }
        }
    }

    /// Mutable counterpart of [`window`](RawRing::window).
    ///
    /// # Safety
    /// Same as `window`.
    #[inline(always)]
    pub(crate) unsafe fn window_mut(&mut self, start: usize, len: usize) -> (&mut [T], &mut [T]) {
        let capacity = self.capacity();
        let ptr = self.as_mut_ptr();
        unsafe {
            if start + len <= capacity {
                (slice::from_raw_parts_mut(ptr.add(start), len), &mut [])
            } else {
                let head_len = capacity - start;
                (
                    slice::from_raw_parts_mut(ptr.add(start), head_len),
                    slice::from_raw_parts_mut(ptr, len - head_len),
                )
            }
        }
    }

    /// Drops the `len` elements of the window starting at physical slot `start`.
    ///
    /// # Safety
    /// Same as `window`; the slots are dead afterwards.
    pub(crate) unsafe fn drop_window(&mut self, start: usize, len: usize) {
        unsafe {
            let (front, back) = self.window_mut(start, len);
            ptr::drop_in_place(front as *mut [T]);
            ptr::drop_in_place(back as *mut [T]);
        }
    }

    /// Reverses the logical order of the window of `len` elements at `head`.
    ///
    /// # Safety
    /// Same as `window`.
    pub(crate) unsafe fn reverse_window(&mut self, head: usize, len: usize) {
        if len < 2 {
            return;
        }
        let ptr = self.as_mut_ptr();
        for i in 0..len / 2 {
            let a = self.wrap_add(head, i);
            let b = self.wrap_add(head, len - 1 - i);
            unsafe { ptr::swap(ptr.add(a), ptr.add(b)) };
        }
    }

    /// Multiplies capacity by the growth factor, keeping the `len` live elements
    /// that start at physical slot `head` in logical order.
    ///
    /// Returns the new position of `head`. On error nothing has changed.
    #[inline(never)]
    pub(crate) fn grow(&mut self, head: usize, len: usize) -> Result<usize, ResizeError> {
        let capacity = self.capacity();
        let factor = C::GROWTH_FACTOR;
        debug_assert!(len <= capacity && (len == 0 || head < capacity));

        let overflow = ResizeError::CapacityOverflow { capacity, factor };
        if capacity > <C::Len as LenType>::MAX / factor {
            return Err(overflow);
        }
        let new_capacity = capacity * factor;
        let new_layout = Layout::array::<T>(new_capacity).map_err(|_| overflow)?;
        let alloc_failed = ResizeError::AllocFailed {
            capacity: new_capacity,
            bytes: new_layout.size(),
        };

        let was_inline = self.is_inline();
        let wrapped = head + len > capacity;

        let (ptr, new_head) = if mem::size_of::<T>() == 0 {
            // Zero-sized slots carry no bytes; only the index space grows.
            (NonNull::dangling(), if wrapped { 0 } else { head })
        } else {
            match self.buf {
                Buffer::Heap(old) if !wrapped => {
                    let old_layout = Self::heap_layout(capacity);
                    // SAFETY: `old` came from `self.alloc` with `old_layout`.
                    let grown = unsafe { self.alloc.reallocate(old.cast(), old_layout, new_layout) }
                        .map_err(|_| alloc_failed)?;
                    (grown.cast::<T>(), head)
                }
                _ => {
                    let fresh = self
                        .alloc
                        .allocate(new_layout)
                        .map_err(|_| alloc_failed)?
                        .cast::<T>();
                    // SAFETY: `fresh` holds `new_capacity > len` slots and does not overlap.
                    unsafe { self.copy_window(fresh.as_ptr(), head, len) };
                    if let Buffer::Heap(old) = self.buf {
                        // SAFETY: the live elements were moved out above.
                        unsafe { self.alloc.release(old.cast(), Self::heap_layout(capacity)) };
                    }
                    (fresh, 0)
                }
            }
        };

        self.buf = Buffer::Heap(ptr);
        self.capacity = C::Len::from_usize(new_capacity);
        if was_inline {
            log::trace!("ring promoted to heap: {capacity} -> {new_capacity} slots ({len} live)");
        } else {
            log::trace!("ring grew on heap: {capacity} -> {new_capacity} slots ({len} live)");
        }
        Ok(new_head)
    }

    /// Releases the heap block, if any, and returns to inline storage with
    /// capacity `N`. Live elements must already have been dropped or moved out.
    pub(crate) fn reset(&mut self) {
        if let Buffer::Heap(ptr) = self.buf {
            let capacity = self.capacity();
            // SAFETY: the block is ours and is replaced right after.
            unsafe { self.release_heap(ptr, capacity) };
            self.buf = Buffer::Inline([const { MaybeUninit::uninit() }; N]);
            self.capacity = C::Len::from_usize(N);
            log::trace!("ring reset to inline storage: {capacity} -> {N} slots");
        }
    }

    /// Copies the window of `len` elements at `head` to `dst[0..len]`.
    ///
    /// # Safety
    /// `dst` must be valid for `len` writes and not overlap the current buffer.
    unsafe fn copy_window(&self, dst: *mut T, head: usize, len: usize) {
        let src = self.as_ptr();
        let capacity = self.capacity();
        unsafe {
            if head + len <= capacity {
                ptr::copy_nonoverlapping(src.add(head), dst, len);
            } else {
                let first_chunk = capacity - head;
                ptr::copy_nonoverlapping(src.add(head), dst, first_chunk);
                ptr::copy_nonoverlapping(src, dst.add(first_chunk), len - first_chunk);
            }
        }
    }

    /// # Safety
    /// `ptr` must be the current heap block of `capacity` slots.
    unsafe fn release_heap(&self, ptr: NonNull<T>, capacity: usize) {
        if mem::size_of::<T>() != 0 {
            unsafe { self.alloc.release(ptr.cast(), Self::heap_layout(capacity)) };
        }
    }

    /// Layout of a heap block that was already allocated for `capacity` slots.
    #[inline(always)]
    fn heap_layout(capacity: usize) -> Layout {
        // SAFETY: `Layout::array::<T>(capacity)` succeeded when this block was allocated.
        unsafe { Layout::from_size_align_unchecked(mem::size_of::<T>() * capacity, mem::align_of::<T>()) }
    }
}

impl<T, const N: usize, C: RingConfig<T>, A: RawAlloc> Drop for RawRing<T, N, C, A> {
    fn drop(&mut self) {
        if let Buffer::Heap(ptr) = self.buf {
            // SAFETY: the owning adapter has already dropped the live window.
            unsafe { self.release_heap(ptr, self.capacity()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;
    use crate::testing::{CountingAlloc, FailingAlloc};
    use crate::config::Standard;

    struct Narrow;
    impl<T> RingConfig<T> for Narrow {
        type Len = u8;
        const GROWTH_FACTOR: usize = 4;
    }

    fn fill<C: RingConfig<u32>, A: RawAlloc, const N: usize>(
        ring: &mut RawRing<u32, N, C, A>,
        head: usize,
        values: &[u32],
    ) {
        for (i, v) in values.iter().enumerate() {
            let idx = ring.wrap_add(head, i);
            unsafe { ring.write(idx, *v) };
        }
    }

    fn collect<C: RingConfig<u32>, A: RawAlloc, const N: usize>(
        ring: &RawRing<u32, N, C, A>,
        head: usize,
        len: usize,
    ) -> Vec<u32> {
        let (a, b) = unsafe { ring.window(head, len) };
        a.iter().chain(b).copied().collect()
    }

    // ─── masked arithmetic ────────────────────────────────────────────────────
    #[test]
    fn test_ring_wrap_arithmetic() {
        let ring: RawRing<u32, 4, Standard, Global> = RawRing::new_in(Global);
        assert_eq!(ring.wrap_add(3, 1), 0);
        assert_eq!(ring.wrap_add(2, 5), 3);
        assert_eq!(ring.wrap_sub(0, 1), 3);
        assert_eq!(ring.wrap_sub(2, 2), 0);
    }

    // ─── grow ─────────────────────────────────────────────────────────────────
    #[test]
    fn test_ring_grow_law_not_wrapped() {
        let mut ring: RawRing<u32, 4, Standard, Global> = RawRing::new_in(Global);
        let mut expected = 4;
        for _ in 0..3 {
            assert_eq!(ring.grow(0, 0), Ok(0));
            expected *= 2;
            assert_eq!(ring.capacity(), expected);
            assert!(!ring.is_inline());
        }
        ring.reset();
        assert_eq!(ring.capacity(), 4);
        assert!(ring.is_inline());
    }

    #[test]
    fn test_ring_grow_law_wrapped() {
        let mut ring: RawRing<u32, 4, Standard, Global> = RawRing::new_in(Global);
        fill(&mut ring, 2, &[10, 20, 30, 40]);
        assert_eq!(collect(&ring, 2, 4), vec![10, 20, 30, 40]);

        let mut head = 2;
        let mut expected = 4;
        for _ in 0..3 {
            head = ring.grow(head, 4).unwrap();
            expected *= 2;
            assert_eq!(ring.capacity(), expected);
            assert_eq!(head, 0);
            assert_eq!(collect(&ring, head, 4), vec![10, 20, 30, 40]);
        }
    }

    #[test]
    fn test_ring_grow_linearizes_partial_wrap() {
        let mut ring: RawRing<u32, 8, Standard, Global> = RawRing::new_in(Global);
        fill(&mut ring, 6, &[1, 2, 3, 4, 5]);
        let head = ring.grow(6, 5).unwrap();
        assert_eq!(head, 0);
        assert_eq!(collect(&ring, head, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ring_grow_inline_keeps_offset_window() {
        let mut ring: RawRing<u32, 8, Standard, Global> = RawRing::new_in(Global);
        fill(&mut ring, 3, &[7, 8]);
        let head = ring.grow(3, 2).unwrap();
        assert_eq!(head, 0);
        assert_eq!(collect(&ring, head, 2), vec![7, 8]);
    }

    #[test]
    fn test_ring_grow_paths_use_allocator() {
        let alloc = CountingAlloc::default();
        let mut ring: RawRing<u32, 4, Standard, &CountingAlloc> = RawRing::new_in(&alloc);
        fill(&mut ring, 0, &[1, 2, 3, 4]);

        // inline -> heap: copy path
        let head = ring.grow(0, 4).unwrap();
        assert_eq!((alloc.allocs.get(), alloc.reallocs.get()), (1, 0));

        // heap, contiguous: in-place path keeps the cursor
        let head = ring.grow(head, 4).unwrap();
        assert_eq!(head, 0);
        assert_eq!((alloc.allocs.get(), alloc.reallocs.get()), (1, 1));
        assert_eq!(collect(&ring, head, 4), vec![1, 2, 3, 4]);

        // heap, wrapped: copy path releases the old block
        fill(&mut ring, 14, &[5, 6, 7, 8]);
        let head = ring.grow(14, 4).unwrap();
        assert_eq!(head, 0);
        assert_eq!((alloc.allocs.get(), alloc.releases.get()), (2, 1));
        assert_eq!(collect(&ring, head, 4), vec![5, 6, 7, 8]);

        drop(ring);
        assert_eq!(alloc.outstanding(), 0);
    }

    #[test]
    fn test_ring_grow_overflow_leaves_ring_unchanged() {
        let mut ring: RawRing<u32, 32, Narrow, Global> = RawRing::new_in(Global);
        assert_eq!(ring.grow(0, 0), Ok(0));
        assert_eq!(ring.capacity(), 128);
        assert_eq!(
            ring.grow(0, 0),
            Err(ResizeError::CapacityOverflow { capacity: 128, factor: 4 })
        );
        assert_eq!(ring.capacity(), 128);
    }

    #[test]
    fn test_ring_grow_alloc_failure_leaves_ring_unchanged() {
        let mut ring: RawRing<u32, 4, Standard, FailingAlloc> = RawRing::new_in(FailingAlloc);
        fill(&mut ring, 1, &[1, 2, 3, 4]);
        assert_eq!(
            ring.grow(1, 4),
            Err(ResizeError::AllocFailed { capacity: 8, bytes: 32 })
        );
        assert!(ring.is_inline());
        assert_eq!(ring.capacity(), 4);
        assert_eq!(collect(&ring, 1, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ring_realloc_failure_leaves_heap_block() {
        let alloc = CountingAlloc::with_budget(1);
        let mut ring: RawRing<u32, 4, Standard, &CountingAlloc> = RawRing::new_in(&alloc);
        fill(&mut ring, 0, &[1, 2, 3, 4]);
        let head = ring.grow(0, 4).unwrap();
        assert!(matches!(ring.grow(head, 4), Err(ResizeError::AllocFailed { capacity: 16, .. })));
        assert_eq!(ring.capacity(), 8);
        assert_eq!(collect(&ring, head, 4), vec![1, 2, 3, 4]);
        ring.reset();
        assert_eq!(alloc.outstanding(), 0);
    }

    #[test]
    fn test_ring_reverse_window_wrapped() {
        let mut ring: RawRing<u32, 8, Standard, Global> = RawRing::new_in(Global);
        fill(&mut ring, 5, &[1, 2, 3, 4, 5, 6]);
        unsafe { ring.reverse_window(5, 6) };
        assert_eq!(collect(&ring, 5, 6), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_ring_zero_sized_never_allocates() {
        let mut ring: RawRing<(), 2, Standard, FailingAlloc> = RawRing::new_in(FailingAlloc);
        assert_eq!(ring.grow(1, 2), Ok(0));
        assert_eq!(ring.capacity(), 4);
        assert!(!ring.is_inline());
        ring.reset();
        assert!(ring.is_inline());
    }
}
