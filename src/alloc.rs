//! Memory collaborators used when a ring leaves its inline buffer.
//!
//! Rings never allocate while they fit inline. The allocator is consulted only
//! to promote a ring to the heap, to grow a heap ring, and to release the heap
//! block on [`reset`](crate::SmallQueue::reset) or drop.

use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc;

/// The allocator returned no memory. Carries no payload; the ring reports the
/// failing size itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

/// Allocate / reallocate / release hooks for a ring's heap block.
///
/// Layouts passed in always have a non-zero size; rings of zero-sized types
/// never call into the allocator.
///
/// # Safety
/// Implementations must return blocks that satisfy the requested layout, and
/// `reallocate` must preserve the first `min(old.size(), new.size())` bytes.
/// On failure `reallocate` must leave the original block valid.
pub unsafe trait RawAlloc {
    /// Allocates a block for `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Resizes `ptr` from `old` to `new`. The alignment of both layouts is equal.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator for `old`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new: Layout,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Returns `ptr` to the allocator.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator for `layout` and not
    /// released since.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global allocator (`std::alloc`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl RawAlloc for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(AllocError)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        debug_assert_eq!(old.align(), new.align());
        NonNull::new(unsafe { alloc::realloc(ptr.as_ptr(), old, new.size()) }).ok_or(AllocError)
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

unsafe impl<A: RawAlloc + ?Sized> RawAlloc for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        unsafe { (**self).reallocate(ptr, old, new) }
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).release(ptr, layout) }
    }
}
