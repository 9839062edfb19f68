//! Helpers shared by the unit tests of the ring engine and its adapters.

use core::alloc::Layout;
use core::ptr::NonNull;
use std::cell::Cell;
use std::rc::Rc;

use crate::alloc::{AllocError, Global, RawAlloc};

/// An element that counts how many times it has been dropped.
#[derive(Debug)]
pub struct Tracked {
    pub id: u32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    pub fn new(id: u32, drops: &Rc<Cell<usize>>) -> Self {
        Self { id, drops: Rc::clone(drops) }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Values longer than any inline buffer used in the tests, so that filling a
/// container with them forces at least one grow.
#[allow(clippy::approx_constant)]
pub const MOCK_DOUBLES: [f64; 28] = [
    1.0, 2.5, 3.14, 4.0, 5.25, 6.75, 7.0, 8.125, 9.5, 10.0, 11.11, 12.0, 13.3, 14.0, 15.5, 16.75,
    17.0, 18.25, 19.5, 20.0, 21.75, 22.0, 23.125, 24.0, 25.5, 26.0, 27.75, 28.0,
];

/// Returns true if `ptr` points inside the bytes of `owner`, i.e. at an inline buffer.
pub fn points_into<O, T>(owner: &O, ptr: *const T) -> bool {
    let start = owner as *const O as usize;
    let end = start + core::mem::size_of::<O>();
    (start..end).contains(&(ptr as usize))
}

/// Refuses every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAlloc;

unsafe impl RawAlloc for FailingAlloc {
    fn allocate(&self, _layout: Layout) -> Result<NonNull<u8>, AllocError> {
        Err(AllocError)
    }

    unsafe fn reallocate(
        &self,
        _ptr: NonNull<u8>,
        _old: Layout,
        _new: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        Err(AllocError)
    }

    unsafe fn release(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unreachable!("FailingAlloc never hands out memory");
    }
}

/// Forwards to [`Global`] while counting calls, and starts failing once
/// `budget` successful allocations plus reallocations have been served.
#[derive(Debug, Default)]
pub struct CountingAlloc {
    pub budget: Cell<Option<usize>>,
    pub allocs: Cell<usize>,
    pub reallocs: Cell<usize>,
    pub releases: Cell<usize>,
}

impl CountingAlloc {
    pub fn with_budget(budget: usize) -> Self {
        Self { budget: Cell::new(Some(budget)), ..Self::default() }
    }

    /// Live heap blocks: allocations not yet released.
    pub fn outstanding(&self) -> usize {
        self.allocs.get() - self.releases.get()
    }

    fn take_budget(&self) -> Result<(), AllocError> {
        match self.budget.get() {
            Some(0) => Err(AllocError),
            Some(n) => {
                self.budget.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

unsafe impl RawAlloc for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.take_budget()?;
        let ptr = Global.allocate(layout)?;
        self.allocs.set(self.allocs.get() + 1);
        Ok(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        self.take_budget()?;
        let ptr = unsafe { Global.reallocate(ptr, old, new)? };
        self.reallocs.set(self.reallocs.get() + 1);
        Ok(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        self.releases.set(self.releases.get() + 1);
        unsafe { Global.release(ptr, layout) }
    }
}
