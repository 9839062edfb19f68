//! Per-instantiation ring configuration.

use crate::len_type::LenType;

/// Compile-time knobs shared by [`SmallStack`](crate::SmallStack),
/// [`SmallQueue`](crate::SmallQueue) and [`SmallDeque`](crate::SmallDeque).
///
/// Implement it on a marker type to pick a narrower length type, a different
/// growth factor, or an insert-time validity check:
///
/// ```rust
/// use small_rings::{RingConfig, SmallQueue};
///
/// #[derive(Debug, Clone, Copy)]
/// struct Date { year: u16, month: u8, day: u8 }
///
/// struct Dates;
///
/// impl RingConfig<Date> for Dates {
///     type Len = u16;
///     const GROWTH_FACTOR: usize = 4;
///
///     fn validate(d: &Date) -> bool {
///         d.year < 2100 && (1..=12).contains(&d.month) && (1..=31).contains(&d.day)
///     }
/// }
///
/// let mut q: SmallQueue<Date, 4, Dates> = SmallQueue::new();
/// q.enqueue(Date { year: 1200, month: 1, day: 1 }).unwrap();
/// assert_eq!(q.peek().map(|d| d.year), Some(1200));
/// ```
pub trait RingConfig<T> {
    /// Integer used for `len`, `capacity` and the cursor. Bounds the maximum capacity.
    type Len: LenType;

    /// Capacity multiplier applied on every grow. Must be a power of two in `2..32`.
    const GROWTH_FACTOR: usize = 2;

    /// Validity predicate for inserted values, checked with `debug_assert!`.
    ///
    /// A value failing it is a programming error, not a recoverable condition.
    #[inline(always)]
    fn validate(_value: &T) -> bool {
        true
    }
}

/// Default configuration: `usize` lengths, doubling growth, every value accepted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Standard;

impl<T> RingConfig<T> for Standard {
    type Len = usize;
}
