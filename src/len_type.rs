//! Integer types used for ring lengths, capacities and cursors.

use core::fmt::Debug;

mod sealed {
    pub trait Sealed {}
}

/// A sealed trait for the unsigned integer that stores a ring's `len`,
/// `capacity` and read cursor.
///
/// Picking a narrow type (`u8`, `u16`) keeps the container header small; the
/// chosen type also bounds how far the ring may grow. All arithmetic is done in
/// `usize` and converted back. Ring indexing relies on those conversions being
/// exact inside `0..=MAX`, so only the primitive unsigned integers implement it:
///
/// ```compile_fail
/// use small_rings::LenType;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// struct Scaled(u8);
///
/// impl LenType for Scaled {
///     const ZERO: Self = Scaled(0);
///     const MAX: usize = 255;
///     fn as_usize(self) -> usize { self.0 as usize * 8 }
///     fn from_usize(i: usize) -> Self { Scaled(i as u8) }
/// }
/// ```
pub trait LenType: sealed::Sealed + Copy + Eq + Ord + Debug + 'static {
    /// Zero length / first cursor position.
    const ZERO: Self;

    /// Largest representable value, saturated to `usize`.
    const MAX: usize;

    /// Converts this value to a `usize` for slot arithmetic.
    fn as_usize(self) -> usize;

    /// Converts a `usize` (at most [`MAX`](LenType::MAX)) to this type.
    ///
    /// # Panics
    /// Debug builds panic if `i` does not fit.
    fn from_usize(i: usize) -> Self;

    /// `self + 1`.
    #[inline(always)]
    fn inc(self) -> Self {
        Self::from_usize(self.as_usize() + 1)
    }

    /// `self - 1`.
    #[inline(always)]
    fn dec(self) -> Self {
        Self::from_usize(self.as_usize() - 1)
    }

    /// Returns true if the value is zero.
    #[inline(always)]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_len_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl LenType for $ty {
                const ZERO: Self = 0;
                const MAX: usize = if (<$ty>::MAX as u128) > (usize::MAX as u128) {
                    usize::MAX
                } else {
                    <$ty>::MAX as usize
                };

                #[inline(always)]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline(always)]
                fn from_usize(i: usize) -> Self {
                    debug_assert!(i <= <Self as LenType>::MAX, "length {i} overflows {}", stringify!($ty));
                    i as $ty
                }
            }
        )*
    };
}

impl_len_type!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_len_type<L: LenType>() {
        let zero = L::ZERO;
        assert!(zero.is_zero());
        assert_eq!(zero.as_usize(), 0);

        let one = zero.inc();
        assert!(!one.is_zero());
        assert_eq!(one.as_usize(), 1);

        let zero_again = one.dec();
        assert!(zero_again.is_zero());

        let from = L::from_usize(10);
        assert_eq!(from.as_usize(), 10);

        assert_eq!(L::from_usize(L::MAX).as_usize(), L::MAX);
    }

    #[test]
    fn test_u8_len() {
        test_len_type::<u8>();
        assert_eq!(<u8 as LenType>::MAX, 255);
    }

    #[test]
    fn test_u16_len() {
        test_len_type::<u16>();
        assert_eq!(<u16 as LenType>::MAX, 65_535);
    }

    #[test]
    fn test_wide_len() {
        test_len_type::<u32>();
        test_len_type::<u64>();
        test_len_type::<usize>();
        assert_eq!(<usize as LenType>::MAX, usize::MAX);
        assert_eq!(<u64 as LenType>::MAX, u64::MAX.min(usize::MAX as u64) as usize);
    }
}
