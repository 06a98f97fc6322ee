use std::fmt::Debug;
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// Primitive integer types usable as map keys.
///
/// The trait is sealed: only the built-in signed and unsigned integers
/// implement it. Routing works on [`IntegerKey::magnitude`], the absolute
/// value of the key read as a signed integer, widened to `u128` so that
/// `MIN` of each signed type is defined.
///
/// Unsigned keys are read as `i64` first: `u8`..`u32` keep their value,
/// while `u64`/`usize` keys at or above `2^63` wrap to negative and route
/// by their negation (`u64::MAX` behaves like `-1`). `u128` keys wrap
/// through `i128` the same way.
pub trait IntegerKey:
    sealed::Sealed + Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Absolute value of the key, read as a signed integer, as a `u128`.
    fn magnitude(self) -> u128;
}

macro_rules! impl_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl IntegerKey for $t {
                #[inline]
                fn magnitude(self) -> u128 {
                    self.unsigned_abs() as u128
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl IntegerKey for $t {
                #[inline]
                fn magnitude(self) -> u128 {
                    self as u128
                }
            }
        )*
    };
}

macro_rules! impl_wrapping {
    ($($t:ty => $signed:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl IntegerKey for $t {
                #[inline]
                fn magnitude(self) -> u128 {
                    (self as $signed).unsigned_abs() as u128
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_unsigned!(u8, u16, u32);
impl_wrapping!(u64 => i64, u128 => i128);

// usize goes through u64 so 32-bit targets never wrap, like u32.
impl sealed::Sealed for usize {}

impl IntegerKey for usize {
    #[inline]
    fn magnitude(self) -> u128 {
        (self as u64).magnitude()
    }
}
