use std::fmt::{self, Display, Formatter};

/// An IEEE binary32 immediate floating point value, represented as a u32
/// containing the bit pattern.
///
/// All bit patterns are allowed. Equality and hashing are defined on the bit pattern so that
/// constants can be compared structurally (`NaN == NaN`, `0.0 != -0.0`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Ieee32(u32);

/// An IEEE binary64 immediate floating point value, represented as a u64
/// containing the bit pattern.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Ieee64(u64);

macro_rules! ieee {
    ($ty: ident($bits: ident, $float: ident)) => {
        impl $ty {
            #[inline]
            pub const fn with_bits(bits: $bits) -> $ty {
                $ty(bits)
            }

            #[inline]
            pub fn with_float(val: $float) -> $ty {
                $ty(val.to_bits())
            }

            #[inline]
            pub const fn bits(self) -> $bits {
                self.0
            }

            #[inline]
            pub fn as_float(self) -> $float {
                $float::from_bits(self.0)
            }

            /// Both `0.0` and `-0.0` count as zero.
            #[inline]
            pub fn is_zero(self) -> bool {
                self.as_float() == 0.0
            }
        }

        impl From<$float> for $ty {
            fn from(val: $float) -> $ty {
                $ty::with_float(val)
            }
        }

        impl From<$ty> for $float {
            fn from(val: $ty) -> $float {
                val.as_float()
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                let val = self.as_float();
                if val.is_nan() {
                    write!(f, "NaN")
                } else if val.is_infinite() {
                    if val > 0.0 {
                        write!(f, "+Inf")
                    } else {
                        write!(f, "-Inf")
                    }
                } else {
                    write!(f, "{:?}", val)
                }
            }
        }
    };
}

ieee!(Ieee32(u32, f32));
ieee!(Ieee64(u64, f64));
