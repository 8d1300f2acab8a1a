//! Small helpers shared by all CIR crates.

mod ieee;
mod macros;

pub use crate::ieee::{Ieee32, Ieee64};

/// Returns `true` if `bits`, truncated to its lowest `width` bits, is zero or a power of two.
#[inline]
pub fn is_power_of_two_or_zero(bits: u64, width: u32) -> bool {
    let bits = truncate(bits, width);
    bits & bits.wrapping_sub(1) == 0
}

/// Clears every bit of `bits` above the lowest `width` bits.
#[inline]
pub fn truncate(bits: u64, width: u32) -> u64 {
    if width >= 64 {
        bits
    } else {
        bits & ((1u64 << width) - 1)
    }
}
