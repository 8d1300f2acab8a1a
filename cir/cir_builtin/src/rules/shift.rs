use std::marker::PhantomData;

use cir::{split_continuations, Call, CirValue};

use crate::rules::{constant, pass, Integer, IntegerMarker, StrengthReducible};
use crate::CirOptimizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    SignedRight,
    UnsignedRight,
}

/// Shifts that leave their operand unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift<T> {
    pub direction: ShiftDirection,
    _marker: IntegerMarker<T>,
}

impl<T> Shift<T> {
    pub const fn new(direction: ShiftDirection) -> Shift<T> {
        Shift { direction, _marker: PhantomData }
    }
}

impl<T: Integer> StrengthReducible for Shift<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        // the amount is masked to the operand width
        if let Some(amount) = constant::<i32>(&args[1]) {
            if amount as u32 & (T::BITS - 1) == 0 {
                return true;
            }
        }

        match constant::<T>(&args[0]) {
            Some(val) if val == T::ZERO => true,
            Some(val) if val == T::N_ONE => self.direction == ShiftDirection::SignedRight,
            _ => false,
        }
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, _) = split_continuations(args);
        pass(k, params[0].clone())
    }
}
