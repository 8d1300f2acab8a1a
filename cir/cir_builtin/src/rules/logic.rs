use std::marker::PhantomData;

use cir::{split_continuations, Call, CirValue};

use crate::rules::{
    call_builtin, commutative, pass, Integer, IntegerMarker, StrengthReducible,
};
use crate::CirOptimizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

/// Bitwise logic with itself, zero or all ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Logic<T> {
    pub op: LogicOp,
    _marker: IntegerMarker<T>,
}

impl<T> Logic<T> {
    pub const fn new(op: LogicOp) -> Logic<T> {
        Logic { op, _marker: PhantomData }
    }
}

fn zero_or_all_ones<T: Integer>(val: T) -> bool {
    val == T::ZERO || val == T::N_ONE
}

impl<T: Integer> StrengthReducible for Logic<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        args[0] == args[1] || commutative(args, zero_or_all_ones::<T>).is_some()
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);

        if params[0] == params[1] {
            return match self.op {
                LogicOp::And | LogicOp::Or => pass(k, params[0].clone()),
                LogicOp::Xor => pass(k, T::ZERO.into_value()),
            };
        }

        let (val, other) = commutative(args, zero_or_all_ones::<T>)
            .expect("reduce called for irreducible bitwise logic");
        let all_ones = val == T::N_ONE;
        match (self.op, all_ones) {
            (LogicOp::And, false) => pass(k, T::ZERO.into_value()),
            (LogicOp::And, true) | (LogicOp::Or, false) | (LogicOp::Xor, false) => {
                pass(k, other.clone())
            }
            (LogicOp::Or, true) => pass(k, T::N_ONE.into_value()),
            (LogicOp::Xor, true) => call_builtin(T::NOT, vec![other.clone()], k, e),
        }
    }
}
