//! Strength reduction rules.
//!
//! Every builtin slot of the [`BuiltinTable`](crate::BuiltinTable) owns one [`Rule`]. A rule
//! inspects the arguments of a call (parameters followed by the normal and exception
//! continuation) and may rewrite the call into a cheaper but equivalent one.

use std::fmt::Display;
use std::marker::PhantomData;

use cir::{Builtin, Call, CirValue, Kind, Snippet, Value};

use crate::CirOptimizer;

mod arith;
mod compare;
mod division;
mod logic;
mod pointer;
mod shift;

#[cfg(test)]
mod tests;

pub use arith::{Minus, Plus, Times};
pub use compare::{Comparison, Pathological, Sentinel};
pub use division::{AddressDivided, AddressRemainder, Divided, Remainder};
pub use logic::{Logic, LogicOp};
pub use pointer::PointerLoad;
pub use shift::{Shift, ShiftDirection};

pub trait StrengthReducible {
    /// Whether [`reduce`](StrengthReducible::reduce) can rewrite a call with `args`.
    fn is_reducible(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool;

    /// Rewrites a call with `args`. Must only be called if `is_reducible` returned `true` for
    /// the same arguments.
    fn reduce(&self, ctx: &mut CirOptimizer, args: &[CirValue]) -> Call;
}

macro_rules! rules {
    ($($variant: ident($rule: ty)),*) => {
        /// The rewrite rule registered for a builtin.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum Rule {
            /// Folding only, the builtin has no strength reductions.
            Generic,
            $($variant($rule)),*
        }

        impl Rule {
            pub fn as_reducible(&self) -> Option<&dyn StrengthReducible> {
                match self {
                    Rule::Generic => None,
                    $(Rule::$variant(rule) => Some(rule)),*
                }
            }
        }
    };
}

rules! {
    IntMinus(Minus<i32>),
    LongMinus(Minus<i64>),
    IntPlus(Plus<i32>),
    LongPlus(Plus<i64>),
    IntTimes(Times<i32>),
    LongTimes(Times<i64>),
    IntDivided(Divided<i32>),
    LongDivided(Divided<i64>),
    IntRemainder(Remainder<i32>),
    LongRemainder(Remainder<i64>),
    IntLogic(Logic<i32>),
    LongLogic(Logic<i64>),
    IntShift(Shift<i32>),
    LongShift(Shift<i64>),
    AddressDivided(AddressDivided),
    AddressRemainder(AddressRemainder),
    Comparison(Comparison),
    PointerLoad(PointerLoad)
}

/// A two's complement integer kind with the builtins the rules rewrite into.
pub trait Integer: Copy + Eq + Display + 'static {
    const KIND: Kind;
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    const N_ONE: Self;
    const NEGATED: Builtin;
    const NOT: Builtin;
    const SHIFTED_LEFT: Builtin;

    fn from_value(val: &Value) -> Option<Self>;
    fn into_value(self) -> Value;

    /// The bit pattern zero extended to 64 bit.
    fn bits(self) -> u64;

    /// Whether exactly one bit is set. The minimum value counts as a power of two.
    fn is_power_of_two(self) -> bool {
        self.bits().is_power_of_two()
    }

    fn log2(self) -> u32 {
        self.bits().trailing_zeros()
    }
}

impl Integer for i32 {
    const KIND: Kind = Kind::Int;
    const BITS: u32 = 32;
    const ZERO: i32 = 0;
    const ONE: i32 = 1;
    const N_ONE: i32 = -1;
    const NEGATED: Builtin = Builtin::IntNegated;
    const NOT: Builtin = Builtin::IntNot;
    const SHIFTED_LEFT: Builtin = Builtin::IntShiftedLeft;

    fn from_value(val: &Value) -> Option<i32> {
        val.as_int()
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn bits(self) -> u64 {
        self as u32 as u64
    }
}

impl Integer for i64 {
    const KIND: Kind = Kind::Long;
    const BITS: u32 = 64;
    const ZERO: i64 = 0;
    const ONE: i64 = 1;
    const N_ONE: i64 = -1;
    const NEGATED: Builtin = Builtin::LongNegated;
    const NOT: Builtin = Builtin::LongNot;
    const SHIFTED_LEFT: Builtin = Builtin::LongShiftedLeft;

    fn from_value(val: &Value) -> Option<i64> {
        val.as_long()
    }

    fn into_value(self) -> Value {
        Value::Long(self)
    }

    fn bits(self) -> u64 {
        self as u64
    }
}

/// Marker for rules that are generic over the [`Integer`] they operate on.
pub(crate) type IntegerMarker<T> = PhantomData<fn(T) -> T>;

pub(crate) fn constant<T: Integer>(val: &CirValue) -> Option<T> {
    val.as_constant().and_then(T::from_value)
}

/// Finds the first operand of a commutative binary builtin that is a constant satisfying
/// `pred`. Returns the constant and the other operand.
pub(crate) fn commutative<T: Integer>(
    args: &[CirValue],
    pred: impl Fn(T) -> bool,
) -> Option<(T, &CirValue)> {
    match constant::<T>(&args[0]) {
        Some(val) if pred(val) => Some((val, &args[1])),
        _ => match constant::<T>(&args[1]) {
            Some(val) if pred(val) => Some((val, &args[0])),
            _ => None,
        },
    }
}

/// `k(val)`
pub(crate) fn pass(k: &CirValue, val: impl Into<CirValue>) -> Call {
    Call::new(k.clone(), vec![val.into()])
}

/// Calls `builtin` with `params` followed by the continuations `k` and `e`.
pub(crate) fn call_builtin(
    builtin: Builtin,
    params: Vec<CirValue>,
    k: &CirValue,
    e: &CirValue,
) -> Call {
    let mut arguments = params;
    arguments.push(k.clone());
    arguments.push(e.clone());
    Call::new(builtin, arguments)
}

pub(crate) fn throw_arithmetic_exception(e: &CirValue) -> Call {
    Call::new(Snippet::CreateArithmeticException, vec![e.clone(), e.clone()])
}
