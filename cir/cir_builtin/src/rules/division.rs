use cir::{split_continuations, Builtin, Call, CirValue, Closure, Kind, Value};
use stdx::is_power_of_two_or_zero;

use crate::rules::arith::integer_rule;
use crate::rules::{
    call_builtin, constant, pass, throw_arithmetic_exception, Integer, StrengthReducible,
};
use crate::CirOptimizer;

integer_rule! {
    /// Signed division by `-1`, `0` and `1` and division of zero.
    ///
    /// Other powers of two are left alone: signed division rounds towards zero and an
    /// arithmetic shift does not.
    Divided,
    /// Signed remainder by `-1`, `0` and `1` and remainder of zero.
    Remainder
}

impl<T: Integer> StrengthReducible for Divided<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        trivial_divisor::<T>(&args[1]) || constant(&args[0]) == Some(T::ZERO)
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        let dividend = &params[0];
        match constant::<T>(&params[1]) {
            Some(divisor) if divisor == T::N_ONE => {
                call_builtin(T::NEGATED, vec![dividend.clone()], k, e)
            }
            Some(divisor) if divisor == T::ZERO => throw_arithmetic_exception(e),
            // one as divisor or zero as dividend
            _ => pass(k, dividend.clone()),
        }
    }
}

impl<T: Integer> StrengthReducible for Remainder<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        trivial_divisor::<T>(&args[1]) || constant(&args[0]) == Some(T::ZERO)
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        match constant::<T>(&params[1]) {
            Some(divisor) if divisor == T::ZERO => throw_arithmetic_exception(e),
            Some(divisor) if divisor == T::ONE || divisor == T::N_ONE => {
                pass(k, T::ZERO.into_value())
            }
            _ => pass(k, params[0].clone()),
        }
    }
}

/// `-1`, `0` or `1`.
fn trivial_divisor<T: Integer>(val: &CirValue) -> bool {
    constant::<T>(val).map_or(false, |divisor| [T::N_ONE, T::ZERO, T::ONE].contains(&divisor))
}

/// Reads an unsigned divisor. Int divisors are zero extended.
fn unsigned_divisor(by_int: bool, val: &CirValue) -> Option<u64> {
    match (by_int, val.as_constant()?) {
        (false, Value::Word(divisor)) => Some(*divisor),
        (true, Value::Int(divisor)) => Some(*divisor as u32 as u64),
        _ => None,
    }
}

fn is_zero_word(val: &CirValue) -> bool {
    val.as_constant() == Some(&Value::Word(0))
}

/// Unsigned division of a word by a power of two or zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDivided {
    pub by_int: bool,
}

impl StrengthReducible for AddressDivided {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        unsigned_divisor(self.by_int, &args[1])
            .map_or(false, |divisor| is_power_of_two_or_zero(divisor, 64))
            || is_zero_word(&args[0])
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        let dividend = &params[0];
        match unsigned_divisor(self.by_int, &params[1]) {
            Some(0) => throw_arithmetic_exception(e),
            Some(divisor) if divisor != 1 && divisor.is_power_of_two() => {
                let shift = CirValue::int(divisor.trailing_zeros() as i32);
                call_builtin(
                    Builtin::AddressUnsignedShiftedRight,
                    vec![dividend.clone(), shift],
                    k,
                    e,
                )
            }
            _ => pass(k, dividend.clone()),
        }
    }
}

/// Unsigned remainder of a word by a power of two or zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRemainder {
    pub by_int: bool,
}

impl AddressRemainder {
    fn zero(&self) -> Value {
        if self.by_int {
            Value::Int(0)
        } else {
            Value::Word(0)
        }
    }
}

impl StrengthReducible for AddressRemainder {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        unsigned_divisor(self.by_int, &args[1])
            .map_or(false, |divisor| is_power_of_two_or_zero(divisor, 64))
            || is_zero_word(&args[0])
    }

    fn reduce(&self, ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        let dividend = &params[0];
        match unsigned_divisor(self.by_int, &params[1]) {
            Some(0) => throw_arithmetic_exception(e),
            Some(divisor) if divisor != 1 && divisor.is_power_of_two() => {
                let mask = divisor - 1;
                if self.by_int {
                    // the mask fits into 31 bits so the low word alone decides the remainder
                    let tmp = ctx.variables.new_variable(Kind::Int);
                    let and = call_builtin(
                        Builtin::IntAnd,
                        vec![tmp.into(), CirValue::int(mask as i32)],
                        k,
                        e,
                    );
                    let cont = Closure::continuation(vec![tmp], and);
                    Call::new(Builtin::WordToInt, vec![dividend.clone(), cont.into(), e.clone()])
                } else {
                    let mask = CirValue::word(mask);
                    call_builtin(Builtin::AddressAnd, vec![dividend.clone(), mask], k, e)
                }
            }
            // the remainder by one and the remainder of zero are both zero
            _ => pass(k, self.zero()),
        }
    }
}
