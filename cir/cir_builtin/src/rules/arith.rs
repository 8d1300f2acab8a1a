use cir::{split_continuations, Call, CirValue};

use crate::rules::{call_builtin, commutative, constant, pass, Integer, StrengthReducible};
use crate::CirOptimizer;

macro_rules! integer_rule {
    ($($(#[$attr: meta])* $name: ident),*) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
            pub struct $name<T>($crate::rules::IntegerMarker<T>);

            impl<T> $name<T> {
                pub const fn new() -> Self {
                    $name(::std::marker::PhantomData)
                }
            }
        )*
    };
}

pub(crate) use integer_rule;

integer_rule! {
    /// `0 - x => -x` and `x - 0 => x`
    Minus,
    /// `0 + x => x` and `x + 0 => x`
    Plus,
    /// Multiplication by `-1`, `0`, `1` and powers of two
    Times
}

impl<T: Integer> StrengthReducible for Minus<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        constant(&args[0]) == Some(T::ZERO) || constant(&args[1]) == Some(T::ZERO)
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        if constant(&params[0]) == Some(T::ZERO) {
            call_builtin(T::NEGATED, vec![params[1].clone()], k, e)
        } else {
            pass(k, params[0].clone())
        }
    }
}

impl<T: Integer> StrengthReducible for Plus<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        commutative::<T>(args, |val| val == T::ZERO).is_some()
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (_, k, _) = split_continuations(args);
        let (_, other) = commutative::<T>(args, |val| val == T::ZERO)
            .expect("reduce called for an irreducible addition");
        pass(k, other.clone())
    }
}

fn times_reducible<T: Integer>(val: T) -> bool {
    val == T::N_ONE || val == T::ZERO || val.is_power_of_two()
}

impl<T: Integer> StrengthReducible for Times<T> {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        commutative(args, times_reducible::<T>).is_some()
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (_, k, e) = split_continuations(args);
        let (factor, other) = commutative(args, times_reducible::<T>)
            .expect("reduce called for an irreducible multiplication");

        if factor == T::N_ONE {
            call_builtin(T::NEGATED, vec![other.clone()], k, e)
        } else if factor == T::ZERO {
            pass(k, factor.into_value())
        } else if factor == T::ONE {
            pass(k, other.clone())
        } else {
            let shift = CirValue::int(factor.log2() as i32);
            call_builtin(T::SHIFTED_LEFT, vec![other.clone(), shift], k, e)
        }
    }
}
