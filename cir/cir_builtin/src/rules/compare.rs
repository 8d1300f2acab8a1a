use cir::{
    split_continuations, Call, CirSwitch, CirValue, SwitchKind, Value, ValueComparator, Variable,
};

use crate::rules::{pass, StrengthReducible};
use crate::CirOptimizer;

/// An operand value for which an unsigned comparison has a fixed result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sentinel {
    Zero,
    /// The largest unsigned value of the operand kind (all bits set up to the word width).
    Max,
}

/// `x >= 0`, `max >= x`, `0 <= x`, `x <= max` are always true; `0 > x`, `x > max`,
/// `x < 0`, `max < x` are always false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pathological {
    pub lhs: Sentinel,
    pub rhs: Sentinel,
    pub result: bool,
}

impl Pathological {
    /// The pathological operands of an unsigned comparison.
    pub fn for_comparator(comparator: ValueComparator) -> Option<Pathological> {
        let (lhs, rhs, result) = match comparator {
            ValueComparator::GreaterEqual => (Sentinel::Max, Sentinel::Zero, true),
            ValueComparator::GreaterThan => (Sentinel::Zero, Sentinel::Max, false),
            ValueComparator::LessEqual => (Sentinel::Zero, Sentinel::Max, true),
            ValueComparator::LessThan => (Sentinel::Max, Sentinel::Zero, false),
            ValueComparator::Equal | ValueComparator::NotEqual => return None,
        };
        Some(Pathological { lhs, rhs, result })
    }
}

/// A comparison producing `0` or `1`.
///
/// Comparisons whose result only feeds a two way branch on that result are fused into a single
/// switch on the compared operands. Unsigned comparisons additionally short circuit for
/// pathological operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub kind: SwitchKind,
    pub comparator: ValueComparator,
    pub pathological: Option<Pathological>,
}

/// A continuation of the shape `cont[p] { Switch<int,==|!=,1>(p, 0|1, t, d) }`.
struct Branch<'a> {
    param: Variable,
    body: &'a Call,
    comparator: ValueComparator,
}

impl Comparison {
    pub fn new(kind: SwitchKind, comparator: ValueComparator) -> Comparison {
        Comparison { kind, comparator, pathological: None }
    }

    /// An unsigned comparison with short circuits for its pathological operands.
    pub fn unsigned(kind: SwitchKind, comparator: ValueComparator) -> Comparison {
        Comparison { kind, comparator, pathological: Pathological::for_comparator(comparator) }
    }

    fn sentinel(&self, ctx: &CirOptimizer, sentinel: Sentinel) -> Value {
        match (self.kind, sentinel) {
            (SwitchKind::Word, Sentinel::Zero) => Value::Word(0),
            (SwitchKind::Word, Sentinel::Max) => Value::Word(ctx.word_width().all_ones()),
            (_, Sentinel::Zero) => Value::Int(0),
            (_, Sentinel::Max) => Value::Int(-1),
        }
    }

    fn pathological_result(&self, ctx: &CirOptimizer, params: &[CirValue]) -> Option<bool> {
        let pathological = self.pathological?;
        let lhs = self.sentinel(ctx, pathological.lhs);
        let rhs = self.sentinel(ctx, pathological.rhs);
        if params[0].as_constant() == Some(&lhs) || params[1].as_constant() == Some(&rhs) {
            Some(pathological.result)
        } else {
            None
        }
    }

    fn branch<'a>(&self, k: &'a CirValue) -> Option<Branch<'a>> {
        let cont = k.as_closure()?;
        let param = cont.single_param()?;
        let body = &cont.body;

        let CirValue::Switch(switch) = &body.procedure else {
            return None;
        };
        if switch.kind != SwitchKind::Int
            || switch.matches != 1
            || !matches!(switch.comparator, ValueComparator::Equal | ValueComparator::NotEqual)
        {
            return None;
        }

        let [tag, val, then, default] = &*body.arguments else {
            return None;
        };
        if tag.as_variable() != Some(param) {
            return None;
        }
        let val = val.as_constant()?.as_int()?;
        if val != 0 && val != 1 {
            return None;
        }
        // the comparison result may only survive in frame descriptors
        if then.uses(param, false) || default.uses(param, false) {
            return None;
        }

        let comparator = if (val == 1) == (switch.comparator == ValueComparator::Equal) {
            self.comparator
        } else {
            self.comparator.complement()
        };
        Some(Branch { param, body, comparator })
    }
}

impl StrengthReducible for Comparison {
    fn is_reducible(&self, ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        let (params, k, _) = split_continuations(args);
        self.pathological_result(ctx, params).is_some() || self.branch(k).is_some()
    }

    fn reduce(&self, ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, _) = split_continuations(args);
        if let Some(result) = self.pathological_result(ctx, params) {
            return pass(k, Value::bool(result));
        }

        let branch = self.branch(k).expect("reduce called for an irreducible comparison");
        let lhs = &params[0];
        let switch = CirSwitch::new(self.kind, branch.comparator, 1);
        let mut call = Call::new(
            switch,
            vec![
                lhs.clone(),
                params[1].clone(),
                branch.body.arguments[2].clone(),
                branch.body.arguments[3].clone(),
            ],
        );
        call.frame = branch.body.frame.clone();
        // frame descriptors that still mention the comparison result now see the left operand
        call.substitute(branch.param, lhs);
        call
    }
}
