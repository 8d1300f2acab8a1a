//! Applies folding, strength reduction and beta reduction to a CIR term until nothing changes.

use cir::{BuiltinRef, Call, CirSwitch, CirValue, Closure, Value};
use cir_builtin::{builtin_table, BuiltinTable, CirOptimizer};


/// Simplifies `call` with the process wide builtin table.
pub fn reduce_builtins(ctx: &mut CirOptimizer, call: Call) -> Call {
    reduce_builtins_with(builtin_table(), ctx, call)
}

/// Simplifies `call` bottom-up until a pass changes nothing or `max_iterations` passes ran.
pub fn reduce_builtins_with(table: &BuiltinTable, ctx: &mut CirOptimizer, mut call: Call) -> Call {
    let max_iterations = ctx.opts.max_iterations;
    for iteration in 0..max_iterations {
        let mut pass = Pass { table, ctx, changed: false };
        pass.simplify(&mut call);
        if !pass.changed {
            log::trace!("fixed point reached after {iteration} passes");
            return call;
        }
    }
    log::debug!("no fixed point after {max_iterations} passes");
    call
}

/// Simplifies the body of `procedure`.
pub fn reduce_procedure(ctx: &mut CirOptimizer, procedure: Closure) -> Closure {
    let Closure { kind, params, body } = procedure;
    Closure { kind, params, body: reduce_builtins(ctx, body) }
}

struct Pass<'p, 'o> {
    table: &'p BuiltinTable,
    ctx: &'p mut CirOptimizer<'o>,
    changed: bool,
}

impl Pass<'_, '_> {
    fn simplify(&mut self, call: &mut Call) {
        self.simplify_value(&mut call.procedure);
        for arg in &mut call.arguments {
            self.simplify_value(arg);
        }

        if let Some(mut rewritten) = self.rewrite(call) {
            if rewritten.frame.is_none() {
                rewritten.frame = call.frame.clone();
            }
            if rewritten == *call {
                return;
            }
            *call = rewritten;
            self.changed = true;
            // a folded value may now flow into a continuation closure
            self.simplify(call);
        }
    }

    fn simplify_value(&mut self, val: &mut CirValue) {
        if let CirValue::Closure(closure) = val {
            self.simplify(&mut closure.body)
        }
    }

    fn rewrite(&mut self, call: &Call) -> Option<Call> {
        let rewritten = match &call.procedure {
            CirValue::Builtin(builtin) => self.rewrite_builtin(*builtin, call),
            CirValue::Switch(switch) => fold_switch(switch, &call.arguments),
            CirValue::Closure(closure) => beta_reduce(closure, &call.arguments),
            _ => None,
        }?;

        log::trace!("{call} => {rewritten}");
        Some(rewritten)
    }

    fn rewrite_builtin(&mut self, builtin: BuiltinRef, call: &Call) -> Option<Call> {
        let rule = self.table.rule(builtin);
        let args = &call.arguments;
        if rule.is_foldable(self.ctx, args) {
            match rule.fold(self.ctx, args) {
                Ok(folded) => return Some(folded),
                Err(err) => log::debug!("failed to fold {call}: {err}"),
            }
        }
        if rule.is_reducible(self.ctx, args) {
            return Some(rule.reduce(self.ctx, args));
        }
        None
    }
}

/// Replaces a switch on constants with a call to the selected target.
fn fold_switch(switch: &CirSwitch, args: &[CirValue]) -> Option<Call> {
    if args.len() != switch.arity() {
        return None;
    }
    let operands: Option<Vec<Value>> =
        args[..=switch.matches].iter().map(|arg| arg.as_constant().copied()).collect();
    let operands = operands?;
    let target = switch.select(&operands[0], &operands[1..])?;
    Some(Call::new(args[target].clone(), Vec::new()))
}

/// Inlines a closure applied directly to its arguments.
///
/// Closure arguments are only inlined if the parameter they bind is used at most once so
/// that no closure is duplicated.
fn beta_reduce(closure: &Closure, args: &[CirValue]) -> Option<Call> {
    if args.len() != closure.params.len() {
        return None;
    }

    let inlinable = closure.params.iter().zip(args).all(|(&param, arg)| match arg {
        CirValue::Closure(_) => closure.body.use_count(param) <= 1,
        _ => true,
    });
    if !inlinable {
        return None;
    }

    let mut body = closure.body.clone();
    for (&param, arg) in closure.params.iter().zip(args) {
        body.substitute(param, arg);
    }
    Some(body)
}
