//! Foldability and compile time evaluation of builtin calls.
//!
//! A call is foldable when the builtin has compile time semantics and every parameter is a
//! scalar constant. Pointer loads are never foldable this way, but when the optimizer runs hosted
//! their result can be read from the host object graph. Which loads may be answered from the host
//! depends on the [`FoldVariant`] of the callee:
//!
//! * `Plain`: only slots the host marks as immutable,
//! * `Foldable`: any slot of a known object,
//! * `FoldableWhenNotZero`: any slot of a known object that currently holds a non-zero value.

use cir::{
    split_continuations, Builtin, BuiltinRef, Call, CirValue, FoldVariant, FoldingError, HostHeap,
    Value,
};

use crate::CirOptimizer;

#[cfg(test)]
mod tests;

/// Every parameter is a constant of non reference kind.
fn has_constant_params(params: &[CirValue]) -> bool {
    params.iter().all(|param| param.as_constant().map_or(false, Value::is_scalar))
}

fn is_base_foldable(builtin: Builtin, params: &[CirValue]) -> bool {
    !builtin.is_non_foldable() && has_constant_params(params)
}

fn constants(builtin: Builtin, params: &[CirValue]) -> Result<Vec<Value>, FoldingError> {
    params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            param.as_constant().copied().ok_or(FoldingError::NotConstant { builtin, index })
        })
        .collect()
}

/// A pointer load through a known host object with constant offsets.
struct HostLoad<'a> {
    heap: &'a dyn HostHeap,
    values: Vec<Value>,
}

fn host_load<'a>(
    ctx: &CirOptimizer<'a>,
    builtin: Builtin,
    params: &[CirValue],
) -> Option<HostLoad<'a>> {
    builtin.load()?;
    let heap = ctx.host_heap()?;
    let values = constants(builtin, params).ok()?;
    values.first()?.as_object()?;
    Some(HostLoad { heap, values })
}

fn is_immutable_host_load(ctx: &CirOptimizer, builtin: Builtin, params: &[CirValue]) -> bool {
    let (Some(host), Some(load)) = (host_load(ctx, builtin, params), builtin.load()) else {
        return false;
    };
    let Some(object) = host.values[0].as_object() else {
        return false;
    };
    match load.offset(&host.values[1..]) {
        Ok(offset) => host.heap.is_immutable(object, offset),
        Err(_) => false,
    }
}

fn is_plain_foldable(ctx: &CirOptimizer, builtin: Builtin, params: &[CirValue]) -> bool {
    is_base_foldable(builtin, params) || is_immutable_host_load(ctx, builtin, params)
}

fn is_variant_foldable(ctx: &CirOptimizer, builtin: Builtin, params: &[CirValue]) -> bool {
    (ctx.is_hosted() && host_load(ctx, builtin, params).is_some())
        || is_plain_foldable(ctx, builtin, params)
}

/// Evaluates `builtin` on constant `params`, reading the host object graph for loads through
/// host objects.
pub fn evaluate(
    ctx: &CirOptimizer,
    builtin: Builtin,
    params: &[CirValue],
) -> Result<Value, FoldingError> {
    let values = constants(builtin, params)?;
    if let Some(load) = builtin.load() {
        if values.first().and_then(Value::as_object).is_some() {
            let heap = ctx.host_heap().ok_or(FoldingError::NoHostHeap)?;
            return heap.load(load, &values);
        }
    }
    builtin.evaluate(&values)
}

pub(crate) fn is_foldable(ctx: &CirOptimizer, callee: BuiltinRef, args: &[CirValue]) -> bool {
    let (params, _, _) = split_continuations(args);
    let builtin = callee.builtin;
    match callee.variant {
        FoldVariant::Plain => is_plain_foldable(ctx, builtin, params),
        FoldVariant::Foldable => is_variant_foldable(ctx, builtin, params),
        FoldVariant::FoldableWhenNotZero => {
            if !is_variant_foldable(ctx, builtin, params) {
                return false;
            }
            match evaluate(ctx, builtin, params) {
                Ok(val) => !val.is_zero(),
                Err(err) => {
                    log::trace!("{callee} is not foldable: {err}");
                    false
                }
            }
        }
    }
}

/// Evaluates the call and passes the result to the normal continuation.
pub(crate) fn fold(
    ctx: &CirOptimizer,
    callee: BuiltinRef,
    args: &[CirValue],
) -> Result<Call, FoldingError> {
    let builtin = callee.builtin;
    if args.len() != builtin.arity() {
        return Err(FoldingError::Arity { builtin, expected: builtin.arity(), found: args.len() });
    }

    let (params, k, _) = split_continuations(args);
    let val = evaluate(ctx, builtin, params)?;
    let arguments = if val == Value::Void { Vec::new() } else { vec![val.into()] };
    Ok(Call::new(k.clone(), arguments))
}
