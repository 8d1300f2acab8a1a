use cir::{split_continuations, Builtin, Call, CirValue};

use crate::rules::StrengthReducible;
use crate::CirOptimizer;

/// Pointer loads whose continuation discards or merely forwards the loaded value.
///
/// Host foldability of this family is decided by the variant policy in [`crate::fold`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerLoad {
    pub builtin: Builtin,
}

enum Continuation<'a> {
    /// `cont[x] { body }` where `body` does not reference `x`.
    Dead(&'a Call),
    /// `cont[x] { k2(x) }` where `k2` does not reference `x`.
    Forward(&'a Call),
}

fn classify(k: &CirValue) -> Option<Continuation<'_>> {
    let cont = k.as_closure()?;
    let loaded = cont.single_param()?;
    let body = &cont.body;

    if !body.uses(loaded, true) {
        return Some(Continuation::Dead(body));
    }

    match &*body.arguments {
        [CirValue::Variable(arg)]
            if *arg == loaded
                && !body.procedure.uses(loaded, true)
                && !body.frame.as_ref().map_or(false, |frame| frame.uses(loaded)) =>
        {
            Some(Continuation::Forward(body))
        }
        _ => None,
    }
}

impl StrengthReducible for PointerLoad {
    fn is_reducible(&self, _ctx: &CirOptimizer, args: &[CirValue]) -> bool {
        let (_, k, _) = split_continuations(args);
        classify(k).is_some()
    }

    fn reduce(&self, _ctx: &mut CirOptimizer, args: &[CirValue]) -> Call {
        let (params, k, e) = split_continuations(args);
        match classify(k).expect("reduce called for an irreducible pointer load") {
            Continuation::Dead(body) => body.clone(),
            Continuation::Forward(body) => {
                let mut arguments = params.to_vec();
                arguments.push(body.procedure.clone());
                arguments.push(e.clone());
                let mut call = Call::new(self.builtin, arguments);
                call.frame = body.frame.clone();
                call
            }
        }
    }
}
