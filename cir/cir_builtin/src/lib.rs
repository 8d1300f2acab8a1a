//! Constant folding and strength reduction of CIR builtin calls.
//!
//! The [`BuiltinTable`] registers one rule object per [`Builtin`](cir::Builtin). Callers visit
//! call sites and ask the rule object of the callee whether the call can be folded (evaluated at
//! compile time) and otherwise whether it can be reduced (rewritten into a cheaper call).
//!
//! ```ignore
//! let table = builtin_table();
//! let rule = table.rule(callee);
//! if rule.is_foldable(&ctx, &args) {
//!     rule.fold(&ctx, &args)?
//! } else if rule.is_reducible(&ctx, &args) {
//!     rule.reduce(&mut ctx, &args)
//! }
//! ```

mod fold;
mod optimizer;
mod opts;
pub mod rules;
mod table;

pub use crate::fold::evaluate;
pub use crate::optimizer::CirOptimizer;
pub use crate::opts::{ExecutionMode, Opts};
pub use crate::rules::{Rule, StrengthReducible};
pub use crate::table::{builtin_table, BuiltinTable, CirBuiltin, RuleObject};
