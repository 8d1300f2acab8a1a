//! CIR: a continuation passing style intermediate representation.
//!
//! Every computation is a [`Call`] of a procedure to arguments and control never returns: results
//! are passed to continuations. Calls to [`Builtin`] operators receive their parameters followed
//! by a normal continuation and an exception continuation.
//!
//! This crate only contains the data model, the compile time semantics of the builtins
//! ([`Builtin::evaluate`]), the host object graph and a textual printer. Folding and strength
//! reduction live in `cir_builtin`.

mod builtin;
mod error;
mod kind;
mod snippet;
mod switch;
mod term;
mod value;

pub mod heap;
pub mod write;

pub use crate::builtin::{
    Addressing, Builtin, BuiltinFlags, BuiltinRef, FoldVariant, Load, MemoryKind,
};
pub use crate::error::FoldingError;
pub use crate::heap::{HostHeap, ObjectGraph};
pub use crate::kind::Kind;
pub use crate::snippet::Snippet;
pub use crate::switch::{CirSwitch, SwitchKind, ValueComparator};
pub use crate::term::{
    split_continuations, Call, CirValue, Closure, ClosureKind, FrameDescriptor, Variable, Variables,
};
pub use crate::value::{ObjectRef, Reference, Value, WordWidth};
pub use stdx::{Ieee32, Ieee64};
