use thiserror::Error;

use crate::{Builtin, Kind, ObjectRef};

/// A builtin could not be evaluated at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldingError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{builtin} expects {expected} arguments but {found} were supplied")]
    Arity { builtin: Builtin, expected: usize, found: usize },

    #[error("argument {index} of {builtin} is a {found} but a {expected} was expected")]
    KindMismatch { builtin: Builtin, index: usize, expected: Kind, found: Kind },

    #[error("argument {index} of {builtin} is not a constant")]
    NotConstant { builtin: Builtin, index: usize },

    #[error("{0} has no compile time semantics")]
    NoSemantics(Builtin),

    #[error("failed to read a {kind} at offset {offset} of {object}")]
    HostRead { object: ObjectRef, offset: i64, kind: Kind },

    #[error("{0} does not point into the host object graph")]
    NotHostPointer(Builtin),

    #[error("no host object graph is available")]
    NoHostHeap,
}
