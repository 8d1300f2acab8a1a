//! Converting CIR to text.
//!
//! Terms print on a single line: `IntTimes(v0, 8, v1, v2)`, closures as
//! `cont[v3] { IntAnd(v3, 7, v1, v2) }` or `proc[v0, v1, v2] { .. }` and frame descriptors as a
//! trailing `@position[locals; stack]`.

use std::fmt::{self, Display, Formatter, Write};

use crate::{Call, CirValue, Closure, ClosureKind, FrameDescriptor};


fn write_list(w: &mut dyn Write, vals: &[CirValue]) -> fmt::Result {
    for (i, val) in vals.iter().enumerate() {
        if i != 0 {
            w.write_str(", ")?;
        }
        write_value(w, val)?;
    }
    Ok(())
}

pub fn write_value(w: &mut dyn Write, val: &CirValue) -> fmt::Result {
    match val {
        CirValue::Constant(val) => write!(w, "{val}"),
        CirValue::Variable(var) => write!(w, "{var}"),
        CirValue::Closure(closure) => write_closure(w, closure),
        CirValue::Builtin(builtin) => write!(w, "{builtin}"),
        CirValue::Switch(switch) => write!(w, "{switch}"),
        CirValue::Snippet(snippet) => write!(w, "{snippet}"),
    }
}

pub fn write_closure(w: &mut dyn Write, closure: &Closure) -> fmt::Result {
    let prefix = match closure.kind {
        ClosureKind::Procedure => "proc",
        ClosureKind::Continuation => "cont",
    };
    write!(w, "{prefix}[")?;
    for (i, param) in closure.params.iter().enumerate() {
        if i != 0 {
            w.write_str(", ")?;
        }
        write!(w, "{param}")?;
    }
    w.write_str("] { ")?;
    write_call(w, &closure.body)?;
    w.write_str(" }")
}

pub fn write_call(w: &mut dyn Write, call: &Call) -> fmt::Result {
    write_value(w, &call.procedure)?;
    w.write_char('(')?;
    write_list(w, &call.arguments)?;
    w.write_char(')')?;
    if let Some(frame) = &call.frame {
        w.write_char(' ')?;
        write_frame(w, frame)?;
    }
    Ok(())
}

pub fn write_frame(w: &mut dyn Write, frame: &FrameDescriptor) -> fmt::Result {
    write!(w, "@{}[", frame.position)?;
    write_list(w, &frame.locals)?;
    w.write_str("; ")?;
    write_list(w, &frame.stack)?;
    w.write_char(']')?;
    if let Some(parent) = &frame.parent {
        w.write_str(" <- ")?;
        write_frame(w, parent)?;
    }
    Ok(())
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_call(f, self)
    }
}

impl Display for CirValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

impl Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_closure(f, self)
    }
}

impl Display for FrameDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_frame(f, self)
    }
}
