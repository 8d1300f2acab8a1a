//! CIR terms.
//!
//! A term is a [`Call`]: a procedure applied to arguments. Procedures and arguments are
//! [`CirValue`]s. Closures bind [`Variable`]s and are either procedures (taking a normal and an
//! exception continuation as their last two parameters) or continuations.

use stdx::{impl_debug_display, impl_idx_from};
use typed_index_collections::TiVec;

use crate::{BuiltinRef, CirSwitch, Kind, Snippet, Value};


/// A variable bound by a closure. Variables are identified by their index into [`Variables`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(u32);
impl_idx_from!(Variable(u32));
impl_debug_display! {var @ Variable => "v{}", var.0}

/// Creates the variables of a compilation unit.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    kinds: TiVec<Variable, Kind>,
}

impl Variables {
    pub fn new() -> Variables {
        Variables::default()
    }

    pub fn new_variable(&mut self, kind: Kind) -> Variable {
        self.kinds.push_and_get_key(kind)
    }

    /// Creates the variables binding the normal and the exception continuation of a procedure.
    pub fn new_continuations(&mut self) -> (Variable, Variable) {
        let k = self.kinds.push_and_get_key(Kind::Void);
        let e = self.kinds.push_and_get_key(Kind::Void);
        (k, e)
    }

    #[inline]
    pub fn kind(&self, var: Variable) -> Kind {
        self.kinds[var]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ClosureKind {
    Procedure,
    Continuation,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Closure {
    pub kind: ClosureKind,
    pub params: Vec<Variable>,
    pub body: Call,
}

impl Closure {
    pub fn procedure(params: Vec<Variable>, body: Call) -> Closure {
        Closure { kind: ClosureKind::Procedure, params, body }
    }

    pub fn continuation(params: Vec<Variable>, body: Call) -> Closure {
        Closure { kind: ClosureKind::Continuation, params, body }
    }

    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.kind == ClosureKind::Continuation
    }

    /// Returns the parameter of a continuation that binds exactly one value.
    pub fn single_param(&self) -> Option<Variable> {
        match *self.params {
            [param] if self.is_continuation() => Some(param),
            _ => None,
        }
    }
}

/// Debugging information attached to a call. Frame descriptors reference values (for example
/// the live locals at a bytecode position) but do not count as uses for data flow.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameDescriptor {
    pub position: u32,
    pub locals: Vec<CirValue>,
    pub stack: Vec<CirValue>,
    pub parent: Option<Box<FrameDescriptor>>,
}

impl FrameDescriptor {
    pub fn new(position: u32, locals: Vec<CirValue>, stack: Vec<CirValue>) -> FrameDescriptor {
        FrameDescriptor { position, locals, stack, parent: None }
    }

    pub fn uses(&self, var: Variable) -> bool {
        self.locals.iter().chain(&self.stack).any(|val| val.uses(var, true))
            || self.parent.as_ref().map_or(false, |parent| parent.uses(var))
    }

    pub fn use_count(&self, var: Variable) -> usize {
        self.locals.iter().chain(&self.stack).map(|val| val.use_count(var)).sum::<usize>()
            + self.parent.as_ref().map_or(0, |parent| parent.use_count(var))
    }

    /// Replaces every reference to `var` with `replacement`.
    pub fn retarget(&mut self, var: Variable, replacement: &CirValue) {
        for val in self.locals.iter_mut().chain(&mut self.stack) {
            val.substitute(var, replacement);
        }
        if let Some(parent) = &mut self.parent {
            parent.retarget(var, replacement)
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CirValue {
    Constant(Value),
    Variable(Variable),
    Closure(Box<Closure>),
    Builtin(BuiltinRef),
    Switch(CirSwitch),
    Snippet(Snippet),
}

impl CirValue {
    #[inline]
    pub fn int(val: i32) -> CirValue {
        CirValue::Constant(Value::Int(val))
    }

    #[inline]
    pub fn long(val: i64) -> CirValue {
        CirValue::Constant(Value::Long(val))
    }

    #[inline]
    pub fn word(val: u64) -> CirValue {
        CirValue::Constant(Value::Word(val))
    }

    pub fn as_constant(&self) -> Option<&Value> {
        if let CirValue::Constant(val) = self {
            Some(val)
        } else {
            None
        }
    }

    pub fn as_variable(&self) -> Option<Variable> {
        if let CirValue::Variable(var) = *self {
            Some(var)
        } else {
            None
        }
    }

    pub fn as_closure(&self) -> Option<&Closure> {
        if let CirValue::Closure(closure) = self {
            Some(closure)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, CirValue::Constant(_))
    }

    /// Whether `var` occurs in this value. References from frame descriptors inside closures
    /// are only considered if `include_frames` is set.
    pub fn uses(&self, var: Variable, include_frames: bool) -> bool {
        match self {
            CirValue::Variable(it) => *it == var,
            CirValue::Closure(closure) => closure.body.uses(var, include_frames),
            _ => false,
        }
    }

    /// Number of occurrences of `var` in this value (frame descriptors included).
    pub fn use_count(&self, var: Variable) -> usize {
        match self {
            CirValue::Variable(it) => (*it == var) as usize,
            CirValue::Closure(closure) => closure.body.use_count(var),
            _ => 0,
        }
    }

    /// Replaces every occurrence of `var` (frame descriptors included) with `replacement`.
    pub fn substitute(&mut self, var: Variable, replacement: &CirValue) {
        match self {
            CirValue::Variable(it) if *it == var => *self = replacement.clone(),
            CirValue::Closure(closure) => closure.body.substitute(var, replacement),
            _ => (),
        }
    }
}

impl From<Value> for CirValue {
    fn from(val: Value) -> CirValue {
        CirValue::Constant(val)
    }
}

impl From<Variable> for CirValue {
    fn from(var: Variable) -> CirValue {
        CirValue::Variable(var)
    }
}

impl From<Closure> for CirValue {
    fn from(closure: Closure) -> CirValue {
        CirValue::Closure(Box::new(closure))
    }
}

impl From<BuiltinRef> for CirValue {
    fn from(builtin: BuiltinRef) -> CirValue {
        CirValue::Builtin(builtin)
    }
}

impl From<crate::Builtin> for CirValue {
    fn from(builtin: crate::Builtin) -> CirValue {
        CirValue::Builtin(builtin.into())
    }
}

impl From<CirSwitch> for CirValue {
    fn from(switch: CirSwitch) -> CirValue {
        CirValue::Switch(switch)
    }
}

impl From<Snippet> for CirValue {
    fn from(snippet: Snippet) -> CirValue {
        CirValue::Snippet(snippet)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Call {
    pub procedure: CirValue,
    pub arguments: Vec<CirValue>,
    pub frame: Option<Box<FrameDescriptor>>,
}

impl Call {
    pub fn new(procedure: impl Into<CirValue>, arguments: Vec<CirValue>) -> Call {
        Call { procedure: procedure.into(), arguments, frame: None }
    }

    pub fn with_frame(mut self, frame: FrameDescriptor) -> Call {
        self.frame = Some(Box::new(frame));
        self
    }

    /// The builtin called by this call, if any.
    pub fn builtin(&self) -> Option<BuiltinRef> {
        if let CirValue::Builtin(builtin) = self.procedure {
            Some(builtin)
        } else {
            None
        }
    }

    pub fn uses(&self, var: Variable, include_frames: bool) -> bool {
        self.procedure.uses(var, include_frames)
            || self.arguments.iter().any(|arg| arg.uses(var, include_frames))
            || (include_frames && self.frame.as_ref().map_or(false, |frame| frame.uses(var)))
    }

    pub fn use_count(&self, var: Variable) -> usize {
        let frame = self.frame.as_ref().map_or(0, |frame| frame.use_count(var));
        self.procedure.use_count(var)
            + self.arguments.iter().map(|arg| arg.use_count(var)).sum::<usize>()
            + frame
    }

    pub fn substitute(&mut self, var: Variable, replacement: &CirValue) {
        self.procedure.substitute(var, replacement);
        for arg in &mut self.arguments {
            arg.substitute(var, replacement);
        }
        if let Some(frame) = &mut self.frame {
            frame.retarget(var, replacement)
        }
    }
}

/// Splits the arguments of a call to a builtin into its parameters, the normal continuation
/// and the exception continuation.
///
/// # Panics
///
/// Panics if there are fewer than two arguments.
pub fn split_continuations(args: &[CirValue]) -> (&[CirValue], &CirValue, &CirValue) {
    match args {
        [params @ .., k, e] => (params, k, e),
        _ => panic!("a call to a builtin must receive a normal and an exception continuation"),
    }
}
