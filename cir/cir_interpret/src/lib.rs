//! A reference interpreter for CIR.
//!
//! The interpreter executes a procedure closure by trampolining: every step applies one
//! procedure to already evaluated arguments, so no Rust stack is consumed by the
//! continuation passing style. Builtins are executed with their compile time semantics and
//! pointer loads through host objects read the [`HostHeap`].

use std::fmt;
use std::rc::Rc;

use cir::{
    Builtin, BuiltinFlags, Call, CirSwitch, CirValue, Closure, FoldingError,
    HostHeap, Snippet, Value, Variable,
};
use thiserror::Error;


/// An exception raised by an executed term.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Throwable {
    Arithmetic,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Returned(Value),
    Threw(Throwable),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Returned(val) => write!(f, "returned {val}"),
            Outcome::Threw(throwable) => write!(f, "threw {throwable:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("{0} is not bound")]
    UnboundVariable(Variable),

    #[error("{0} can not be called")]
    NotAProcedure(String),

    #[error("expected {expected} arguments but found {found}")]
    Arity { expected: usize, found: usize },

    #[error("{0} can not be interpreted")]
    Unsupported(Builtin),

    #[error("a {0} was used where a value was expected")]
    NotAValue(String),

    #[error("execution did not finish within {0} steps")]
    StepLimit(usize),

    #[error(transparent)]
    Folding(#[from] FoldingError),
}

/// A runtime value.
#[derive(Clone)]
enum Data<'a> {
    Value(Value),
    Throwable(Throwable),
    Closure(&'a Closure, Env<'a>),
    Callee(&'a CirValue),
    /// The normal continuation of the executed procedure.
    Halt,
    /// The exception continuation of the executed procedure.
    Raise,
}

impl Data<'_> {
    fn describe(&self) -> String {
        match self {
            Data::Value(val) => val.to_string(),
            Data::Throwable(throwable) => format!("{throwable:?}"),
            Data::Closure(closure, _) => closure.to_string(),
            Data::Callee(callee) => callee.to_string(),
            Data::Halt => "halt".to_owned(),
            Data::Raise => "raise".to_owned(),
        }
    }

    fn value(&self) -> Result<Value, InterpretError> {
        match self {
            Data::Value(val) => Ok(*val),
            _ => Err(InterpretError::NotAValue(self.describe())),
        }
    }
}

struct Frame<'a> {
    bindings: Vec<(Variable, Data<'a>)>,
    parent: Env<'a>,
}

/// Variables are only bound once, so environments can be shared between closures.
#[derive(Clone, Default)]
struct Env<'a>(Option<Rc<Frame<'a>>>);

impl<'a> Env<'a> {
    fn bind(&self, bindings: Vec<(Variable, Data<'a>)>) -> Env<'a> {
        Env(Some(Rc::new(Frame { bindings, parent: self.clone() })))
    }

    fn lookup(&self, var: Variable) -> Result<Data<'a>, InterpretError> {
        let mut env = self;
        while let Some(frame) = &env.0 {
            if let Some((_, data)) = frame.bindings.iter().find(|(it, _)| *it == var) {
                return Ok(data.clone());
            }
            env = &frame.parent;
        }
        Err(InterpretError::UnboundVariable(var))
    }
}

pub struct Interpreter<'a> {
    heap: Option<&'a dyn HostHeap>,
    step_limit: usize,
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Interpreter::new()
    }
}

enum Step<'a> {
    Apply(Data<'a>, Vec<Data<'a>>),
    Done(Outcome),
}

impl<'a> Interpreter<'a> {
    pub const DEFAULT_STEP_LIMIT: usize = 100_000;

    pub fn new() -> Interpreter<'a> {
        Interpreter { heap: None, step_limit: Self::DEFAULT_STEP_LIMIT }
    }

    pub fn with_heap(mut self, heap: &'a dyn HostHeap) -> Interpreter<'a> {
        self.heap = Some(heap);
        self
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Interpreter<'a> {
        self.step_limit = step_limit;
        self
    }

    /// Executes `procedure` with `args`. The last two parameters of `procedure` receive the
    /// continuations that end execution.
    pub fn execute(
        &self,
        procedure: &'a Closure,
        args: &[Value],
    ) -> Result<Outcome, InterpretError> {
        let mut args: Vec<_> = args.iter().map(|val| Data::Value(*val)).collect();
        args.push(Data::Halt);
        args.push(Data::Raise);
        let mut step = Step::Apply(Data::Closure(procedure, Env::default()), args);

        for _ in 0..self.step_limit {
            step = match step {
                Step::Apply(callee, args) => self.apply(callee, args)?,
                Step::Done(outcome) => return Ok(outcome),
            }
        }

        match step {
            Step::Done(outcome) => Ok(outcome),
            Step::Apply(..) => Err(InterpretError::StepLimit(self.step_limit)),
        }
    }

    fn eval(&self, val: &'a CirValue, env: &Env<'a>) -> Result<Data<'a>, InterpretError> {
        let data = match val {
            CirValue::Constant(val) => Data::Value(*val),
            CirValue::Variable(var) => env.lookup(*var)?,
            CirValue::Closure(closure) => Data::Closure(closure, env.clone()),
            CirValue::Builtin(_) | CirValue::Switch(_) | CirValue::Snippet(_) => Data::Callee(val),
        };
        Ok(data)
    }

    fn enter(&self, call: &'a Call, env: &Env<'a>) -> Result<Step<'a>, InterpretError> {
        let callee = self.eval(&call.procedure, env)?;
        let args =
            call.arguments.iter().map(|arg| self.eval(arg, env)).collect::<Result<_, _>>()?;
        Ok(Step::Apply(callee, args))
    }

    fn apply(&self, callee: Data<'a>, mut args: Vec<Data<'a>>) -> Result<Step<'a>, InterpretError> {
        let step = match callee {
            Data::Closure(closure, env) => {
                check_arity(closure.params.len(), args.len())?;
                let env = env.bind(closure.params.iter().copied().zip(args).collect());
                self.enter(&closure.body, &env)?
            }
            Data::Halt => {
                let res = match &*args {
                    [] => Value::Void,
                    [val] => val.value()?,
                    _ => return Err(InterpretError::Arity { expected: 1, found: args.len() }),
                };
                Step::Done(Outcome::Returned(res))
            }
            Data::Raise => match &*args {
                [Data::Throwable(throwable)] => Step::Done(Outcome::Threw(*throwable)),
                _ => return Err(InterpretError::NotAProcedure("raise".to_owned())),
            },
            Data::Callee(CirValue::Builtin(builtin)) => {
                check_arity(builtin.builtin.arity(), args.len())?;
                let e = args.pop().unwrap_or(Data::Raise);
                let k = args.pop().unwrap_or(Data::Halt);
                self.apply_builtin(builtin.builtin, &args, k, e)?
            }
            Data::Callee(CirValue::Switch(switch)) => self.apply_switch(switch, args)?,
            Data::Callee(CirValue::Snippet(Snippet::CreateArithmeticException)) => {
                check_arity(Snippet::CreateArithmeticException.arity(), args.len())?;
                let k = args.swap_remove(0);
                Step::Apply(k, vec![Data::Throwable(Throwable::Arithmetic)])
            }
            callee => return Err(InterpretError::NotAProcedure(callee.describe())),
        };
        Ok(step)
    }

    fn apply_builtin(
        &self,
        builtin: Builtin,
        params: &[Data<'a>],
        k: Data<'a>,
        e: Data<'a>,
    ) -> Result<Step<'a>, InterpretError> {
        let values = params.iter().map(Data::value).collect::<Result<Vec<_>, _>>()?;

        let res = if let Some(load) = builtin.load() {
            let heap = self.heap.ok_or(InterpretError::Unsupported(builtin))?;
            heap.load(load, &values)
        } else if matches!(
            builtin,
            Builtin::SoftSafepoint | Builtin::HardSafepoint | Builtin::BarMemory
        ) {
            Ok(Value::Void)
        } else if builtin.flags().contains(BuiltinFlags::NON_FOLDABLE) {
            return Err(InterpretError::Unsupported(builtin));
        } else {
            builtin.evaluate(&values)
        };

        let step = match res {
            Ok(Value::Void) => Step::Apply(k, Vec::new()),
            Ok(val) => Step::Apply(k, vec![Data::Value(val)]),
            Err(FoldingError::DivisionByZero) => {
                log::trace!("{builtin} raised an arithmetic exception");
                Step::Apply(e, vec![Data::Throwable(Throwable::Arithmetic)])
            }
            Err(err) => return Err(err.into()),
        };
        Ok(step)
    }

    fn apply_switch(
        &self,
        switch: &CirSwitch,
        mut args: Vec<Data<'a>>,
    ) -> Result<Step<'a>, InterpretError> {
        check_arity(switch.arity(), args.len())?;
        let tag = args[0].value()?;
        let matches =
            args[1..=switch.matches].iter().map(Data::value).collect::<Result<Vec<_>, _>>()?;
        let target = switch
            .select(&tag, &matches)
            .ok_or_else(|| InterpretError::NotAValue(format!("{switch} operand {tag}")))?;
        Ok(Step::Apply(args.swap_remove(target), Vec::new()))
    }
}

fn check_arity(expected: usize, found: usize) -> Result<(), InterpretError> {
    if expected == found {
        Ok(())
    } else {
        Err(InterpretError::Arity { expected, found })
    }
}
