use stdx::impl_debug_display;

/// Runtime routines that are called like builtins but implemented by the runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Snippet {
    /// `(k, k)`: creates an arithmetic exception and passes it to `k`.
    CreateArithmeticException,
}

impl Snippet {
    pub fn arity(self) -> usize {
        match self {
            Snippet::CreateArithmeticException => 2,
        }
    }
}

impl_debug_display! {
    match Snippet{
        Snippet::CreateArithmeticException => "CreateArithmeticException";
    }
}
