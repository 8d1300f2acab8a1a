use cir::WordWidth;

/// Whether the optimizer runs inside the system it compiles for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ExecutionMode {
    /// Cross compilation: only the compile time semantics of builtins may be used.
    #[default]
    Target,
    /// The optimizer runs hosted and may read the host object graph.
    Hosted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opts {
    pub mode: ExecutionMode,
    /// Width of a machine word on the target platform.
    pub word_width: WordWidth,
    /// Upper bound for the number of passes of the optimizer driver.
    pub max_iterations: u32,
}

impl Default for Opts {
    fn default() -> Opts {
        Opts { mode: ExecutionMode::Target, word_width: WordWidth::W64, max_iterations: 16 }
    }
}

impl Opts {
    pub fn hosted() -> Opts {
        Opts { mode: ExecutionMode::Hosted, ..Opts::default() }
    }
}
