use cir::{HostHeap, Variables, WordWidth};

use crate::{ExecutionMode, Opts};

/// The state shared by all rules while a compilation unit is optimized.
pub struct CirOptimizer<'a> {
    pub opts: &'a Opts,
    /// The host object graph. Only consulted in [`ExecutionMode::Hosted`].
    pub heap: Option<&'a dyn HostHeap>,
    /// Factory for temporaries introduced by rewrites.
    pub variables: &'a mut Variables,
}

impl<'a> CirOptimizer<'a> {
    pub fn new(opts: &'a Opts, variables: &'a mut Variables) -> CirOptimizer<'a> {
        CirOptimizer { opts, heap: None, variables }
    }

    pub fn with_heap(mut self, heap: &'a dyn HostHeap) -> CirOptimizer<'a> {
        self.heap = Some(heap);
        self
    }

    #[inline]
    pub fn is_hosted(&self) -> bool {
        self.opts.mode == ExecutionMode::Hosted
    }

    #[inline]
    pub fn word_width(&self) -> WordWidth {
        self.opts.word_width
    }

    /// The host object graph if the optimizer runs hosted.
    pub fn host_heap(&self) -> Option<&'a dyn HostHeap> {
        if self.is_hosted() {
            self.heap
        } else {
            None
        }
    }
}
