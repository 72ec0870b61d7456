//! The `Action` trait — the body of one periodic firing.

use crate::{ProcessContext, ProcessResult};

/// Work done each time a periodic process fires.
///
/// Implemented for every `FnMut(&mut ProcessContext<'_>) -> ProcessResult<()>`
/// closure, so most callers never name this trait.
pub trait Action {
    fn run(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<()>;
}

impl<F> Action for F
where
    F: FnMut(&mut ProcessContext<'_>) -> ProcessResult<()>,
{
    #[inline]
    fn run(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<()> {
        self(ctx)
    }
}
