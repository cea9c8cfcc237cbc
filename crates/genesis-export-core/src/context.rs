//! Export context: a height-pinned handle passed to every collaborator
//! during one export call.

/// A handle pinned at a single committed height.
///
/// One context is built per export call and dropped when the call returns.
/// It is deliberately not `Clone`: every read and write of one export goes
/// through the same handle, so aggregation always observes the height the
/// export was pinned at.
#[derive(Debug)]
pub struct ExportContext {
    height: u64,
}

impl ExportContext {
    /// Pin a new context at the last committed height.
    pub fn pinned(height: u64) -> Self {
        Self { height }
    }

    /// The committed height this context reads at.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Derive a separate context at another height.
    ///
    /// The receiver is left untouched; callers that need a different height
    /// for a sub-step get a new handle instead of rewriting this one.
    pub fn at_height(&self, height: u64) -> Self {
        Self { height }
    }
}
