//! Preview render bookkeeping
//!
//! Rendering may complete asynchronously. Each request carries a generation;
//! a result is applied only if no newer request (or a hide) happened since.

/// Content handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub generation: u64,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    generation: u64,
    /// Show the pane once the current request completes
    show_on_complete: bool,
    /// Buffer changed since the last applied render
    stale: bool,
}

impl PreviewState {
    pub fn begin(&mut self, source: String, show: bool) -> PreviewRequest {
        self.generation += 1;
        self.show_on_complete = show;
        PreviewRequest {
            generation: self.generation,
            source,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Mark a completed render; returns whether the pane should now be shown
    pub fn complete(&mut self) -> bool {
        self.stale = false;
        std::mem::take(&mut self.show_on_complete)
    }

    /// A request started with `show` is still in flight
    pub fn is_show_pending(&self) -> bool {
        self.show_on_complete
    }

    /// The current request failed; it will not show the pane
    pub fn abandon(&mut self) {
        self.show_on_complete = false;
    }

    /// Drop any in-flight request
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.show_on_complete = false;
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
