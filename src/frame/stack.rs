//! Frame stack with its breadcrumb trail.

use crate::frame::Frame;

/// Ordered stack of frames; breadcrumbs always mirror the frames one to one.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
    breadcrumbs: Vec<String>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.breadcrumbs.push(frame.name.clone());
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.breadcrumbs.pop();
        Some(frame)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.breadcrumbs.clear();
    }

    /// Borrow the top frame.
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Independent copy of the top frame; `None` at root.
    ///
    /// Callers may mutate the copy freely, the stack never observes it.
    pub fn current(&self) -> Option<Frame> {
        self.frames.last().cloned()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
