/// Handle for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId(u64);

/// Single-flight frame scheduling: at most one frame is pending, and
/// scheduling again supersedes whatever was pending before.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next: u64,
    pending: Option<FrameId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self) -> FrameId {
        self.next += 1;
        let id = FrameId(self.next);
        self.pending = Some(id);
        id
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume `id` if it is the pending frame. Stale ids are rejected.
    pub fn take(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
