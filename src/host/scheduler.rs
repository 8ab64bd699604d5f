//! Frame scheduling
//!
//! Request-on-next-repaint / cancel-pending, the way a browser exposes its
//! repaint scheduler. At most one frame is outstanding at a time.

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-provided repaint scheduler
pub trait FrameScheduler: Send {
    /// Request a callback on the next repaint
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by an external repaint tick
///
/// The host loop calls [`TickScheduler::take_due`] on every tick and runs
/// the frame routine only when a frame was requested and not cancelled.
#[derive(Debug, Default)]
pub struct TickScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl TickScheduler {
    /// Create a scheduler with nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending frame, if any, for this repaint tick
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Frame currently waiting for a repaint tick
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total frames requested
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled before they ran
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for TickScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
