//! Display-refresh tick scheduling.

/// Identifies one requested tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// One callback slot per display refresh.
pub trait TickScheduler {
    /// Queue a tick for the next display refresh.
    fn request_tick(&mut self) -> TickHandle;
    /// Drop a queued tick. Unknown or already-fired handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// Queue of ticks, drained once per display refresh by the frame loop.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    queued: Vec<TickHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tick due at this refresh. Ticks requested while these are
    /// being handled land in the next refresh.
    pub fn take_due(&mut self) -> Vec<TickHandle> {
        std::mem::take(&mut self.queued)
    }

    pub fn pending(&self) -> usize {
        self.queued.len()
    }
}

impl TickScheduler for FrameScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.queued.push(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.queued.retain(|h| *h != handle);
    }
}
