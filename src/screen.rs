use std::time::{Duration, Instant};

use tracing::{debug, warn};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Screen {
    Starfield,   // Intro stars and messages
    Proposal,    // The question, with yes/no
    Celebration, // Photos and hearts
}

impl Screen {
    /// The only screen each one may hand over to.
    pub fn next(self) -> Option<Screen> {
        match self {
            Screen::Starfield => Some(Screen::Proposal),
            Screen::Proposal => Some(Screen::Celebration),
            Screen::Celebration => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct PendingTransition {
    target: Screen,
    ready_at: Instant,
}

/// Exactly one active screen. A transition first deactivates the current
/// screen, then activates the target once the fade delay has passed.
#[derive(Debug)]
pub struct ScreenManager {
    current: Screen,
    active: bool,
    pending: Option<PendingTransition>,
    delay: Duration,
}

impl ScreenManager {
    pub fn new(delay: Duration) -> Self {
        Self {
            current: Screen::Starfield,
            active: true,
            pending: None,
            delay,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// `false` while a transition is fading.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn in_transition(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin moving to `target`. Refused when it is not the next screen in
    /// the table or another transition is already under way.
    pub fn transition_to(&mut self, target: Screen, now: Instant) -> bool {
        if self.pending.is_some() {
            warn!(?target, "transition already in progress");
            return false;
        }
        if self.current.next() != Some(target) {
            warn!(from = ?self.current, to = ?target, "transition not allowed");
            return false;
        }
        debug!(from = ?self.current, to = ?target, "screen transition started");
        self.active = false;
        self.pending = Some(PendingTransition { target, ready_at: now + self.delay });
        true
    }

    /// Finish a due transition. Returns the newly active screen, once.
    pub fn poll(&mut self, now: Instant) -> Option<Screen> {
        let pending = self.pending?;
        if now < pending.ready_at {
            return None;
        }
        self.pending = None;
        self.current = pending.target;
        self.active = true;
        debug!(screen = ?self.current, "screen active");
        Some(self.current)
    }
}
