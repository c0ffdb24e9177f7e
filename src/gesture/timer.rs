use std::time::Duration;

/// Handle for one arming of the long-press timer.
///
/// The host schedules a callback after `delay` and hands the token back to
/// the recognizer. Only the token from the most recent arming, and only
/// while it has not been cancelled, has any effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    generation: u64,
    pub delay: Duration,
}

/// Generation-checked, cancellable single-shot timer state
#[derive(Debug, Clone)]
pub struct LongPressTimer {
    delay: Duration,
    generation: u64,
    active: Option<u64>,
}

impl LongPressTimer {
    pub fn new(delay: Duration) -> Self {
        LongPressTimer {
            delay,
            generation: 0,
            active: None,
        }
    }

    /// Arm the timer, invalidating any earlier token.
    pub fn arm(&mut self) -> TimerToken {
        self.generation += 1;
        self.active = Some(self.generation);
        TimerToken {
            generation: self.generation,
            delay: self.delay,
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_active(&self, token: TimerToken) -> bool {
        self.active == Some(token.generation)
    }

    /// Consume the firing of `token`. Returns false for stale or cancelled tokens.
    pub fn take(&mut self, token: TimerToken) -> bool {
        if self.is_active(token) {
            self.active = None;
            true
        } else {
            false
        }
    }
}
