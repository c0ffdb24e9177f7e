use serde::Serialize;

use super::drop_target::{RowBounds, find_drop_target};
use super::timer::{LongPressTimer, TimerToken};
use super::{GestureConfig, Point};

/// The single outcome of a completed gesture stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TerminalAction {
    /// Swipe left past the threshold
    Delete,
    /// Drag dropped on another row; positions are view rows
    Reorder { from: usize, to: usize },
    /// Long press fired
    OpenDetail,
    Cancel,
}

/// Recognizer state. Once a direction locks it is never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sampling,
    Horizontal,
    Vertical,
    LongPress,
    Resolved(TerminalAction),
}

/// Visual feedback for the row after a move sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    None,
    /// Horizontal offset; `armed` once a leftward swipe passes the feedback ratio
    Swipe { offset: f64, armed: bool },
    /// Vertical offset and the provisional drop row
    Drag { offset: f64, target: Option<usize> },
}

/// Per-row gesture state machine.
///
/// Driven by the host: [`begin`](Self::begin) on pointer down, [`sample`](Self::sample)
/// on every move, [`end`](Self::end) on pointer up and [`abort`](Self::abort) when
/// tracking is lost. The long-press timer is scheduled by the host with the token
/// returned from `begin` and delivered through [`fire_long_press`](Self::fire_long_press).
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    phase: Phase,
    origin: Point,
    current: Point,
    origin_index: usize,
    rows: Vec<RowBounds>,
    drop_target: Option<usize>,
    timer: LongPressTimer,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        let timer = LongPressTimer::new(config.long_press());
        GestureRecognizer {
            config,
            phase: Phase::Idle,
            origin: Point::default(),
            current: Point::default(),
            origin_index: 0,
            rows: Vec::new(),
            drop_target: None,
            timer,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome of the last completed stream, if any
    pub fn resolution(&self) -> Option<TerminalAction> {
        match self.phase {
            Phase::Resolved(action) => Some(action),
            _ => None,
        }
    }

    /// Start a new stream at `at` for the row at `origin_index`.
    ///
    /// `rows` are the bounds of every row in the view (the dragged row
    /// included) and are used for drop-target lookup. Returns the long-press
    /// token to schedule, if long press is enabled.
    pub fn begin(&mut self, at: Point, origin_index: usize, rows: Vec<RowBounds>) -> Option<TimerToken> {
        self.timer.cancel();
        self.phase = Phase::Sampling;
        self.origin = at;
        self.current = at;
        self.origin_index = origin_index;
        self.rows = rows;
        self.drop_target = None;
        self.config.enable_long_press.then(|| self.timer.arm())
    }

    /// Feed one move sample.
    pub fn sample(&mut self, at: Point) -> Feedback {
        match self.phase {
            Phase::Sampling | Phase::Horizontal | Phase::Vertical => {}
            Phase::Idle | Phase::LongPress | Phase::Resolved(_) => return Feedback::None,
        }
        self.current = at;
        let dx = at.x - self.origin.x;
        let dy = at.y - self.origin.y;

        if self.phase == Phase::Sampling {
            self.lock_direction(dx, dy);
        }

        match self.phase {
            Phase::Horizontal if self.config.enable_swipe => Feedback::Swipe {
                offset: dx,
                armed: dx < 0.0
                    && -dx > self.config.swipe_threshold * self.config.swipe_feedback_ratio,
            },
            Phase::Vertical if self.config.enable_reorder => {
                self.drop_target =
                    find_drop_target(&self.rows, self.origin_index, at.y, self.drop_target);
                Feedback::Drag {
                    offset: dy,
                    target: self.drop_target,
                }
            }
            _ => Feedback::None,
        }
    }

    fn lock_direction(&mut self, dx: f64, dy: f64) {
        let jitter = self.config.jitter_tolerance;
        let (ax, ay) = (dx.abs(), dy.abs());
        if ax > jitter || ay > jitter {
            self.timer.cancel();
        }
        if ax > jitter && ax > ay {
            self.phase = Phase::Horizontal;
        } else if ay > jitter && ay > ax {
            self.phase = Phase::Vertical;
        }
    }

    /// Deliver a scheduled long-press callback.
    ///
    /// Returns `OpenDetail` only if `token` is still the active arming and no
    /// direction has locked. Movement after this point is ignored.
    pub fn fire_long_press(&mut self, token: TimerToken) -> Option<TerminalAction> {
        if self.phase != Phase::Sampling || !self.timer.take(token) {
            return None;
        }
        self.phase = Phase::LongPress;
        tracing::debug!(origin = self.origin_index, "long press");
        Some(TerminalAction::OpenDetail)
    }

    /// End the stream, optionally with a final position.
    ///
    /// Returns the terminal action, or `None` when there was no stream or the
    /// action was already delivered by [`fire_long_press`](Self::fire_long_press).
    pub fn end(&mut self, at: Option<Point>) -> Option<TerminalAction> {
        if let Some(at) = at {
            self.sample(at);
        }
        self.timer.cancel();

        let dx = self.current.x - self.origin.x;
        let (action, delivered) = match self.phase {
            Phase::Idle | Phase::Resolved(_) => return None,
            Phase::LongPress => (TerminalAction::OpenDetail, true),
            Phase::Sampling => (TerminalAction::Cancel, false),
            Phase::Horizontal => {
                if self.config.enable_swipe && dx < -self.config.swipe_threshold {
                    (TerminalAction::Delete, false)
                } else {
                    (TerminalAction::Cancel, false)
                }
            }
            Phase::Vertical => match self.drop_target {
                Some(to) if self.config.enable_reorder && to != self.origin_index => (
                    TerminalAction::Reorder {
                        from: self.origin_index,
                        to,
                    },
                    false,
                ),
                _ => (TerminalAction::Cancel, false),
            },
        };

        self.phase = Phase::Resolved(action);
        tracing::debug!(?action, origin = self.origin_index, "gesture resolved");
        (!delivered).then_some(action)
    }

    /// Tracking was lost without a terminating sample: reset, no action.
    pub fn abort(&mut self) {
        self.timer.cancel();
        self.phase = Phase::Idle;
        self.drop_target = None;
    }
}
