//! Pointer gesture recognition for interactive list rows.
//!
//! One [`GestureRecognizer`] per row classifies a down/move*/up stream as a
//! horizontal swipe (delete), a vertical drag (reorder), a long press (open
//! detail) or nothing, and yields a single [`TerminalAction`].

pub mod drop_target;
pub mod recognizer;
pub mod replay;
pub mod timer;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use drop_target::RowBounds;
pub use recognizer::{Feedback, GestureRecognizer, Phase, TerminalAction};
pub use timer::{LongPressTimer, TimerToken};

/// A pointer position in row-container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Tuning for the recognizer. Every threshold is in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Displacement an axis must exceed before a direction can lock
    pub jitter_tolerance: f64,
    /// Leftward displacement past which a swipe deletes
    pub swipe_threshold: f64,
    /// Fraction of `swipe_threshold` after which the row shows delete feedback
    pub swipe_feedback_ratio: f64,
    pub long_press_ms: u64,
    pub enable_swipe: bool,
    pub enable_reorder: bool,
    pub enable_long_press: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            jitter_tolerance: 10.0,
            swipe_threshold: 120.0,
            swipe_feedback_ratio: 0.6,
            long_press_ms: 500,
            enable_swipe: true,
            enable_reorder: true,
            enable_long_press: true,
        }
    }
}

impl GestureConfig {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}
