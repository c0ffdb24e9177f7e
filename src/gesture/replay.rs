use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::drop_target::RowBounds;
use super::recognizer::{GestureRecognizer, TerminalAction};
use super::timer::TimerToken;
use super::{GestureConfig, Point};

/// One recorded pointer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Advance the virtual clock
    Wait { ms: u64 },
    /// Tracking lost
    Abort,
}

/// A recorded gesture over one row of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayInput {
    #[serde(default)]
    pub rows: Vec<RowBounds>,
    #[serde(default)]
    pub origin_index: usize,
    pub events: Vec<InputEvent>,
}

/// Drive a recognizer through a recorded stream with a virtual clock.
///
/// The long-press token fires as soon as accumulated `wait` time reaches
/// its delay. Returns the first terminal action produced, if any.
pub fn replay(config: &GestureConfig, input: &ReplayInput) -> Option<TerminalAction> {
    let mut recognizer = GestureRecognizer::new(config.clone());
    let mut pending: Option<(TimerToken, Duration)> = None;

    for event in &input.events {
        match *event {
            InputEvent::Down { x, y } => {
                pending = recognizer
                    .begin(Point::new(x, y), input.origin_index, input.rows.clone())
                    .map(|token| (token, Duration::ZERO));
            }
            InputEvent::Move { x, y } => {
                recognizer.sample(Point::new(x, y));
            }
            InputEvent::Up { x, y } => {
                if let Some(action) = recognizer.end(Some(Point::new(x, y))) {
                    return Some(action);
                }
                pending = None;
            }
            InputEvent::Wait { ms } => {
                if let Some((token, elapsed)) = pending.as_mut() {
                    *elapsed += Duration::from_millis(ms);
                    if *elapsed >= token.delay {
                        let token = *token;
                        pending = None;
                        if let Some(action) = recognizer.fire_long_press(token) {
                            return Some(action);
                        }
                    }
                }
            }
            InputEvent::Abort => {
                recognizer.abort();
                pending = None;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> ReplayInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn swipe_stream() {
        let input = input(
            r#"{"events": [
                {"type": "down", "x": 0, "y": 0},
                {"type": "move", "x": -70, "y": 1},
                {"type": "up", "x": -130, "y": 2}
            ]}"#,
        );
        assert_eq!(replay(&GestureConfig::default(), &input), Some(TerminalAction::Delete));
    }

    #[test]
    fn long_press_after_wait() {
        let input = input(
            r#"{"events": [
                {"type": "down", "x": 0, "y": 0},
                {"type": "wait", "ms": 300},
                {"type": "move", "x": 3, "y": 3},
                {"type": "wait", "ms": 250},
                {"type": "up", "x": 3, "y": 3}
            ]}"#,
        );
        assert_eq!(
            replay(&GestureConfig::default(), &input),
            Some(TerminalAction::OpenDetail)
        );
    }

    #[test]
    fn short_hold_cancels() {
        let input = input(
            r#"{"events": [
                {"type": "down", "x": 0, "y": 0},
                {"type": "wait", "ms": 400},
                {"type": "up", "x": 0, "y": 0}
            ]}"#,
        );
        assert_eq!(replay(&GestureConfig::default(), &input), Some(TerminalAction::Cancel));
    }

    #[test]
    fn reorder_stream() {
        let input = input(
            r#"{
                "rows": [
                    {"index": 0, "top": -25, "bottom": 25},
                    {"index": 1, "top": 25, "bottom": 75},
                    {"index": 2, "top": 75, "bottom": 125}
                ],
                "origin_index": 0,
                "events": [
                    {"type": "down", "x": 0, "y": 0},
                    {"type": "move", "x": 3, "y": 40},
                    {"type": "move", "x": 3, "y": 90},
                    {"type": "up", "x": 3, "y": 90}
                ]
            }"#,
        );
        assert_eq!(
            replay(&GestureConfig::default(), &input),
            Some(TerminalAction::Reorder { from: 0, to: 2 })
        );
    }

    #[test]
    fn aborted_stream_has_no_action() {
        let input = input(
            r#"{"events": [
                {"type": "down", "x": 0, "y": 0},
                {"type": "move", "x": -200, "y": 0},
                {"type": "abort"},
                {"type": "wait", "ms": 1000}
            ]}"#,
        );
        assert_eq!(replay(&GestureConfig::default(), &input), None);
    }
}
