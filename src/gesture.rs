//! Touch-style gesture recognition over pointer events.
//!
//! Terminal mouse events stand in for touch input: a press and release
//! in place is a tap, a press held without moving is a hold, and a
//! vertical drag is a swipe. Swipes are throttled so one long drag does
//! not spin the clock.

use crossterm::event::{MouseButton, MouseEventKind};
use std::time::{Duration, Instant};

/// How long a press must last, unmoved, to count as a hold.
pub const HOLD_DURATION: Duration = Duration::from_millis(500);

/// Minimum time between two recognized swipes.
pub const SWIPE_THROTTLE: Duration = Duration::from_millis(150);

/// Rows a drag must cover vertically to count as a swipe.
pub const SWIPE_ROWS: u16 = 1;

/// What a pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    WheelUp,
    WheelDown,
}

/// A pointer event with its position in cells and arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Cell column.
    pub column: u16,
    /// Cell row.
    pub row: u16,
    /// When the event happened.
    pub at: Instant,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, column: u16, row: u16, at: Instant) -> Self {
        Self {
            kind,
            column,
            row,
            at,
        }
    }

    /// Converts a crossterm mouse event; only the left button and the
    /// wheel take part in gestures.
    pub fn from_mouse(kind: MouseEventKind, column: u16, row: u16, at: Instant) -> Option<Self> {
        let kind = match kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            MouseEventKind::ScrollUp => PointerKind::WheelUp,
            MouseEventKind::ScrollDown => PointerKind::WheelDown,
            _ => return None,
        };
        Some(Self::new(kind, column, row, at))
    }
}

/// A recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Hold,
    SwipeUp,
    SwipeDown,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    column: u16,
    row: u16,
    at: Instant,
    moved: bool,
    held: bool,
}

/// Classifies pointer events into [`Gesture`]s.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    /// How long a press must last to become a hold.
    pub hold_duration: Duration,
    /// Minimum time between two swipes.
    pub swipe_throttle: Duration,
    /// Rows a drag must cover to swipe.
    pub swipe_rows: u16,
    press: Option<Press>,
    last_swipe: Option<Instant>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self {
            hold_duration: HOLD_DURATION,
            swipe_throttle: SWIPE_THROTTLE,
            swipe_rows: SWIPE_ROWS,
            press: None,
            last_swipe: None,
        }
    }
}

impl GestureRecognizer {
    /// A recognizer with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press is in progress.
    pub fn pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Feeds one event, returning the gesture it completes, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event.kind {
            PointerKind::Down => {
                self.press = Some(Press {
                    column: event.column,
                    row: event.row,
                    at: event.at,
                    moved: false,
                    held: false,
                });
                None
            }
            PointerKind::Move => self.drag(event),
            PointerKind::Up => {
                let press = self.press.take()?;
                if press.moved || press.held {
                    return None;
                }
                if event.at.saturating_duration_since(press.at) >= self.hold_duration {
                    Some(Gesture::Hold)
                } else {
                    Some(Gesture::Tap)
                }
            }
            PointerKind::WheelUp => self.swipe(Gesture::SwipeUp, event.at),
            PointerKind::WheelDown => self.swipe(Gesture::SwipeDown, event.at),
        }
    }

    /// Reports a hold while the press is still down.
    ///
    /// Fires at most once per press; the release that follows is then
    /// ignored.
    pub fn poll_hold(&mut self, now: Instant) -> Option<Gesture> {
        let hold = self.hold_duration;
        let press = self.press.as_mut()?;
        if press.moved || press.held || now.saturating_duration_since(press.at) < hold {
            return None;
        }
        press.held = true;
        Some(Gesture::Hold)
    }

    fn drag(&mut self, event: PointerEvent) -> Option<Gesture> {
        let swipe_rows = i32::from(self.swipe_rows);
        let press = self.press.as_mut()?;
        let dy = i32::from(event.row) - i32::from(press.row);
        let dx = i32::from(event.column) - i32::from(press.column);
        if dx == 0 && dy == 0 {
            return None;
        }
        press.moved = true;
        if dy.abs() < swipe_rows || dy.abs() < dx.abs() {
            return None;
        }
        // The next swipe of the same drag is measured from here.
        press.row = event.row;
        press.column = event.column;
        let gesture = if dy < 0 {
            Gesture::SwipeUp
        } else {
            Gesture::SwipeDown
        };
        self.swipe(gesture, event.at)
    }

    fn swipe(&mut self, gesture: Gesture, at: Instant) -> Option<Gesture> {
        if let Some(last) = self.last_swipe {
            if at.saturating_duration_since(last) < self.swipe_throttle {
                return None;
            }
        }
        self.last_swipe = Some(at);
        Some(gesture)
    }
}
