//! Turning a countdown snapshot into display text and visual state.
//!
//! [`render`] is a pure function of `(remaining_ms, running)`. The widget
//! calls it after every state-changing operation and styles the result
//! with [`Styles`].

use crate::clock::Snapshot;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Below this many milliseconds the display switches to [`Tone::Warning`].
pub const WARNING_THRESHOLD_MS: i64 = 5 * 60_000;

/// Number of text rows used by [`big_digits`].
pub const BIG_DIGIT_ROWS: usize = 5;

/// Colour state of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Plenty of time left.
    Normal,
    /// Less than five minutes left.
    Warning,
    /// Time is up; the countdown is in overtime.
    Alert,
}

impl Tone {
    /// Tone for a given remaining time. The warning boundary is strict.
    pub fn for_remaining(remaining_ms: i64) -> Self {
        if remaining_ms < 0 {
            Tone::Alert
        } else if remaining_ms < WARNING_THRESHOLD_MS {
            Tone::Warning
        } else {
            Tone::Normal
        }
    }

    /// Class name a host can attach to the display, if any.
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Tone::Normal => None,
            Tone::Warning => Some("timer-warning"),
            Tone::Alert => Some("timer-alert"),
        }
    }
}

/// Class name signalling a stopped timer.
pub const PAUSED_CLASS: &str = "timer-paused";

/// Rendered form of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    /// Zero-padded minutes, prefixed with `-` in overtime.
    pub minutes: String,
    /// Zero-padded seconds.
    pub seconds: String,
    /// Colour state.
    pub tone: Tone,
    /// Set when the timer is not running; independent of `tone`.
    pub paused: bool,
}

impl Display {
    /// `mm:ss` text, e.g. `"24:57"` or `"-00:01"`.
    pub fn text(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }

    /// All class names that apply, tone first.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::with_capacity(2);
        if let Some(class) = self.tone.class_name() {
            classes.push(class);
        }
        if self.paused {
            classes.push(PAUSED_CLASS);
        }
        classes
    }
}

impl From<Snapshot> for Display {
    fn from(snapshot: Snapshot) -> Self {
        render(snapshot.remaining_ms, snapshot.running)
    }
}

/// Renders remaining time and running state.
///
/// ```rust
/// use talk_timer::render::{render, Tone};
///
/// let display = render(-1_000, true);
/// assert_eq!(display.text(), "-00:01");
/// assert_eq!(display.tone, Tone::Alert);
/// ```
pub fn render(remaining_ms: i64, running: bool) -> Display {
    let magnitude = remaining_ms.unsigned_abs();
    let minutes = magnitude / 60_000;
    let seconds = ((magnitude + 500) / 1_000) % 60;

    let sign = if remaining_ms < 0 { "-" } else { "" };
    Display {
        minutes: format!("{}{:02}", sign, minutes),
        seconds: format!("{:02}", seconds),
        tone: Tone::for_remaining(remaining_ms),
        paused: !running,
    }
}

/// Styles for each visual state.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Time with plenty left.
    pub normal: Style,
    /// Time under the warning threshold.
    pub warning: Style,
    /// Overtime.
    pub alert: Style,
    /// Marker line shown under a paused timer.
    pub paused: Style,
    /// Status line.
    pub status: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            normal: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#1A1A1A",
                Dark: "#FAFAFA",
            }),
            warning: Style::new()
                .bold(true)
                .foreground(lipgloss::Color::from("#F2A900")),
            alert: Style::new()
                .bold(true)
                .foreground(lipgloss::Color::from("#FF4F4F")),
            paused: Style::new().faint(true),
            status: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
        }
    }
}

impl Styles {
    /// The style for a tone.
    pub fn tone(&self, tone: Tone) -> &Style {
        match tone {
            Tone::Normal => &self.normal,
            Tone::Warning => &self.warning,
            Tone::Alert => &self.alert,
        }
    }

    /// Styles `display` as one `mm:ss` line.
    pub fn compact(&self, display: &Display) -> String {
        let tone = self.tone(display.tone).clone().inline(true);
        let minutes = tone.render(&display.minutes);
        let seconds = tone
            .clone()
            .faint(true)
            .render(&format!(":{}", display.seconds));
        format!("{}{}", minutes, seconds)
    }

    /// Styles `display` in block digits.
    pub fn big(&self, display: &Display) -> String {
        let tone = self.tone(display.tone).clone();
        big_digits(&display.text())
            .lines()
            .map(|row| tone.clone().inline(true).render(row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn glyph(c: char) -> [&'static str; BIG_DIGIT_ROWS] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => [" ██", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        '-' => ["   ", "   ", "███", "   ", "   "],
        _ => ["   ", "   ", "   ", "   ", "   "],
    }
}

/// Draws `text` in five-row block digits.
pub fn big_digits(text: &str) -> String {
    let glyphs: Vec<_> = text.chars().map(glyph).collect();
    (0..BIG_DIGIT_ROWS)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column width of [`big_digits`] output for `text`.
pub fn big_width(text: &str) -> usize {
    let glyphs: Vec<_> = text.chars().map(glyph).collect();
    if glyphs.is_empty() {
        return 0;
    }
    let cells: usize = glyphs.iter().map(|g| g[0].chars().count()).sum();
    cells + glyphs.len() - 1
}
