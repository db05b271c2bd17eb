#![doc(html_root_url = "https://docs.rs/talk-timer/")]

//! # talk-timer
//!
//! A countdown timer for talks and meetings, built as a
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) widget.
//!
//! ## Overview
//!
//! The timer counts down from a preset (25 minutes by default), keeps
//! counting into negative "overtime", and colours itself as time runs
//! out. It follows the Elm Architecture like every bubbletea component,
//! with `init()`, `update()` and `view()`.
//!
//! ## Features
//!
//! - **Drift-corrected countdown**: each tick subtracts the real time
//!   elapsed since the previous one, so late ticks never slow the clock
//! - **Single tick subscription**: starting twice never doubles the rate,
//!   and stopping discards ticks already in flight
//! - **Minute adjustments** that also edit the preset while paused
//! - **Keyboard and mouse input**: space, arrows and `r`; tap, hold and
//!   vertical swipes with the mouse
//! - **Best-effort host adapters** for fullscreen and screen wake lock
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`clock`] | Countdown state machine and time sources |
//! | [`tick`] | Tick scheduling with stale-tick rejection |
//! | [`render`] | `mm:ss` text, warning/alert tone, styles |
//! | [`timer`] | The bubbletea widget |
//! | [`input`] | Key map and input dispatch |
//! | [`gesture`] | Tap / hold / swipe recognition |
//! | [`help`] | Help line |
//! | [`adapters`] | Fullscreen and wake-lock capabilities |
//! | [`app`] | Full-window application |
//!
//! ## Quick Start
//!
//! ```rust
//! use talk_timer::clock::{ClockModel, ManualClock};
//! use talk_timer::render::{render, Tone};
//!
//! let time = ManualClock::new(0);
//! let mut clock = ClockModel::new(5 * 60_000, time.clone());
//!
//! clock.start();
//! time.advance(1_000);
//! clock.update();
//!
//! let display = render(clock.remaining_ms(), clock.running());
//! assert_eq!(display.text(), "04:59");
//! assert_eq!(display.tone, Tone::Warning);
//! ```

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod gesture;
pub mod help;
pub mod input;
pub mod key;
pub mod render;
pub mod tick;
pub mod timer;

pub use app::App;
pub use clock::{ClockModel, ManualClock, MonotonicClock, Snapshot, TimeSource};
pub use config::TimerConfig;
pub use error::{AdapterError, Capability};
pub use input::{Action, Controls, InputDispatcher};
pub use render::{render, Display, Tone};
pub use tick::{TickDriver, TickMsg};
pub use timer::{new as timer_new, Model as Timer, VisibilityMsg};

/// Commonly used types in one import.
///
/// ```rust
/// use talk_timer::prelude::*;
///
/// let config = TimerConfig::default().with_fullscreen(false).with_wake_lock(false);
/// let timer = timer_new(&config);
/// assert_eq!(timer.display().tone, Tone::Normal);
/// ```
pub mod prelude {
    pub use crate::clock::{ClockModel, ManualClock, MonotonicClock, TimeSource};
    pub use crate::config::TimerConfig;
    pub use crate::input::{Action, Controls, InputDispatcher};
    pub use crate::render::{render, Display, Tone};
    pub use crate::timer::{new as timer_new, Model as Timer, VisibilityMsg};
    pub use crate::App;
}
