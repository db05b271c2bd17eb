//! Countdown state and its drift-corrected update.
//!
//! [`ClockModel`] holds the remaining time, the preset it resets to, and
//! the tick subscription that drives it. Elapsed time is measured from a
//! [`TimeSource`] on every tick instead of being assumed equal to the
//! nominal tick period, so late or skipped ticks do not slow the clock.
//!
//! # Example
//!
//! ```rust
//! use talk_timer::clock::{ClockModel, ManualClock};
//!
//! let time = ManualClock::new(0);
//! let mut clock = ClockModel::new(25 * 60_000, time.clone());
//!
//! clock.start();
//! time.advance(2_500);
//! clock.update();
//! assert_eq!(clock.remaining_ms(), 25 * 60_000 - 2_500);
//! ```

use crate::tick::TickDriver;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Milliseconds added or removed by one minute adjustment.
pub const MINUTE_MS: i64 = 60_000;

/// Source of "now" in milliseconds.
pub trait TimeSource {
    /// Current time in milliseconds on an arbitrary but fixed origin.
    fn now_ms(&self) -> i64;
}

/// Monotonic time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a source whose origin is the moment of the call.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Manually advanced time source.
///
/// Clones share the same time, so a test can keep one handle and hand
/// the other to the model.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a source reading `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Sets the current time.
    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Point-in-time view of a [`ClockModel`], the input of rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Remaining time; negative once the countdown is in overtime.
    pub remaining_ms: i64,
    /// Whether the countdown is running.
    pub running: bool,
}

/// The countdown state machine.
///
/// Two states, stopped and running. "Running" is exactly "the tick
/// subscription is active": the model owns its [`TickDriver`] and asks it
/// rather than keeping a separate flag.
#[derive(Debug, Clone)]
pub struct ClockModel<C: TimeSource = MonotonicClock> {
    remaining: i64,
    default_duration: i64,
    last_poll: Option<i64>,
    ticker: TickDriver,
    time: C,
}

impl<C: TimeSource> ClockModel<C> {
    /// Creates a stopped clock showing `default_duration_ms`.
    pub fn new(default_duration_ms: i64, time: C) -> Self {
        Self::with_ticker(default_duration_ms, time, TickDriver::default())
    }

    /// Like [`ClockModel::new`] with a custom tick period.
    pub fn with_interval(default_duration_ms: i64, time: C, interval: Duration) -> Self {
        Self::with_ticker(default_duration_ms, time, TickDriver::new(interval))
    }

    fn with_ticker(default_duration_ms: i64, time: C, ticker: TickDriver) -> Self {
        Self {
            remaining: default_duration_ms,
            default_duration: default_duration_ms,
            last_poll: None,
            ticker,
            time,
        }
    }

    /// Remaining time in milliseconds.
    pub fn remaining_ms(&self) -> i64 {
        self.remaining
    }

    /// The preset restored by [`ClockModel::reset`].
    pub fn default_duration_ms(&self) -> i64 {
        self.default_duration
    }

    /// Whether the countdown is running.
    pub fn running(&self) -> bool {
        self.ticker.is_active()
    }

    /// Timestamp of the last poll; `None` while stopped.
    pub fn last_poll_time(&self) -> Option<i64> {
        self.last_poll
    }

    /// The tick subscription driving this clock.
    pub fn ticker(&self) -> &TickDriver {
        &self.ticker
    }

    /// The time source.
    pub fn time(&self) -> &C {
        &self.time
    }

    /// Current state as rendering input.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining_ms: self.remaining,
            running: self.running(),
        }
    }

    /// Stops the clock and restores the preset.
    pub fn reset(&mut self) {
        self.remaining = self.default_duration;
        self.stop();
    }

    /// Starts counting down. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.ticker.activate().is_none() {
            return false;
        }
        self.last_poll = Some(self.time.now_ms());
        true
    }

    /// Stops counting down. Returns `false` if already stopped.
    ///
    /// The subscription is cancelled before this returns, so no tick of
    /// the stopped session reaches [`ClockModel::update`].
    pub fn stop(&mut self) -> bool {
        if !self.ticker.cancel() {
            return false;
        }
        self.last_poll = None;
        true
    }

    /// Stops if running, starts otherwise. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running() {
            self.stop();
        } else {
            self.start();
        }
        self.running()
    }

    /// Adds a minute; while stopped the preset grows with it.
    pub fn add_minute(&mut self) {
        self.adjust(MINUTE_MS);
    }

    /// Removes a minute; while stopped the preset shrinks with it.
    pub fn subtract_minute(&mut self) {
        self.adjust(-MINUTE_MS);
    }

    fn adjust(&mut self, delta: i64) {
        // Only a paused timer edits the preset.
        if !self.running() {
            self.default_duration = self.default_duration.saturating_add(delta);
        }
        self.remaining = self.remaining.saturating_add(delta);
    }

    /// Subtracts the real time elapsed since the previous poll.
    ///
    /// Returns the elapsed milliseconds, or `None` when stopped.
    pub fn update(&mut self) -> Option<i64> {
        let last = self.last_poll?;
        if !self.running() {
            return None;
        }
        let now = self.time.now_ms();
        let elapsed = now.saturating_sub(last);
        self.last_poll = Some(now);
        self.remaining = self.remaining.saturating_sub(elapsed);
        Some(elapsed)
    }
}

impl Default for ClockModel {
    fn default() -> Self {
        ClockModel::new(25 * MINUTE_MS, MonotonicClock::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(default_ms: i64) -> (ClockModel<ManualClock>, ManualClock) {
        let time = ManualClock::new(10_000);
        (ClockModel::new(default_ms, time.clone()), time)
    }

    #[test]
    fn test_initial_state_is_stopped_at_preset() {
        let (clock, _) = clock(1_500_000);
        assert!(!clock.running());
        assert_eq!(clock.remaining_ms(), 1_500_000);
        assert_eq!(clock.default_duration_ms(), 1_500_000);
        assert_eq!(clock.last_poll_time(), None);
    }

    #[test]
    fn test_start_records_poll_time() {
        let (mut clock, time) = clock(60_000);
        time.set(42);
        assert!(clock.start());
        assert!(clock.running());
        assert_eq!(clock.last_poll_time(), Some(42));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (mut clock, time) = clock(60_000);
        clock.start();
        let tag = clock.ticker().tag();
        let polled = clock.last_poll_time();

        time.advance(500);
        assert!(!clock.start());
        assert_eq!(clock.last_poll_time(), polled);
        assert_eq!(clock.ticker().tag(), tag);
        assert!(clock.ticker().is_active());
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (mut clock, _) = clock(60_000);
        assert!(!clock.stop());
        assert!(!clock.running());
    }

    #[test]
    fn test_running_matches_subscription() {
        let (mut clock, time) = clock(60_000);
        let check = |clock: &ClockModel<ManualClock>| {
            assert_eq!(clock.running(), clock.ticker().is_active());
        };

        clock.start();
        check(&clock);
        time.advance(1_000);
        clock.update();
        check(&clock);
        clock.toggle();
        check(&clock);
        clock.toggle();
        check(&clock);
        clock.reset();
        check(&clock);
        assert!(!clock.ticker().is_active());
        clock.add_minute();
        check(&clock);
    }

    #[test]
    fn test_reset_from_any_state() {
        let (mut clock, time) = clock(300_000);
        clock.start();
        time.advance(90_000);
        clock.update();
        clock.subtract_minute();

        clock.reset();
        assert_eq!(clock.remaining_ms(), clock.default_duration_ms());
        assert!(!clock.running());

        clock.reset();
        assert_eq!(clock.remaining_ms(), 300_000);
        assert!(!clock.running());
    }

    #[test]
    fn test_add_then_subtract_restores_when_stopped() {
        let (mut clock, _) = clock(600_000);
        let before = (clock.remaining_ms(), clock.default_duration_ms());
        clock.add_minute();
        assert_eq!(clock.remaining_ms(), 660_000);
        assert_eq!(clock.default_duration_ms(), 660_000);
        clock.subtract_minute();
        assert_eq!((clock.remaining_ms(), clock.default_duration_ms()), before);
    }

    #[test]
    fn test_adjust_while_running_keeps_preset() {
        let (mut clock, _) = clock(600_000);
        clock.start();
        clock.add_minute();
        assert_eq!(clock.remaining_ms(), 660_000);
        assert_eq!(clock.default_duration_ms(), 600_000);
    }

    #[test]
    fn test_update_subtracts_exact_elapsed() {
        let (mut clock, time) = clock(60_000);
        clock.start();
        time.advance(1_000);
        assert_eq!(clock.update(), Some(1_000));
        assert_eq!(clock.remaining_ms(), 59_000);
    }

    #[test]
    fn test_update_corrects_for_late_ticks() {
        let (mut clock, time) = clock(60_000);
        clock.start();

        // A throttled host delivers ticks late and irregularly.
        for late in [1_013, 2_950, 40, 997] {
            time.advance(late);
            clock.update();
        }
        assert_eq!(clock.remaining_ms(), 60_000 - 5_000);
    }

    #[test]
    fn test_update_while_stopped_does_nothing() {
        let (mut clock, time) = clock(60_000);
        time.advance(5_000);
        assert_eq!(clock.update(), None);
        assert_eq!(clock.remaining_ms(), 60_000);

        clock.start();
        clock.stop();
        time.advance(5_000);
        assert_eq!(clock.update(), None);
        assert_eq!(clock.remaining_ms(), 60_000);
    }

    #[test]
    fn test_paused_time_is_not_counted() {
        let (mut clock, time) = clock(60_000);
        clock.start();
        time.advance(1_000);
        clock.update();
        clock.stop();

        time.advance(30_000);
        clock.start();
        time.advance(1_000);
        clock.update();
        assert_eq!(clock.remaining_ms(), 58_000);
    }

    #[test]
    fn test_presentation_scenario() {
        let (mut clock, time) = clock(1_500_000);
        clock.reset();
        assert_eq!(clock.remaining_ms(), 1_500_000);

        clock.start();
        for _ in 0..3 {
            time.advance(1_000);
            clock.update();
        }
        assert_eq!(clock.remaining_ms(), 1_497_000);

        clock.subtract_minute();
        assert_eq!(clock.remaining_ms(), 1_437_000);
        assert_eq!(clock.default_duration_ms(), 1_500_000);

        clock.stop();
        clock.subtract_minute();
        assert_eq!(clock.default_duration_ms(), 1_440_000);
        assert_eq!(clock.remaining_ms(), 1_377_000);
    }

    #[test]
    fn test_overtime_goes_negative() {
        let (mut clock, time) = clock(1_000);
        clock.start();
        time.advance(2_000);
        clock.update();
        assert_eq!(clock.remaining_ms(), -1_000);
        assert!(clock.running());
    }
}
