//! Periodic tick scheduling for the countdown.
//!
//! A bubbletea program has no interval timers, only one-shot `tick`
//! commands. A running countdown re-arms a tick after every accepted
//! [`TickMsg`]. Each running session carries a tag; cancelling bumps the
//! tag so a tick that is already in flight for an old session is
//! recognised as stale and dropped.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::time::Duration;

/// Nominal period between two countdown updates.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Message delivered when a scheduled tick fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMsg {
    /// Identifier of the timer instance the tick belongs to.
    pub id: i64,
    tag: u64,
}

impl TickMsg {
    /// Session tag the tick was scheduled with.
    pub fn tag(&self) -> u64 {
        self.tag
    }
}

/// Keeps at most one tick subscription alive.
#[derive(Debug, Clone)]
pub struct TickDriver {
    interval: Duration,
    tag: u64,
    active: bool,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl TickDriver {
    /// Creates an inactive driver ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tag: 0,
            active: false,
        }
    }

    /// The nominal tick period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a subscription is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tag of the current (or last) session.
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Opens a new subscription and returns its tag.
    ///
    /// Returns `None` when a subscription is already active; the caller
    /// must not schedule a second tick chain in that case.
    pub fn activate(&mut self) -> Option<u64> {
        if self.active {
            return None;
        }
        self.tag = self.tag.wrapping_add(1);
        self.active = true;
        Some(self.tag)
    }

    /// Closes the active subscription. Ticks already in flight become stale.
    ///
    /// Returns `false` if nothing was active.
    pub fn cancel(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        // Move past the session tag so late ticks never match again.
        self.tag = self.tag.wrapping_add(1);
        true
    }

    /// Whether a tick with `tag` belongs to the active subscription.
    pub fn accepts(&self, tag: u64) -> bool {
        self.active && tag == self.tag
    }

    /// Schedules the next tick for timer `id`, or `None` when inactive.
    pub fn command(&self, id: i64) -> Option<Cmd> {
        if !self.active {
            return None;
        }
        let tag = self.tag;
        Some(bubbletea_tick(self.interval, move |_| {
            Box::new(TickMsg { id, tag }) as Msg
        }))
    }

    #[cfg(test)]
    pub(crate) fn message(&self, id: i64) -> TickMsg {
        TickMsg { id, tag: self.tag }
    }
}
