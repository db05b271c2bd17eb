//! Timer configuration and command-line arguments.

use crate::clock::MINUTE_MS;
use crate::tick::DEFAULT_INTERVAL;
use clap::Parser;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one timer widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Preset the timer starts from and resets to, in milliseconds.
    pub default_duration_ms: i64,
    /// Request fullscreen when the timer starts.
    pub fullscreen: bool,
    /// Keep the screen awake while the timer is shown.
    pub wake_lock: bool,
    /// Nominal period between updates.
    pub interval: Duration,
    /// Draw the time in block digits when the window is large enough.
    pub big_digits: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 25 * MINUTE_MS,
            fullscreen: true,
            wake_lock: true,
            interval: DEFAULT_INTERVAL,
            big_digits: true,
        }
    }
}

impl TimerConfig {
    /// Sets the preset in whole minutes.
    pub fn with_minutes(mut self, minutes: i64) -> Self {
        self.default_duration_ms = minutes.saturating_mul(MINUTE_MS);
        self
    }

    /// Enables or disables fullscreen on start.
    pub fn with_fullscreen(mut self, enabled: bool) -> Self {
        self.fullscreen = enabled;
        self
    }

    /// Enables or disables the wake lock.
    pub fn with_wake_lock(mut self, enabled: bool) -> Self {
        self.wake_lock = enabled;
        self
    }

    /// Sets the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enables or disables block digits when the window is large enough.
    pub fn with_big_digits(mut self, enabled: bool) -> Self {
        self.big_digits = enabled;
        self
    }
}

static INSTALLED: OnceCell<TimerConfig> = OnceCell::new();

/// Makes `config` the configuration used by [`crate::app::App`].
///
/// Only the first call wins; later calls return the rejected config.
pub fn install(config: TimerConfig) -> Result<(), TimerConfig> {
    INSTALLED.set(config)
}

/// The installed configuration, or the default one.
pub fn installed() -> TimerConfig {
    INSTALLED.get().cloned().unwrap_or_default()
}

/// Countdown timer for talks and meetings.
#[derive(Parser, Debug)]
#[command(name = "talk-timer")]
#[command(about = "Countdown timer for talks and meetings", version)]
pub struct Args {
    /// Minutes to count down from
    #[arg(short, long, default_value_t = 25, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Do not switch to the alternate screen when the timer starts
    #[arg(long)]
    pub no_fullscreen: bool,

    /// Do not keep the screen awake
    #[arg(long)]
    pub no_wake_lock: bool,

    /// Always draw the time on a single line
    #[arg(long)]
    pub compact: bool,

    /// Write log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// The timer configuration these arguments describe.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::default()
            .with_minutes(self.minutes)
            .with_fullscreen(!self.no_fullscreen)
            .with_wake_lock(!self.no_wake_lock)
            .with_big_digits(!self.compact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimerConfig::default();
        assert_eq!(config.default_duration_ms, 1_500_000);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert!(config.fullscreen);
        assert!(config.wake_lock);
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from(["talk-timer", "--minutes", "10", "--no-fullscreen"]);
        let config = args.timer_config();
        assert_eq!(config.default_duration_ms, 600_000);
        assert!(!config.fullscreen);
        assert!(config.wake_lock);
        assert!(config.big_digits);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["talk-timer", "--compact", "--no-wake-lock"]);
        let config = args.timer_config();
        assert_eq!(config.default_duration_ms, 1_500_000);
        assert!(!config.wake_lock);
        assert!(!config.big_digits);
    }
}
