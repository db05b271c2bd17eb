//! Countdown timer widget for bubbletea-rs applications.
//!
//! The widget wraps a [`ClockModel`] with everything around it: the tick
//! messages that drive it, the host adapters started as side effects,
//! the rendered display and a status line.
//!
//! # Basic Usage
//!
//! ```rust
//! use talk_timer::config::TimerConfig;
//! use talk_timer::timer;
//!
//! let config = TimerConfig::default()
//!     .with_minutes(20)
//!     .with_fullscreen(false)
//!     .with_wake_lock(false);
//! let mut timer = timer::new(&config);
//! assert_eq!(timer.display().text(), "20:00");
//!
//! // Starting returns the first tick command.
//! assert!(timer.start().is_some());
//! assert!(timer.running());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{batch, Cmd, EnterAltScreenMsg, Model as BubbleTeaModel, Msg};
//! use talk_timer::config::TimerConfig;
//! use talk_timer::timer;
//!
//! struct MyApp {
//!     timer: timer::Model,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut timer = timer::new(&TimerConfig::default());
//!         let cmd = timer.init();
//!         (Self { timer }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Forward tick and visibility messages
//!         self.timer.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.timer.view()
//!     }
//! }
//! ```

use crate::adapters::Adapters;
use crate::clock::{ClockModel, MonotonicClock, TimeSource};
use crate::config::{self, TimerConfig};
use crate::error::AdapterError;
use crate::input::Controls;
use crate::render::{self, big_width, Display, Styles, BIG_DIGIT_ROWS};
use crate::tick::TickMsg;
use bubbletea_rs::{batch, Cmd, EnterAltScreenMsg, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};

// Internal ID management for timer instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Status shown while the wake lock is held.
pub const WAKE_LOCK_ACTIVE: &str = "Wake lock is active; the screen saver will not turn on.";
/// Status shown after the host dropped the wake lock.
pub const WAKE_LOCK_RELEASED: &str = "Wake lock was released";
/// Status shown when no wake lock is available.
pub const WAKE_LOCK_UNSUPPORTED: &str =
    "Wake lock API not supported; the screen saver will turn on.";

/// Tells the timer whether it is visible to the user.
///
/// In a terminal this follows focus reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityMsg {
    pub visible: bool,
}

/// Where the wake lock stands, as far as the timer has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WakeLockState {
    /// Never acquired.
    Idle,
    Held,
    /// Acquired once and since dropped by the host.
    Released,
}

/// The timer widget.
#[derive(Debug)]
pub struct Model<C: TimeSource = MonotonicClock> {
    /// Styles used by [`Model::view`].
    pub styles: Styles,
    clock: ClockModel<C>,
    adapters: Adapters,
    fullscreen_on_start: bool,
    wake_lock: bool,
    wake_lock_state: WakeLockState,
    visible: bool,
    big_digits: bool,
    size: Option<(usize, usize)>,
    display: Display,
    status: Option<String>,
    id: i64,
}

/// Creates a timer on the monotonic clock with adapters probed from the host.
pub fn new(config: &TimerConfig) -> Model {
    Model::with_parts(config, MonotonicClock::new(), Adapters::detect(config))
}

impl<C: TimeSource> Model<C> {
    /// Creates a timer from explicit parts.
    pub fn with_parts(config: &TimerConfig, time: C, adapters: Adapters) -> Self {
        let clock = ClockModel::with_interval(config.default_duration_ms, time, config.interval);
        let display = Display::from(clock.snapshot());
        Self {
            styles: Styles::default(),
            clock,
            adapters,
            fullscreen_on_start: config.fullscreen,
            wake_lock: config.wake_lock,
            wake_lock_state: WakeLockState::Idle,
            visible: true,
            big_digits: config.big_digits,
            size: None,
            display,
            status: None,
            id: next_id(),
        }
    }

    /// Unique id; ticks carrying another id are ignored.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The underlying countdown state.
    pub fn clock(&self) -> &ClockModel<C> {
        &self.clock
    }

    /// Whether the countdown is running.
    pub fn running(&self) -> bool {
        self.clock.running()
    }

    /// The display computed after the last state change.
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Latest adapter status, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Sets the space available to [`Model::view`].
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.size = Some((width, height));
    }

    /// Requests the wake lock when enabled. The timer starts stopped, so
    /// no tick is scheduled.
    pub fn init(&mut self) -> Option<Cmd> {
        if self.wake_lock {
            self.request_wake_lock();
        }
        None
    }

    /// Starts the countdown and returns the first tick, batched with the
    /// fullscreen switch when one is needed.
    ///
    /// Returns `None` without side effects when already running.
    pub fn start(&mut self) -> Option<Cmd> {
        if !self.clock.start() {
            return None;
        }
        log::info!("timer {} started at {}", self.id, self.display.text());
        let fullscreen = if self.fullscreen_on_start {
            self.request_fullscreen()
        } else {
            None
        };
        self.refresh();
        match (fullscreen, self.clock.ticker().command(self.id)) {
            (Some(fullscreen), Some(tick)) => Some(batch(vec![fullscreen, tick])),
            (fullscreen, tick) => fullscreen.or(tick),
        }
    }

    /// Stops the countdown. Ticks still in flight are discarded.
    pub fn stop(&mut self) {
        if self.clock.stop() {
            log::info!("timer {} stopped at {}", self.id, self.display.text());
        }
        self.refresh();
    }

    /// Stops when running, starts otherwise.
    pub fn toggle(&mut self) -> Option<Cmd> {
        let cmd = if self.clock.running() {
            self.stop();
            None
        } else {
            self.start()
        };
        self.refresh();
        cmd
    }

    /// Stops and restores the preset.
    pub fn reset(&mut self) {
        self.clock.reset();
        log::info!(
            "timer {} reset to {} ms",
            self.id,
            self.clock.default_duration_ms()
        );
        self.refresh();
    }

    /// Adds a minute; while stopped the preset grows too.
    pub fn add_minute(&mut self) {
        self.clock.add_minute();
        log::debug!(
            "timer {}: +1 minute, remaining {} ms, preset {} ms",
            self.id,
            self.clock.remaining_ms(),
            self.clock.default_duration_ms()
        );
        self.refresh();
    }

    /// Takes a minute off; while stopped the preset shrinks too.
    pub fn subtract_minute(&mut self) {
        self.clock.subtract_minute();
        log::debug!(
            "timer {}: -1 minute, remaining {} ms, preset {} ms",
            self.id,
            self.clock.remaining_ms(),
            self.clock.default_duration_ms()
        );
        self.refresh();
    }

    /// Handles [`TickMsg`], [`VisibilityMsg`] and [`EnterAltScreenMsg`];
    /// ignores everything else.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return self.on_tick(tick);
        }
        if let Some(visibility) = msg.downcast_ref::<VisibilityMsg>() {
            self.visible = visibility.visible;
            self.poll_wake_lock();
            if self.visible {
                self.reacquire_wake_lock();
            }
            return None;
        }
        if msg.downcast_ref::<EnterAltScreenMsg>().is_some() && self.visible {
            self.poll_wake_lock();
            self.reacquire_wake_lock();
        }
        None
    }

    fn on_tick(&mut self, tick: &TickMsg) -> Option<Cmd> {
        if tick.id != self.id || !self.clock.ticker().accepts(tick.tag()) {
            return None;
        }
        let before = self.clock.remaining_ms();
        self.clock.update();
        if before >= 0 && self.clock.remaining_ms() < 0 {
            log::info!("timer {}: time is up", self.id);
        }
        self.poll_wake_lock();
        self.refresh();
        self.clock.ticker().command(self.id)
    }

    /// Notices a wake lock the host has dropped.
    fn poll_wake_lock(&mut self) {
        if self.wake_lock_state != WakeLockState::Held || self.adapters.wake_lock.is_held() {
            return;
        }
        log::info!("{}", WAKE_LOCK_RELEASED);
        self.wake_lock_state = WakeLockState::Released;
        self.status = Some(WAKE_LOCK_RELEASED.to_string());
    }

    /// Acquires again a lock that was held before. A lock never obtained
    /// is not retried.
    fn reacquire_wake_lock(&mut self) {
        if self.wake_lock_state == WakeLockState::Released {
            self.request_wake_lock();
        }
    }

    fn request_wake_lock(&mut self) {
        match self.adapters.wake_lock.acquire() {
            Ok(()) => {
                log::info!("Wake lock is active");
                self.wake_lock_state = WakeLockState::Held;
                self.status = Some(WAKE_LOCK_ACTIVE.to_string());
            }
            Err(AdapterError::Unsupported(_)) => {
                log::error!("Wake lock API not supported.");
                self.status = Some(WAKE_LOCK_UNSUPPORTED.to_string());
            }
            Err(e) => {
                log::error!("{}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn request_fullscreen(&mut self) -> Option<Cmd> {
        if self.adapters.fullscreen.is_active() {
            return None;
        }
        match self.adapters.fullscreen.request() {
            Ok(cmd) => {
                log::info!("fullscreen on");
                cmd
            }
            Err(AdapterError::Unsupported(_)) => {
                log::debug!("fullscreen not available");
                None
            }
            Err(e) => {
                log::warn!("{}", e);
                self.status = Some(e.to_string());
                None
            }
        }
    }

    fn refresh(&mut self) {
        self.display = render::render(self.clock.remaining_ms(), self.clock.running());
    }

    fn fits_big(&self) -> bool {
        match self.size {
            Some((width, height)) => {
                width >= big_width(&self.display.text()) && height >= BIG_DIGIT_ROWS + 2
            }
            None => false,
        }
    }

    /// The time, a paused marker when stopped, and the status line.
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(3);
        if self.big_digits && self.fits_big() {
            lines.push(self.styles.big(&self.display));
        } else {
            lines.push(self.styles.compact(&self.display));
        }
        if self.display.paused {
            lines.push(self.styles.paused.clone().inline(true).render("paused"));
        }
        if let Some(status) = &self.status {
            lines.push(self.styles.status.clone().inline(true).render(status));
        }
        lines.join("\n")
    }
}

impl<C: TimeSource> Controls for Model<C> {
    fn toggle(&mut self) -> Option<Cmd> {
        Self::toggle(self)
    }

    fn reset(&mut self) -> Option<Cmd> {
        Self::reset(self);
        None
    }

    fn add_minute(&mut self) -> Option<Cmd> {
        Self::add_minute(self);
        None
    }

    fn subtract_minute(&mut self) -> Option<Cmd> {
        Self::subtract_minute(self);
        None
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = new(&config::installed());
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
