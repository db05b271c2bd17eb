//! Host capabilities used as side effects of the timer.
//!
//! Fullscreen and wake lock are best-effort. Each is a trait with a
//! capability probe; [`Adapters::detect`] picks one implementation per
//! capability at startup, falling back to [`Unsupported`].

use crate::config::TimerConfig;
use crate::error::{AdapterError, Capability};
use bubbletea_rs::Cmd;
use crossterm::tty::IsTty;
use std::env;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{self, Child, Command, Stdio};

/// Switches the timer display to fullscreen.
pub trait Fullscreen: Send {
    /// Whether the host can go fullscreen at all.
    fn is_supported(&self) -> bool;

    /// Whether fullscreen is currently on.
    fn is_active(&self) -> bool;

    /// Requests fullscreen.
    ///
    /// Returns the command that switches the program over, or `None` when
    /// already active.
    fn request(&mut self) -> Result<Option<Cmd>, AdapterError>;
}

/// Keeps the screen from blanking.
pub trait WakeLock: Send {
    /// Whether the host can hold a wake lock at all.
    fn is_supported(&self) -> bool;

    /// Whether the lock is currently held. The host may drop it at any time.
    fn is_held(&mut self) -> bool;

    /// Acquires the lock. Acquiring while held succeeds without effect.
    fn acquire(&mut self) -> Result<(), AdapterError>;

    /// Releases the lock if held.
    fn release(&mut self);
}

/// Fallback for a missing or disabled capability.
#[derive(Debug, Clone, Copy)]
pub struct Unsupported(pub Capability);

impl Fullscreen for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_active(&self) -> bool {
        false
    }

    fn request(&mut self) -> Result<Option<Cmd>, AdapterError> {
        Err(AdapterError::Unsupported(self.0))
    }
}

impl WakeLock for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_held(&mut self) -> bool {
        false
    }

    fn acquire(&mut self) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(self.0))
    }

    fn release(&mut self) {}
}

/// Fullscreen through the terminal's alternate screen.
///
/// The switch is a bubbletea command, so the program's terminal tracks it
/// and leaves the alternate screen on shutdown.
#[derive(Debug, Default)]
pub struct AltScreen {
    active: bool,
}

impl AltScreen {
    /// Not yet switched.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fullscreen for AltScreen {
    fn is_supported(&self) -> bool {
        io::stdout().is_tty()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn request(&mut self) -> Result<Option<Cmd>, AdapterError> {
        if self.active {
            return Ok(None);
        }
        if !self.is_supported() {
            return Err(AdapterError::Unsupported(Capability::Fullscreen));
        }
        self.active = true;
        Ok(Some(bubbletea_rs::enter_alt_screen()))
    }
}

/// External programs able to inhibit screen blanking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inhibitor {
    /// `systemd-inhibit` (Linux with logind).
    SystemdInhibit,
    /// `caffeinate` (macOS).
    Caffeinate,
}

impl Inhibitor {
    fn program(&self) -> &'static str {
        match self {
            Inhibitor::SystemdInhibit => "systemd-inhibit",
            Inhibitor::Caffeinate => "caffeinate",
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.program());
        match self {
            Inhibitor::SystemdInhibit => {
                command.args([
                    "--what=idle",
                    "--who=talk-timer",
                    "--why=Presentation timer is on screen",
                    "sleep",
                    "infinity",
                ]);
            }
            Inhibitor::Caffeinate => {
                // Exit together with this process.
                command.args(["-d", "-w", &process::id().to_string()]);
            }
        }
        command
    }

    /// First inhibitor found on `PATH`.
    pub fn probe() -> Option<Self> {
        [Inhibitor::SystemdInhibit, Inhibitor::Caffeinate]
            .into_iter()
            .find(|inhibitor| find_in_path(inhibitor.program()).is_some())
    }
}

impl fmt::Display for Inhibitor {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.program())
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Wake lock held by a child process that inhibits screen blanking.
#[derive(Debug)]
pub struct InhibitorWakeLock {
    inhibitor: Inhibitor,
    child: Option<Child>,
}

impl InhibitorWakeLock {
    /// A lock that is not yet held.
    pub fn new(inhibitor: Inhibitor) -> Self {
        Self {
            inhibitor,
            child: None,
        }
    }
}

impl WakeLock for InhibitorWakeLock {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_held(&mut self) -> bool {
        match self.child.as_mut().map(|child| child.try_wait()) {
            Some(Ok(None)) => true,
            Some(Ok(Some(status))) => {
                log::info!("{} exited with {}", self.inhibitor, status);
                self.child = None;
                false
            }
            Some(Err(e)) => {
                log::warn!("cannot poll {}: {}", self.inhibitor, e);
                false
            }
            None => false,
        }
    }

    fn acquire(&mut self) -> Result<(), AdapterError> {
        if self.is_held() {
            return Ok(());
        }
        let child = self
            .inhibitor
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AdapterError::failure(Capability::WakeLock, e))?;
        log::debug!("{} started as pid {}", self.inhibitor, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                log::warn!("cannot stop {}: {}", self.inhibitor, e);
            }
            let _ = child.wait();
        }
    }
}

impl Drop for InhibitorWakeLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// The adapters a timer calls into.
pub struct Adapters {
    /// Switched on when the countdown starts.
    pub fullscreen: Box<dyn Fullscreen>,
    /// Requested at init and again after the host drops it.
    pub wake_lock: Box<dyn WakeLock>,
}

impl fmt::Debug for Adapters {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("Adapters")
            .field("fullscreen", &self.fullscreen.is_supported())
            .field("wake_lock", &self.wake_lock.is_supported())
            .finish()
    }
}

impl Default for Adapters {
    fn default() -> Self {
        Self::none()
    }
}

impl Adapters {
    /// Adapters that support nothing.
    pub fn none() -> Self {
        Self {
            fullscreen: Box::new(Unsupported(Capability::Fullscreen)),
            wake_lock: Box::new(Unsupported(Capability::WakeLock)),
        }
    }

    /// Probes the host once and picks an implementation per capability.
    ///
    /// Capabilities switched off in `config` get [`Unsupported`].
    pub fn detect(config: &TimerConfig) -> Self {
        let fullscreen: Box<dyn Fullscreen> = if !config.fullscreen {
            log::info!("fullscreen disabled by configuration");
            Box::new(Unsupported(Capability::Fullscreen))
        } else if io::stdout().is_tty() {
            log::info!("fullscreen available through the alternate screen");
            Box::new(AltScreen::new())
        } else {
            log::info!("stdout is not a terminal, fullscreen unavailable");
            Box::new(Unsupported(Capability::Fullscreen))
        };

        let wake_lock: Box<dyn WakeLock> = if !config.wake_lock {
            log::info!("wake lock disabled by configuration");
            Box::new(Unsupported(Capability::WakeLock))
        } else {
            match Inhibitor::probe() {
                Some(inhibitor) => {
                    log::info!("wake lock available through {}", inhibitor);
                    Box::new(InhibitorWakeLock::new(inhibitor))
                }
                None => {
                    log::error!("Wake lock API not supported.");
                    Box::new(Unsupported(Capability::WakeLock))
                }
            }
        };

        Self {
            fullscreen,
            wake_lock,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fakes for the adapter traits.

    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Shared counters observed by a test while the fakes live in a timer.
    #[derive(Debug, Clone, Default)]
    pub struct Calls {
        pub fullscreen_requests: Arc<AtomicUsize>,
        pub wake_lock_requests: Arc<AtomicUsize>,
        pub wake_lock_held: Arc<AtomicBool>,
    }

    impl Calls {
        pub fn fullscreen(&self) -> usize {
            self.fullscreen_requests.load(Ordering::SeqCst)
        }

        pub fn wake_locks(&self) -> usize {
            self.wake_lock_requests.load(Ordering::SeqCst)
        }

        /// Simulates the host dropping the lock.
        pub fn drop_wake_lock(&self) {
            self.wake_lock_held.store(false, Ordering::SeqCst);
        }
    }

    pub struct FakeFullscreen {
        calls: Calls,
        fail: bool,
    }

    impl Fullscreen for FakeFullscreen {
        fn is_supported(&self) -> bool {
            true
        }

        fn is_active(&self) -> bool {
            false
        }

        fn request(&mut self) -> Result<Option<Cmd>, AdapterError> {
            self.calls.fullscreen_requests.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::failure(Capability::Fullscreen, "denied"));
            }
            Ok(Some(bubbletea_rs::enter_alt_screen()))
        }
    }

    pub struct FakeWakeLock {
        calls: Calls,
        fail: bool,
    }

    impl WakeLock for FakeWakeLock {
        fn is_supported(&self) -> bool {
            true
        }

        fn is_held(&mut self) -> bool {
            self.calls.wake_lock_held.load(Ordering::SeqCst)
        }

        fn acquire(&mut self) -> Result<(), AdapterError> {
            self.calls.wake_lock_requests.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::failure(Capability::WakeLock, "NotAllowedError"));
            }
            self.calls.wake_lock_held.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn release(&mut self) {
            self.calls.wake_lock_held.store(false, Ordering::SeqCst);
        }
    }

    /// Working fakes plus the handle observing them.
    pub fn recording() -> (Adapters, Calls) {
        with_failures(false)
    }

    /// Fakes whose every request fails.
    pub fn failing() -> (Adapters, Calls) {
        with_failures(true)
    }

    fn with_failures(fail: bool) -> (Adapters, Calls) {
        let calls = Calls::default();
        let adapters = Adapters {
            fullscreen: Box::new(FakeFullscreen {
                calls: calls.clone(),
                fail,
            }),
            wake_lock: Box::new(FakeWakeLock {
                calls: calls.clone(),
                fail,
            }),
        };
        (adapters, calls)
    }
}
