//! Errors raised by the host adapters.
//!
//! The countdown itself never fails; only the best-effort side effects
//! (fullscreen, wake lock) can, and their errors stop at the call site.

use std::{error::Error, fmt};

/// A host capability the timer may try to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Switching the timer display to fullscreen.
    Fullscreen,
    /// Keeping the screen awake while the timer is shown.
    WakeLock,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Capability::Fullscreen => write!(f, "fullscreen"),
            Capability::WakeLock => write!(f, "wake lock"),
        }
    }
}

/// Failure of a fullscreen or wake-lock request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The host does not provide the capability, or the user disabled it.
    Unsupported(Capability),
    /// The host provides the capability but the request failed.
    Failure {
        /// Which capability was requested.
        capability: Capability,
        /// Reason reported by the host.
        message: String,
    },
}

impl AdapterError {
    /// Builds a [`AdapterError::Failure`] from anything printable.
    pub fn failure(capability: Capability, message: impl fmt::Display) -> Self {
        Self::Failure {
            capability,
            message: message.to_string(),
        }
    }

    /// The capability this error is about.
    pub fn capability(&self) -> Capability {
        match self {
            AdapterError::Unsupported(capability) => *capability,
            AdapterError::Failure { capability, .. } => *capability,
        }
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            AdapterError::Unsupported(capability) => {
                write!(f, "{} is not supported", capability)
            }
            AdapterError::Failure {
                capability,
                message,
            } => write!(f, "{} request failed: {}", capability, message),
        }
    }
}

impl Error for AdapterError {}
