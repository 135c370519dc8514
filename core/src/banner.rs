//! Transient, dismissible error banner.
//!
//! # Design
//! One slot, last write wins: the UI shows a single message at a time. Each
//! overwrite is logged so concurrent failures still leave a trace. The
//! auto-clear timer is a deadline the host checks with [`ErrorBanner::expire`],
//! which keeps the core free of real timers.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Default auto-clear delay.
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_millis(3000);

/// Failure categories shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    LoadFailed,
    AddFailed,
    DeleteFailed,
    EmptyTitle,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::LoadFailed => "Unable to load todos",
            ErrorKind::AddFailed => "Unable to add a todo",
            ErrorKind::DeleteFailed => "Unable to delete a todo",
            ErrorKind::EmptyTitle => "Title should not be empty",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone)]
pub struct ErrorBanner {
    current: Option<ErrorKind>,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl ErrorBanner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            deadline: None,
            timeout,
        }
    }

    pub fn current(&self) -> Option<ErrorKind> {
        self.current
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Show `kind`, replacing whatever was visible, and restart the timer.
    pub fn raise(&mut self, kind: ErrorKind, now: Instant) {
        if let Some(previous) = self.current.replace(kind) {
            if previous != kind {
                tracing::debug!(?previous, current = ?kind, "error banner overwritten");
            }
        }
        self.rearm(now);
    }

    /// Cancel any pending auto-clear and start a fresh one from `now`.
    pub fn rearm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.deadline = None;
    }

    /// Clear the banner if its deadline has passed. Returns true when a
    /// visible error was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.current.take().is_some()
            }
            _ => false,
        }
    }
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_TIMEOUT)
    }
}
