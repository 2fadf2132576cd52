//! User-activity monitoring.
//!
//! The monitor tracks the instant of the last user interaction and, on each
//! poll, decides whether the user still counts as active. The host forwards
//! interaction events through [`ActivityMonitor::record_event`]; events are
//! recorded whenever the monitor is initialized, whether or not polling is
//! running. Polling itself is driven externally — either by the client's
//! interval task or manually via [`crate::client::SsoClient::poll_activity`].

use crate::constants::{DEFAULT_INACTIVE_MINUTES, POLL_INTERVAL_ACTIVITY_SECONDS};
use chrono::{DateTime, Duration, Utc};

/// Interaction event names interpreted as user activity
pub const ACTIVITY_EVENTS: [&str; 5] = ["mousedown", "mousemove", "keydown", "scroll", "touchstart"];

/// Hook invoked on a poll tick that finds the user active
pub type ActivityCallbackFn = Box<dyn FnMut() + Send>;

/// Callbacks registered with [`ActivityMonitor::init`]
#[derive(Default)]
pub struct ActivityCallbacks {
    /// Invoked on every poll tick while the user is active
    pub on_active_interval: Option<ActivityCallbackFn>,
}

/// Polling monitor over user-interaction events.
///
/// Lifecycle: `uninitialized → initialized (idle) → running ⇄ stopped`.
/// `init` is idempotent; `start` while running restarts, so at most one poll
/// cycle is ever active.
pub struct ActivityMonitor {
    initialized: bool,
    running: bool,
    active: bool,
    last_activity: DateTime<Utc>,
    callbacks: ActivityCallbacks,
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self {
            initialized: false,
            running: false,
            active: false,
            last_activity: Utc::now(),
            callbacks: ActivityCallbacks::default(),
        }
    }
}

impl ActivityMonitor {
    /// A monitor in the uninitialized state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register callbacks and begin accepting activity events.
    ///
    /// Idempotent: calls after the first are no-ops, keeping the originally
    /// registered callbacks.
    pub fn init(&mut self, callbacks: ActivityCallbacks) {
        if self.initialized {
            return;
        }
        self.callbacks = callbacks;
        self.initialized = true;
    }

    /// Whether `init` has run
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the last poll found the user active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether polling is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Poll spacing in seconds
    #[must_use]
    pub const fn poll_interval() -> u64 {
        POLL_INTERVAL_ACTIVITY_SECONDS
    }

    /// Begin polling; if already running, restart
    pub fn start(&mut self) {
        if self.running {
            self.stop();
        }
        self.running = true;
    }

    /// Stop polling and clear the active flag
    pub fn stop(&mut self) {
        self.running = false;
        self.active = false;
    }

    /// Record a named interaction event. Unknown event names, and any event
    /// arriving before `init`, are ignored.
    pub fn record_event(&mut self, event: &str) {
        if self.initialized && ACTIVITY_EVENTS.contains(&event) {
            self.record_activity();
        }
    }

    /// Record user activity at the current instant
    pub fn record_activity(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Evaluate the user's activity status and fire the on-active hook.
    ///
    /// The user is active iff the last recorded activity is younger than the
    /// inactivity threshold. Absence of a registered hook is tolerated.
    pub fn activity_fn(&mut self) {
        let elapsed = Utc::now() - self.last_activity;
        self.active = elapsed < Duration::minutes(DEFAULT_INACTIVE_MINUTES);
        if self.active {
            if let Some(callback) = self.callbacks.on_active_interval.as_mut() {
                callback();
            }
        }
    }

    /// Backdate the last-activity instant (test hook)
    #[cfg(any(test, feature = "testing"))]
    pub fn set_last_activity(&mut self, instant: DateTime<Utc>) {
        self.last_activity = instant;
    }
}
