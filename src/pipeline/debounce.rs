//! Quiescence-window trigger for translation attempts.
//!
//! Every transcript update restarts the window; a translation attempt fires
//! only once the transcript has been quiet for the full window. This bounds
//! API call volume to at most one call per window of silence while still
//! capturing nearly-final phrases.

use log::debug;
use std::time::{Duration, Instant};

/// Debounces transcript activity.
///
/// Holds at most one pending deadline. Callers pass explicit instants so the
/// trigger can be driven with a simulated clock in tests; the session loop
/// sleeps until `deadline()` and then calls `fire()`.
pub struct DebounceTrigger {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTrigger {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record transcript activity, scheduling (or rescheduling) the next
    /// attempt at `now + window`.
    pub fn note_update(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// The instant the pending attempt is due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Discard the pending attempt. Nothing fires until the next update.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("Debounce cancelled with attempt pending");
        }
    }

    /// True once the window has elapsed. Clears the deadline so each
    /// scheduled attempt fires at most once.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
