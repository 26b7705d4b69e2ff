#![forbid(unsafe_code)]

//! Auto-advance timer.
//!
//! The recurring advance timer and the one-shot "resume after quiet period"
//! timer share a single slot, so the two can never be live together and
//! starting either one replaces whatever was scheduled before.
//!
//! ```text
//!   Stopped ──start──▶ Running{next_at} ──poll≥next_at──▶ Fire (re-arm)
//!      ▲                    │
//!      └──────pause─────────┤
//!      │                    ▼
//!      └──────pause──── Resuming{at} ──poll≥at──▶ Resumed → Running
//! ```

use std::time::Duration;

/// Timer slot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoSchedule {
    /// No timer.
    #[default]
    Stopped,
    /// Recurring advance; next fire at `next_at`.
    Running {
        /// Next fire time.
        next_at: Duration,
    },
    /// Waiting out a quiet period; restarts the recurring timer at `at`.
    Resuming {
        /// Restart time.
        at: Duration,
    },
}

/// What [`AutoSchedule::poll`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTick {
    /// A quiet period ended and the recurring timer started.
    Resumed,
    /// The recurring timer fired.
    Fire,
}

impl AutoSchedule {
    /// Start the recurring timer; first fire one interval from `now`.
    pub fn start(&mut self, now: Duration, interval: Duration) {
        *self = Self::Running {
            next_at: now + interval,
        };
    }

    /// Cancel both the recurring timer and any pending resume.
    pub fn pause(&mut self) {
        *self = Self::Stopped;
    }

    /// Restart the recurring timer after `delay`, replacing any prior timer.
    pub fn resume_later(&mut self, now: Duration, delay: Duration) {
        *self = Self::Resuming { at: now + delay };
    }

    /// Whether the recurring timer is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Next time at which [`poll`](Self::poll) can report something.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        match *self {
            Self::Stopped => None,
            Self::Running { next_at } => Some(next_at),
            Self::Resuming { at } => Some(at),
        }
    }

    /// Advance the slot to `now`.
    ///
    /// A resume that falls due switches to `Running` (first fire one interval
    /// after the resume time) and reports [`ScheduleTick::Resumed`]; a later
    /// poll reports the fire. A fire that is more than one interval late
    /// re-arms from `now` instead of replaying the missed periods. A zero
    /// `interval` stops the slot.
    pub fn poll(&mut self, now: Duration, interval: Duration) -> Option<ScheduleTick> {
        if interval.is_zero() {
            *self = Self::Stopped;
            return None;
        }
        match *self {
            Self::Stopped => None,
            Self::Resuming { at } => {
                if now < at {
                    return None;
                }
                *self = Self::Running {
                    next_at: at + interval,
                };
                Some(ScheduleTick::Resumed)
            }
            Self::Running { next_at } => {
                if now < next_at {
                    return None;
                }
                let mut next = next_at + interval;
                if next <= now {
                    next = now + interval;
                }
                *self = Self::Running { next_at: next };
                Some(ScheduleTick::Fire)
            }
        }
    }
}
