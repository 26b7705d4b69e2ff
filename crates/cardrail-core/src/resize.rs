#![forbid(unsafe_code)]

//! Resize burst debouncer.
//!
//! Viewport resizes arrive as storms while a window is dragged. Re-measuring
//! the track on each one makes the strip flicker between layouts, so the
//! controller funnels them through [`ResizeDebounce`]:
//!
//! - **Latest-wins**: a burst produces exactly one apply, after it goes quiet.
//! - **Bounded latency** (optional): with a hard deadline, a burst that never
//!   goes quiet still applies once the deadline since its first event passes.
//! - **Deterministic**: identical event timestamps yield identical decisions.
//!
//! # Decision Rule
//!
//! 1) If a hard deadline is set and `now - first_event >= hard_deadline`,
//!    **apply** (forced).
//! 2) If `now - last_event >= delay`, **apply**.
//! 3) Otherwise keep **coalescing**.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `delay = 0` | apply on the first poll after the event |
//! | poll with nothing pending | `None` |
//! | host clock goes backwards | treated as zero elapsed |

use std::time::Duration;

/// Outcome of a settled resize burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeApply {
    /// Number of resize events folded into this apply.
    pub coalesced: u32,
    /// Time from the first event of the burst to the apply.
    pub waited: Duration,
    /// Whether the hard deadline forced the apply.
    pub forced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Burst {
    first: Duration,
    last: Duration,
    events: u32,
}

/// Latest-wins resize debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDebounce {
    delay: Duration,
    hard_deadline: Option<Duration>,
    pending: Option<Burst>,
    applies: u64,
}

impl ResizeDebounce {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hard_deadline: None,
            pending: None,
            applies: 0,
        }
    }

    /// Force an apply once a burst has lasted this long.
    #[must_use]
    pub fn with_hard_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.hard_deadline = deadline;
        self
    }

    /// Record a resize event.
    pub fn handle_resize(&mut self, now: Duration) {
        match &mut self.pending {
            Some(burst) => {
                burst.last = burst.last.max(now);
                burst.events = burst.events.saturating_add(1);
            }
            None => {
                self.pending = Some(Burst {
                    first: now,
                    last: now,
                    events: 1,
                });
            }
        }
    }

    /// Whether a burst is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Bursts applied so far.
    #[must_use]
    pub fn applies(&self) -> u64 {
        self.applies
    }

    /// Drop any pending burst.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Earliest time at which [`poll`](Self::poll) can return an apply.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        let burst = self.pending?;
        let quiet = burst.last + self.delay;
        Some(match self.hard_deadline {
            Some(hard) => quiet.min(burst.first + hard),
            None => quiet,
        })
    }

    /// Check whether the pending burst should apply at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<ResizeApply> {
        let burst = self.pending?;
        let forced = self
            .hard_deadline
            .is_some_and(|hard| now.saturating_sub(burst.first) >= hard);
        let quiet = now.saturating_sub(burst.last) >= self.delay;
        if !(forced || quiet) {
            return None;
        }
        self.pending = None;
        self.applies += 1;
        Some(ResizeApply {
            coalesced: burst.events,
            waited: now.saturating_sub(burst.first),
            forced: forced && !quiet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_applies_once_after_quiet() {
        let mut d = ResizeDebounce::new(ms(200));
        for t in (0..1000).step_by(16) {
            d.handle_resize(ms(t));
            assert_eq!(d.poll(ms(t)), None);
        }
        assert_eq!(d.poll(ms(1100)), None);
        let apply = d.poll(ms(1192)).unwrap();
        assert_eq!(apply.coalesced, 63);
        assert!(!apply.forced);
        assert_eq!(d.poll(ms(2000)), None);
        assert_eq!(d.applies(), 1);
    }

    #[test]
    fn deadline_tracks_latest_event() {
        let mut d = ResizeDebounce::new(ms(200));
        assert_eq!(d.deadline(), None);
        d.handle_resize(ms(10));
        d.handle_resize(ms(50));
        assert_eq!(d.deadline(), Some(ms(250)));
    }

    #[test]
    fn hard_deadline_forces_apply() {
        let mut d = ResizeDebounce::new(ms(200)).with_hard_deadline(Some(ms(500)));
        for t in (0..=500).step_by(50) {
            d.handle_resize(ms(t));
        }
        let apply = d.poll(ms(500)).unwrap();
        assert!(apply.forced);
        assert_eq!(apply.waited, ms(500));
    }

    #[test]
    fn cancel_clears_pending() {
        let mut d = ResizeDebounce::new(ms(200));
        d.handle_resize(ms(0));
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.poll(ms(1000)), None);
    }

    #[test]
    fn backwards_clock_does_not_apply_early() {
        let mut d = ResizeDebounce::new(ms(200));
        d.handle_resize(ms(500));
        assert_eq!(d.poll(ms(100)), None);
    }
}
