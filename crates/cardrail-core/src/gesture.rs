#![forbid(unsafe_code)]

//! Pointer gesture tracking for a horizontal card strip.
//!
//! A [`Gesture`] lives from pointer-down to release. It decides once whether
//! the user is swiping the strip or scrolling the page, then turns horizontal
//! movement into a strip offset.
//!
//! # Algorithm
//!
//! - **Axis lock**: while undecided, cumulative `|dx|` and `|dy|` are compared
//!   against `lock_threshold_px`. An axis wins only if it also leads the other
//!   by `lock_bias_px` (hysteresis), so diagonal jitter never locks.
//! - **Dead zone**: horizontal displacement under `dead_zone_px` is compressed
//!   through `(|dx| / dz)^exponent * dz * scale`, keeping tiny movement from
//!   visibly registering.
//! - **Elastic resistance**: offset beyond the track bounds is scaled by
//!   `elastic_resistance`.
//! - **Velocity**: instantaneous px/ms, exponentially smoothed per sample.
//!
//! # Invariants
//!
//! 1. The lock is decided at most once per gesture.
//! 2. A vertical lock never yields a pan and never asks to prevent default.
//! 3. Adjacent release moves at most one index, however large the drag.

use std::time::Duration;

use crate::config::{GestureConfig, ReleasePolicy};
use crate::layout::{TrackBounds, TrackMetrics};

/// Minimum time step (ms) used when estimating velocity.
const MIN_SAMPLE_MS: f64 = 1.0;

/// One pointer sample in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Horizontal client coordinate.
    pub x: f64,
    /// Vertical client coordinate.
    pub y: f64,
    /// Host monotonic time.
    pub time: Duration,
}

impl Sample {
    /// Create a sample.
    #[must_use]
    pub const fn new(x: f64, y: f64, time: Duration) -> Self {
        Self { x, y, time }
    }
}

/// Per-gesture axis decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    /// Not enough movement yet.
    #[default]
    Undecided,
    /// The strip owns the gesture.
    Horizontal,
    /// The page scroll owns the gesture.
    Vertical,
}

/// Result of feeding one sample to a [`Gesture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureStep {
    /// Still undecided; nothing moves.
    Pending,
    /// Locked vertical; hand the gesture back to the page.
    Abandon,
    /// Locked horizontal; the strip should sit at `offset`.
    Pan {
        /// New strip offset.
        offset: f64,
    },
}

/// Snapshot handed to [`resolve_release`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Offset minus the offset at gesture start.
    pub moved: f64,
    /// Offset at release.
    pub offset: f64,
    /// Smoothed velocity in px/ms.
    pub velocity: f64,
}

/// Active pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    origin: Sample,
    last: Sample,
    start_offset: f64,
    offset: f64,
    velocity: f64,
    lock: AxisLock,
}

/// Compress sub-threshold displacement.
#[must_use]
pub fn dead_zone(dx: f64, cfg: &GestureConfig) -> f64 {
    let dz = cfg.dead_zone_px;
    if dz <= 0.0 || dx.abs() >= dz {
        return dx;
    }
    dx.signum() * (dx.abs() / dz).powf(cfg.dead_zone_exponent) * dz * cfg.dead_zone_scale
}

/// Damp any part of `offset` that lies outside `bounds`.
#[must_use]
pub fn elastic(offset: f64, bounds: TrackBounds, resistance: f64) -> f64 {
    if offset > bounds.max {
        bounds.max + (offset - bounds.max) * resistance
    } else if offset < bounds.min {
        bounds.min + (offset - bounds.min) * resistance
    } else {
        offset
    }
}

impl Gesture {
    /// Start tracking at `at`, with the strip currently at `start_offset`.
    #[must_use]
    pub fn begin(at: Sample, start_offset: f64) -> Self {
        Self {
            origin: at,
            last: at,
            start_offset,
            offset: start_offset,
            velocity: 0.0,
            lock: AxisLock::Undecided,
        }
    }

    /// Current axis decision.
    #[must_use]
    pub fn lock(&self) -> AxisLock {
        self.lock
    }

    /// Strip offset when the gesture began.
    #[must_use]
    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Latest strip offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Smoothed velocity in px/ms.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Release snapshot.
    #[must_use]
    pub fn release(&self) -> Release {
        Release {
            moved: self.offset - self.start_offset,
            offset: self.offset,
            velocity: self.velocity,
        }
    }

    fn decide(&mut self, dx: f64, dy: f64, cfg: &GestureConfig) {
        let (ax, ay) = (dx.abs(), dy.abs());
        if ax > cfg.lock_threshold_px && ax > ay + cfg.lock_bias_px {
            self.lock = AxisLock::Horizontal;
        } else if ay > cfg.lock_threshold_px && ay > ax + cfg.lock_bias_px {
            self.lock = AxisLock::Vertical;
        }
    }

    /// Feed a pointer sample.
    pub fn update(&mut self, at: Sample, bounds: TrackBounds, cfg: &GestureConfig) -> GestureStep {
        let dx = at.x - self.origin.x;
        let dy = at.y - self.origin.y;

        if self.lock == AxisLock::Undecided {
            self.decide(dx, dy, cfg);
        }

        match self.lock {
            AxisLock::Undecided => {
                self.last = at;
                GestureStep::Pending
            }
            AxisLock::Vertical => GestureStep::Abandon,
            AxisLock::Horizontal => {
                let next = elastic(
                    self.start_offset + dead_zone(dx, cfg),
                    bounds,
                    cfg.elastic_resistance,
                );
                self.offset = next;

                let dt_ms = (at.time.saturating_sub(self.last.time).as_secs_f64() * 1000.0)
                    .max(MIN_SAMPLE_MS);
                let instant = (at.x - self.last.x) / dt_ms;
                let keep = cfg.velocity_smoothing;
                self.velocity = self.velocity * keep + instant * (1.0 - keep);
                self.last = at;

                GestureStep::Pan { offset: next }
            }
        }
    }
}

/// Pick the resting index for a released horizontal gesture.
#[must_use]
pub fn resolve_release(
    policy: ReleasePolicy,
    release: Release,
    current: usize,
    metrics: &TrackMetrics,
    cfg: &GestureConfig,
) -> usize {
    match policy {
        ReleasePolicy::Adjacent => {
            let over_distance = release.moved.abs() > cfg.commit_threshold(metrics.card_width);
            let over_velocity = release.velocity.abs() > cfg.min_velocity;
            if !(over_distance || over_velocity) {
                return current.min(metrics.max_index);
            }
            if release.moved < 0.0 {
                (current + 1).min(metrics.max_index)
            } else if release.moved > 0.0 {
                current.saturating_sub(1)
            } else {
                current.min(metrics.max_index)
            }
        }
        ReleasePolicy::Nearest => {
            let step = metrics.step();
            if step <= 0.0 {
                return 0;
            }
            metrics.clamp_index((-release.offset / step).round() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutSample, measure};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn metrics() -> TrackMetrics {
        measure(LayoutSample::new(640.0, 300.0, 20.0, 5), 24.0).unwrap()
    }

    #[test]
    fn jitter_does_not_lock() {
        let cfg = GestureConfig::default();
        let mut g = Gesture::begin(Sample::new(100.0, 100.0, ms(0)), 0.0);
        for (i, (x, y)) in [(105.0, 103.0), (96.0, 108.0), (110.0, 110.0)].iter().enumerate() {
            let step = g.update(Sample::new(*x, *y, ms(10 * (i as u64 + 1))), metrics().bounds(), &cfg);
            assert_eq!(step, GestureStep::Pending);
        }
        assert_eq!(g.lock(), AxisLock::Undecided);
        assert_eq!(g.offset(), 0.0);
    }

    #[test]
    fn horizontal_needs_bias_over_vertical() {
        let cfg = GestureConfig::default();
        let mut g = Gesture::begin(Sample::new(0.0, 0.0, ms(0)), 0.0);
        // |dx| = 15 > 12 but does not lead |dy| = 10 by 6.
        assert_eq!(
            g.update(Sample::new(-15.0, 10.0, ms(16)), metrics().bounds(), &cfg),
            GestureStep::Pending
        );
        assert!(matches!(
            g.update(Sample::new(-20.0, 10.0, ms(32)), metrics().bounds(), &cfg),
            GestureStep::Pan { .. }
        ));
        assert_eq!(g.lock(), AxisLock::Horizontal);
    }

    #[test]
    fn vertical_lock_abandons() {
        let cfg = GestureConfig::default();
        let mut g = Gesture::begin(Sample::new(0.0, 0.0, ms(0)), -320.0);
        assert_eq!(
            g.update(Sample::new(3.0, 40.0, ms(16)), metrics().bounds(), &cfg),
            GestureStep::Abandon
        );
        // Later horizontal motion cannot re-lock.
        assert_eq!(
            g.update(Sample::new(200.0, 40.0, ms(32)), metrics().bounds(), &cfg),
            GestureStep::Abandon
        );
        assert_eq!(g.offset(), -320.0);
    }

    #[test]
    fn dead_zone_compresses_small_moves() {
        let cfg = GestureConfig::default();
        assert_eq!(dead_zone(0.0, &cfg), 0.0);
        // (9/18)^2 * 18 * 0.35 = 1.575
        assert!((dead_zone(-9.0, &cfg) + 1.575).abs() < 1e-9);
        assert_eq!(dead_zone(18.0, &cfg), 18.0);
        assert_eq!(dead_zone(-80.0, &cfg), -80.0);
    }

    #[test]
    fn elastic_damps_beyond_bounds() {
        let bounds = TrackBounds { min: -960.0, max: 0.0 };
        assert_eq!(elastic(100.0, bounds, 0.3), 30.0);
        assert_eq!(elastic(-1060.0, bounds, 0.3), -990.0);
        assert_eq!(elastic(-500.0, bounds, 0.3), -500.0);
    }

    #[test]
    fn velocity_is_smoothed() {
        let cfg = GestureConfig::default();
        let mut g = Gesture::begin(Sample::new(0.0, 0.0, ms(0)), 0.0);
        g.update(Sample::new(-20.0, 0.0, ms(10)), metrics().bounds(), &cfg);
        // instant = -20/10 = -2.0, smoothed = 0*0.8 + -2*0.2
        assert!((g.velocity() + 0.4).abs() < 1e-9);
    }

    #[test]
    fn zero_dt_uses_minimum_step() {
        let cfg = GestureConfig::default();
        let mut g = Gesture::begin(Sample::new(0.0, 0.0, ms(5)), 0.0);
        g.update(Sample::new(-30.0, 0.0, ms(5)), metrics().bounds(), &cfg);
        assert!(g.velocity().is_finite());
        assert!((g.velocity() + 6.0).abs() < 1e-9);
    }

    #[test]
    fn adjacent_commit_by_distance() {
        let cfg = GestureConfig::default();
        let m = metrics();
        let commit = Release { moved: -80.0, offset: -80.0, velocity: 0.1 };
        assert_eq!(resolve_release(ReleasePolicy::Adjacent, commit, 0, &m, &cfg), 1);
        let back = Release { moved: -40.0, offset: -40.0, velocity: 0.1 };
        assert_eq!(resolve_release(ReleasePolicy::Adjacent, back, 0, &m, &cfg), 0);
    }

    #[test]
    fn adjacent_commit_by_velocity() {
        let cfg = GestureConfig::default();
        let m = metrics();
        let flick = Release { moved: 30.0, offset: -610.0, velocity: 1.2 };
        assert_eq!(resolve_release(ReleasePolicy::Adjacent, flick, 2, &m, &cfg), 1);
    }

    #[test]
    fn adjacent_never_skips() {
        let cfg = GestureConfig::default();
        let m = metrics();
        let huge = Release { moved: -900.0, offset: -900.0, velocity: 5.0 };
        assert_eq!(resolve_release(ReleasePolicy::Adjacent, huge, 0, &m, &cfg), 1);
        let at_end = Release { moved: -200.0, offset: -1000.0, velocity: 0.0 };
        assert_eq!(resolve_release(ReleasePolicy::Adjacent, at_end, 3, &m, &cfg), 3);
    }

    #[test]
    fn nearest_rounds_offset() {
        let cfg = GestureConfig::default();
        let m = metrics();
        let r = Release { moved: -500.0, offset: -500.0, velocity: 0.0 };
        assert_eq!(resolve_release(ReleasePolicy::Nearest, r, 0, &m, &cfg), 2);
        let past = Release { moved: -5000.0, offset: -5000.0, velocity: 0.0 };
        assert_eq!(resolve_release(ReleasePolicy::Nearest, past, 0, &m, &cfg), 3);
    }
}
