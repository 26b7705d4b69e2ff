#![forbid(unsafe_code)]

//! Post-release free decay of the strip offset.
//!
//! Fixed-step integrator: each frame moves the offset by
//! `velocity * frame_ms`, reflects and attenuates the velocity at the track
//! bounds, then applies friction. Host time is consumed in whole frames, so
//! identical release conditions produce identical trajectories regardless of
//! how the host batches its ticks.
//!
//! # Invariants
//!
//! 1. `|velocity|` strictly decreases every frame (`friction < 1`, `bounce <= 1`).
//! 2. The run ends once `|velocity| < min_velocity`, which happens after
//!    finitely many frames for any finite start velocity.
//! 3. After a bounce the offset is clamped inside the bounds.

use std::time::Duration;

use crate::config::MomentumConfig;
use crate::layout::TrackBounds;

/// Frame count at which a run is force-terminated even if still moving.
/// Unreachable with validated config and finite velocity; guards NaN input.
const HARD_FRAME_LIMIT: u32 = 10_000;

/// One momentum run.
#[derive(Debug, Clone, PartialEq)]
pub struct Momentum {
    offset: f64,
    velocity: f64,
    origin_offset: f64,
    last_step_at: Duration,
    frames: u32,
    exhausted: bool,
}

impl Momentum {
    /// Start decaying from `offset` at `velocity` (px/ms). `origin_offset`
    /// is where the gesture that launched this run began.
    #[must_use]
    pub fn launch(offset: f64, velocity: f64, origin_offset: f64, now: Duration) -> Self {
        Self {
            offset,
            velocity: if velocity.is_finite() { velocity } else { 0.0 },
            origin_offset,
            last_step_at: now,
            frames: 0,
            exhausted: false,
        }
    }

    /// Current offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current velocity in px/ms.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Offset at which the launching gesture began.
    #[must_use]
    pub fn origin_offset(&self) -> f64 {
        self.origin_offset
    }

    /// Frames integrated so far.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Whether the run has decayed below the velocity threshold.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Integrate a single frame.
    ///
    /// Returns `false` once the run is exhausted.
    pub fn step(&mut self, bounds: TrackBounds, min_velocity: f64, cfg: &MomentumConfig) -> bool {
        if self.exhausted {
            return false;
        }
        if self.velocity.abs() < min_velocity || self.frames >= HARD_FRAME_LIMIT {
            self.exhausted = true;
            return false;
        }

        self.offset += self.velocity * cfg.frame_ms as f64;
        if !bounds.contains(self.offset) {
            self.velocity *= -cfg.bounce;
            self.offset = bounds.clamp(self.offset);
        }
        self.velocity *= cfg.friction;
        self.frames += 1;
        true
    }

    /// Integrate every whole frame elapsed up to `now`, capped at
    /// `max_catchup_frames`.
    pub fn advance_to(
        &mut self,
        now: Duration,
        bounds: TrackBounds,
        min_velocity: f64,
        cfg: &MomentumConfig,
    ) {
        let frame = cfg.frame();
        let mut budget = cfg.max_catchup_frames;
        while budget > 0 && now.saturating_sub(self.last_step_at) >= frame {
            self.last_step_at += frame;
            budget -= 1;
            if !self.step(bounds, min_velocity, cfg) {
                return;
            }
        }
        if budget == 0 {
            // Drop the backlog rather than replaying it next tick.
            self.last_step_at = now;
        }
    }

    /// Time the next frame falls due.
    #[must_use]
    pub fn next_frame_at(&self, cfg: &MomentumConfig) -> Duration {
        self.last_step_at + cfg.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: TrackBounds = TrackBounds {
        min: -960.0,
        max: 0.0,
    };

    #[test]
    fn decays_and_terminates() {
        let cfg = MomentumConfig::default();
        let mut m = Momentum::launch(-400.0, -2.0, -320.0, Duration::ZERO);
        let mut prev = m.velocity().abs();
        while m.step(BOUNDS, 0.8, &cfg) {
            assert!(m.velocity().abs() < prev);
            prev = m.velocity().abs();
        }
        assert!(m.is_exhausted());
        assert!(m.velocity().abs() < 0.8);
        assert!(m.frames() < 100);
    }

    #[test]
    fn bounces_off_start_bound() {
        let cfg = MomentumConfig::default();
        let mut m = Momentum::launch(-10.0, 3.0, -320.0, Duration::ZERO);
        assert!(m.step(BOUNDS, 0.8, &cfg));
        assert_eq!(m.offset(), 0.0);
        // 3.0 * -0.3 * 0.95
        assert!((m.velocity() + 0.855).abs() < 1e-9);
    }

    #[test]
    fn advance_consumes_whole_frames() {
        let cfg = MomentumConfig::default();
        let mut m = Momentum::launch(-400.0, -1.5, -320.0, Duration::ZERO);
        m.advance_to(Duration::from_millis(40), BOUNDS, 0.8, &cfg);
        assert_eq!(m.frames(), 2);
        assert_eq!(m.next_frame_at(&cfg), Duration::from_millis(48));
    }

    #[test]
    fn catchup_is_capped() {
        let cfg = MomentumConfig {
            max_catchup_frames: 3,
            friction: 0.999,
            ..MomentumConfig::default()
        };
        let mut m = Momentum::launch(-480.0, -0.9, -320.0, Duration::ZERO);
        m.advance_to(Duration::from_secs(10), BOUNDS, 0.8, &cfg);
        assert_eq!(m.frames(), 3);
        assert_eq!(m.next_frame_at(&cfg), Duration::from_secs(10) + cfg.frame());
    }

    #[test]
    fn nan_velocity_is_inert() {
        let cfg = MomentumConfig::default();
        let mut m = Momentum::launch(-100.0, f64::NAN, -100.0, Duration::ZERO);
        assert!(!m.step(BOUNDS, 0.8, &cfg));
        assert_eq!(m.offset(), -100.0);
    }
}
