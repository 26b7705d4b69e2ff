#![forbid(unsafe_code)]

//! Easing curves and the offset tween used for settle animations.
//!
//! Time is accumulated as [`Duration`] (no floating-point drift), positions
//! are `f64` pixels. A finished [`Tween`] reports its `to` value bit-for-bit,
//! which is what lets a settled carousel land exactly on a card boundary.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` timing curve.
///
/// Endpoints are fixed at (0, 0) and (1, 1). `x1`/`x2` are clamped to
/// `[0, 1]` so the curve stays a function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Build a curve from its two control points.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// The quad ease-out the settle transition has always used.
    #[must_use]
    pub fn ease_out_quad() -> Self {
        Self::new(0.25, 0.46, 0.45, 0.94)
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn slope(a1: f64, a2: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Parameter `t` whose x-coordinate is `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-7 {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Newton stalled on a flat segment; bisect.
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let v = Self::sample(self.x1, self.x2, t);
            if (v - x).abs() < 1e-7 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in `[0, 1]`.
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

/// Easing curve selector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Quadratic ease-out.
    EaseOut,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Arbitrary CSS-style cubic Bézier.
    Bezier(CubicBezier),
}

impl Default for Easing {
    fn default() -> Self {
        Self::Bezier(CubicBezier::ease_out_quad())
    }
}

impl Easing {
    /// Map linear progress to eased progress.
    #[must_use]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Linear => linear(t),
            Self::EaseOut => ease_out(t),
            Self::EaseOutCubic => ease_out_cubic(t),
            Self::Bezier(curve) => curve.apply(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation driven by host time deltas.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates a pixel offset between `from` and `to` over a duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween with the default settle easing.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: Easing::default(),
        }
    }

    /// Set the easing curve (builder).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Destination offset.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    fn progress(&self) -> f64 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Current offset. Exactly `to` once complete.
    #[must_use]
    pub fn position(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}
