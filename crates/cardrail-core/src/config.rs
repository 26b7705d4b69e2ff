#![forbid(unsafe_code)]

//! Tunables for the carousel controller.
//!
//! Every threshold the controller uses lives here with its hand-tuned
//! default. Time values are stored as milliseconds (`*_ms: u64`) so the
//! structs round-trip through JSON host options without a custom duration
//! format; use the accessor methods to get [`Duration`]s.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `friction` outside `(0, 1)` | [`ConfigError::OutOfRange`] |
//! | `frame_ms = 0` or `interval_ms = 0` | [`ConfigError::Zero`] |
//! | negative or non-finite threshold | [`ConfigError::OutOfRange`] |

use std::fmt;
use std::time::Duration;

use crate::animation::Easing;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be non-zero was zero.
    Zero(&'static str),
    /// A value fell outside its physical range.
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero(field) => write!(f, "{field} must be non-zero"),
            Self::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn unit_open(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn unit_closed(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

// ---------------------------------------------------------------------------
// Release policy
// ---------------------------------------------------------------------------

/// How a horizontal gesture picks its resting index on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReleasePolicy {
    /// Commit at most one card in the direction of motion, or snap back.
    #[default]
    Adjacent,
    /// Snap to whichever card boundary is nearest the released offset.
    Nearest,
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// Thresholds for axis locking, dead zone, resistance, and commit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Displacement (px) one axis must exceed before the gesture locks.
    pub lock_threshold_px: f64,
    /// Margin (px) the winning axis must lead the other by.
    pub lock_bias_px: f64,
    /// Horizontal displacement (px) below which movement is compressed.
    pub dead_zone_px: f64,
    /// Power applied to the normalized dead-zone displacement.
    pub dead_zone_exponent: f64,
    /// Fraction of the dead zone reached at its edge.
    pub dead_zone_scale: f64,
    /// Factor applied to displacement beyond the track bounds.
    pub elastic_resistance: f64,
    /// Minimum displacement (px) that commits to the adjacent card.
    pub commit_min_px: f64,
    /// Fraction of the card width that commits to the adjacent card.
    pub commit_ratio: f64,
    /// Weight of the previous velocity in the exponential smoother.
    pub velocity_smoothing: f64,
    /// Velocity (px/ms) above which release commits and momentum runs.
    pub min_velocity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            lock_threshold_px: 12.0,
            lock_bias_px: 6.0,
            dead_zone_px: 18.0,
            dead_zone_exponent: 2.0,
            dead_zone_scale: 0.35,
            elastic_resistance: 0.3,
            commit_min_px: 60.0,
            commit_ratio: 0.25,
            velocity_smoothing: 0.8,
            min_velocity: 0.8,
        }
    }
}

impl GestureConfig {
    /// Commit distance for a given card width: `max(commit_min, width * ratio)`.
    #[must_use]
    pub fn commit_threshold(&self, card_width: f64) -> f64 {
        self.commit_min_px.max(card_width * self.commit_ratio)
    }

    /// Set the axis lock threshold and hysteresis margin.
    #[must_use]
    pub fn with_lock(mut self, threshold_px: f64, bias_px: f64) -> Self {
        self.lock_threshold_px = threshold_px;
        self.lock_bias_px = bias_px;
        self
    }

    /// Set the commit rule.
    #[must_use]
    pub fn with_commit(mut self, min_px: f64, ratio: f64) -> Self {
        self.commit_min_px = min_px;
        self.commit_ratio = ratio;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("gesture.lock_threshold_px", self.lock_threshold_px)?;
        non_negative("gesture.lock_bias_px", self.lock_bias_px)?;
        non_negative("gesture.dead_zone_px", self.dead_zone_px)?;
        non_negative("gesture.dead_zone_exponent", self.dead_zone_exponent)?;
        unit_closed("gesture.dead_zone_scale", self.dead_zone_scale)?;
        unit_closed("gesture.elastic_resistance", self.elastic_resistance)?;
        non_negative("gesture.commit_min_px", self.commit_min_px)?;
        non_negative("gesture.commit_ratio", self.commit_ratio)?;
        unit_closed("gesture.velocity_smoothing", self.velocity_smoothing)?;
        positive("gesture.min_velocity", self.min_velocity)
    }
}

// ---------------------------------------------------------------------------
// Momentum
// ---------------------------------------------------------------------------

/// Free-decay integrator settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MomentumConfig {
    /// Multiplicative velocity decay per frame, in `(0, 1)`.
    pub friction: f64,
    /// Fraction of velocity kept (and reversed) when hitting a bound.
    pub bounce: f64,
    /// Fixed integration step.
    pub frame_ms: u64,
    /// Upper bound on steps run by one host tick.
    pub max_catchup_frames: u32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            friction: 0.95,
            bounce: 0.3,
            frame_ms: 16,
            max_catchup_frames: 120,
        }
    }
}

impl MomentumConfig {
    /// Integration step as a [`Duration`].
    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        unit_open("momentum.friction", self.friction)?;
        unit_closed("momentum.bounce", self.bounce)?;
        if self.frame_ms == 0 {
            return Err(ConfigError::Zero("momentum.frame_ms"));
        }
        if self.max_catchup_frames == 0 {
            return Err(ConfigError::Zero("momentum.max_catchup_frames"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Auto-advance
// ---------------------------------------------------------------------------

/// Auto-advance timer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AutoAdvanceConfig {
    /// Whether the timer runs at all.
    pub enabled: bool,
    /// Period between advances.
    pub interval_ms: u64,
    /// Quiet period after an interaction before the timer restarts.
    pub resume_delay_ms: u64,
    /// Quiet period after the page becomes visible again.
    pub visibility_resume_delay_ms: u64,
}

impl Default for AutoAdvanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 4200,
            resume_delay_ms: 6200,
            visibility_resume_delay_ms: 1800,
        }
    }
}

impl AutoAdvanceConfig {
    /// Disabled auto-advance.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Period as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Interaction resume delay as a [`Duration`].
    #[must_use]
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    /// Visibility resume delay as a [`Duration`].
    #[must_use]
    pub fn visibility_resume_delay(&self) -> Duration {
        Duration::from_millis(self.visibility_resume_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.interval_ms == 0 {
            return Err(ConfigError::Zero("auto_advance.interval_ms"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CarouselConfig
// ---------------------------------------------------------------------------

/// Full controller configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselConfig {
    /// Gesture thresholds.
    pub gesture: GestureConfig,
    /// Momentum integrator.
    pub momentum: MomentumConfig,
    /// Auto-advance timer.
    pub auto_advance: AutoAdvanceConfig,
    /// Release resolution.
    pub release: ReleasePolicy,
    /// Duration of the ease-out settle animation.
    pub settle_ms: u64,
    /// Curve of the settle animation.
    pub settle_easing: Easing,
    /// Quiet period that ends a resize burst.
    pub resize_debounce_ms: u64,
    /// Optional cap on how long a continuous resize burst may defer relayout.
    pub resize_hard_deadline_ms: Option<u64>,
    /// Gap (px) used when the host cannot read one.
    pub fallback_gap_px: f64,
    /// Pause auto-advance while the pointer hovers the slider.
    pub pause_on_hover: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            momentum: MomentumConfig::default(),
            auto_advance: AutoAdvanceConfig::default(),
            release: ReleasePolicy::Adjacent,
            settle_ms: 600,
            settle_easing: Easing::default(),
            resize_debounce_ms: 200,
            resize_hard_deadline_ms: None,
            fallback_gap_px: 24.0,
            pause_on_hover: false,
        }
    }
}

impl CarouselConfig {
    /// Snap-to-nearest release, as the older single-section slider behaved.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            release: ReleasePolicy::Nearest,
            ..Self::default()
        }
    }

    /// Replace the gesture thresholds.
    #[must_use]
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Replace the auto-advance settings.
    #[must_use]
    pub fn with_auto_advance(mut self, auto_advance: AutoAdvanceConfig) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// Set the release policy.
    #[must_use]
    pub fn with_release(mut self, release: ReleasePolicy) -> Self {
        self.release = release;
        self
    }

    /// Pause auto-advance on hover.
    #[must_use]
    pub fn with_pause_on_hover(mut self, enabled: bool) -> Self {
        self.pause_on_hover = enabled;
        self
    }

    /// Set the settle curve.
    #[must_use]
    pub fn with_settle_easing(mut self, easing: Easing) -> Self {
        self.settle_easing = easing;
        self
    }

    /// Settle animation length.
    #[must_use]
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Resize quiet period.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Check every tunable against its physical range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        self.momentum.validate()?;
        self.auto_advance.validate()?;
        non_negative("fallback_gap_px", self.fallback_gap_px)
    }
}
