#![forbid(unsafe_code)]

//! Track measurement: how many cards fit and how far the strip may scroll.
//!
//! # Invariants
//!
//! 1. `visible_count >= 1`.
//! 2. `max_index == card_count.saturating_sub(visible_count)`.
//! 3. `offset_for(i)` is exactly `-(i * step)` for every `i`, so a settled
//!    strip sits on a card boundary with no residual drift.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | zero cards | measurable; `max_index = 0`, navigation becomes a no-op |
//! | card or container width zero / NaN | [`MeasureError`], caller stays dormant |
//! | gap missing, NaN, or negative | host fallback gap |

use std::fmt;

/// Raw numbers read from the host layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSample {
    /// Visible width of the viewport element.
    pub container_width: f64,
    /// Rendered width of the first card.
    pub card_width: f64,
    /// Inter-card gap, if the host could read one.
    pub gap: Option<f64>,
    /// Number of cards on the track.
    pub card_count: usize,
}

impl LayoutSample {
    /// Convenience constructor with an explicit gap.
    #[must_use]
    pub const fn new(container_width: f64, card_width: f64, gap: f64, card_count: usize) -> Self {
        Self {
            container_width,
            card_width,
            gap: Some(gap),
            card_count,
        }
    }
}

/// Layout read that cannot be used yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureError {
    /// The viewport has no usable width (hidden, detached, or NaN).
    ContainerWidth(f64),
    /// The first card has no usable width.
    CardWidth(f64),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerWidth(w) => write!(f, "container not measurable (width {w})"),
            Self::CardWidth(w) => write!(f, "card not measurable (width {w})"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Scroll range of the strip, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    /// Most negative resting offset (last page).
    pub min: f64,
    /// Resting offset of the first card.
    pub max: f64,
}

impl TrackBounds {
    /// Whether `offset` lies inside the bounds.
    #[must_use]
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.min && offset <= self.max
    }

    /// Clamp `offset` into the bounds.
    #[must_use]
    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(self.min, self.max)
    }
}

/// Measured geometry of one carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMetrics {
    /// Card width in pixels (0 with no cards).
    pub card_width: f64,
    /// Gap between cards in pixels.
    pub gap: f64,
    /// Number of cards.
    pub card_count: usize,
    /// Cards that fit the viewport at once (at least 1).
    pub visible_count: usize,
    /// Largest index the strip can rest on.
    pub max_index: usize,
}

impl TrackMetrics {
    /// Distance between consecutive card boundaries.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.card_width + self.gap
    }

    /// Resting offset of `index`.
    #[must_use]
    pub fn offset_for(&self, index: usize) -> f64 {
        -(index as f64 * self.step())
    }

    /// Offset bounds of the strip.
    #[must_use]
    pub fn bounds(&self) -> TrackBounds {
        TrackBounds {
            min: self.offset_for(self.max_index),
            max: 0.0,
        }
    }

    /// Clamp a signed index into `[0, max_index]`.
    #[must_use]
    pub fn clamp_index(&self, index: i64) -> usize {
        if index <= 0 {
            0
        } else {
            usize::try_from(index).map_or(self.max_index, |i| i.min(self.max_index))
        }
    }

    /// Whether there is anything to navigate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_count == 0
    }
}

fn usable_width(w: f64) -> bool {
    w.is_finite() && w > 0.0
}

/// Compute track metrics from a layout sample.
pub fn measure(sample: LayoutSample, fallback_gap: f64) -> Result<TrackMetrics, MeasureError> {
    let gap = match sample.gap {
        Some(g) if g.is_finite() && g >= 0.0 => g,
        _ => fallback_gap,
    };

    if sample.card_count == 0 {
        return Ok(TrackMetrics {
            card_width: 0.0,
            gap,
            card_count: 0,
            visible_count: 1,
            max_index: 0,
        });
    }
    if !usable_width(sample.container_width) {
        return Err(MeasureError::ContainerWidth(sample.container_width));
    }
    if !usable_width(sample.card_width) {
        return Err(MeasureError::CardWidth(sample.card_width));
    }

    let fit = ((sample.container_width + gap) / (sample.card_width + gap)).floor();
    // `fit` is finite and non-negative here; the cast saturates on absurd inputs.
    let visible_count = (fit as usize).max(1);
    Ok(TrackMetrics {
        card_width: sample.card_width,
        gap,
        card_count: sample.card_count,
        visible_count,
        max_index: sample.card_count.saturating_sub(visible_count),
    })
}
