#![forbid(unsafe_code)]

//! Input events the host feeds the controller, and notifications it emits.
//!
//! Inputs are canonical: the host converts mouse and touch DOM events into
//! [`PointerEvent`]s with a single coordinate pair and a monotonic timestamp.
//! Outputs are queued [`CarouselEvent`]s drained by the host after each call,
//! in the order the transitions happened.

use std::time::Duration;

use crate::gesture::Sample;

/// Mouse button reported with a mouse pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary (usually left) button.
    Primary,
    /// Middle button or wheel press.
    Auxiliary,
    /// Secondary (usually right) button.
    Secondary,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            _ => Self::Secondary,
        }
    }
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse, with the button involved.
    Mouse(MouseButton),
    /// Touch contact (first touch point).
    Touch,
}

/// A pointer down or move in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Device kind.
    pub kind: PointerKind,
    /// Horizontal client coordinate.
    pub x: f64,
    /// Vertical client coordinate.
    pub y: f64,
    /// Host monotonic time.
    pub time: Duration,
}

impl PointerEvent {
    /// Primary-button mouse event.
    #[must_use]
    pub const fn mouse(x: f64, y: f64, time: Duration) -> Self {
        Self {
            kind: PointerKind::Mouse(MouseButton::Primary),
            x,
            y,
            time,
        }
    }

    /// Touch event.
    #[must_use]
    pub const fn touch(x: f64, y: f64, time: Duration) -> Self {
        Self {
            kind: PointerKind::Touch,
            x,
            y,
            time,
        }
    }

    /// Whether this event may start a drag.
    #[must_use]
    pub fn can_start_drag(&self) -> bool {
        !matches!(
            self.kind,
            PointerKind::Mouse(MouseButton::Auxiliary | MouseButton::Secondary)
        )
    }

    pub(crate) fn sample(&self) -> Sample {
        Sample::new(self.x, self.y, self.time)
    }
}

/// Host instruction for a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveResponse {
    /// Call `preventDefault` on the native event. Only ever set while the
    /// controller owns a horizontal gesture.
    pub prevent_default: bool,
}

/// Host instruction for a click on the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Let the click through.
    Pass,
    /// Swallow it: it terminates a drag.
    Suppress,
}

/// Why the current index changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// Programmatic `go_to` / `advance` / `retreat`.
    Navigate,
    /// Previous/next control.
    Control,
    /// Auto-advance timer.
    Auto,
    /// Released gesture or momentum.
    Gesture,
    /// Re-clamp after a layout change.
    Relayout,
}

/// Transition notifications, drained via
/// [`Carousel::drain_events`](crate::carousel::Carousel::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    /// First successful measurement; the controller is live.
    Activated {
        /// Largest valid index.
        max_index: usize,
    },
    /// Layout was re-measured.
    Relayout {
        /// Largest valid index after the change.
        max_index: usize,
    },
    /// The current index changed.
    IndexChanged {
        /// Previous index.
        from: usize,
        /// New index.
        to: usize,
        /// Trigger.
        cause: ChangeCause,
    },
    /// A gesture locked onto the horizontal axis.
    DragLocked,
    /// A gesture locked vertical and was handed back to the page.
    DragAbandoned,
    /// A release entered momentum decay.
    MomentumStarted {
        /// Launch velocity in px/ms.
        velocity: f64,
    },
    /// The strip came to rest on a card boundary.
    Settled {
        /// Resting index.
        index: usize,
    },
    /// Auto-advance stopped.
    AutoPaused,
    /// Auto-advance restarted after a quiet period.
    AutoResumed,
    /// The controller released all resources.
    Detached,
}
