#![forbid(unsafe_code)]

//! DOM events as the host forwards them, and the instructions sent back.
//!
//! The JSON encoding is a `kind` tag plus the minimum fields the binding
//! reads, so the JS side can forward events with a one-line mapping:
//!
//! ```json
//! {"kind":"mouse_down","x":412.0,"y":88.5,"button":0}
//! {"kind":"touch_move","x":300.0,"y":90.0}
//! {"kind":"click","target":"next"}
//! {"kind":"visibility","hidden":true}
//! ```

use serde::{Deserialize, Serialize};

/// Element a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// The slider surface (capture phase).
    Slider,
    /// Previous control.
    Prev,
    /// Next control.
    Next,
}

/// One forwarded DOM event. Coordinates are client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    /// `mousedown` on the slider.
    MouseDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
    },
    /// `mousemove` on the document.
    MouseMove { x: f64, y: f64 },
    /// `mouseup` on the document.
    MouseUp,
    /// `touchstart` on the slider (first touch point).
    TouchStart { x: f64, y: f64 },
    /// `touchmove` on the slider (first touch point).
    TouchMove { x: f64, y: f64 },
    /// `touchend` on the slider.
    TouchEnd,
    /// `touchcancel` on the slider.
    TouchCancel,
    /// `click` on the slider or a control.
    Click { target: ClickTarget },
    /// Native `dragstart` (image/link drag) on the slider.
    DragStart,
    /// `mouseenter` on the slider.
    PointerEnter,
    /// `mouseleave` on the slider.
    PointerLeave,
    /// Window `resize`.
    Resize,
    /// Document `visibilitychange`.
    Visibility { hidden: bool },
    /// `prefers-reduced-motion` media query change.
    ReducedMotion { reduce: bool },
}

impl HostEvent {
    /// Decode an event from its JSON form.
    ///
    /// Errors occur if the JSON does not match the expected schema.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Encode this event as JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the event concerns every slider on the page rather than one.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(
            self,
            Self::Resize | Self::Visibility { .. } | Self::ReducedMotion { .. }
        )
    }
}

/// What the host must do with the native event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Call `preventDefault()`.
    pub prevent_default: bool,
    /// Call `stopPropagation()`.
    pub stop_propagation: bool,
}

impl Dispatch {
    /// Prevent default only.
    #[must_use]
    pub const fn prevent() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: false,
        }
    }

    /// Prevent default and stop propagation.
    #[must_use]
    pub const fn swallow() -> Self {
        Self {
            prevent_default: true,
            stop_propagation: true,
        }
    }

    /// Pack into bits for the JS bridge: `1` prevent, `2` stop.
    #[must_use]
    pub const fn bits(&self) -> u8 {
        (self.prevent_default as u8) | ((self.stop_propagation as u8) << 1)
    }
}
