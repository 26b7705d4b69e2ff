#![forbid(unsafe_code)]

//! cardrail public facade crate.
//!
//! Re-exports the headless controller from `cardrail-core` and, with the
//! default `web` feature, the DOM binding layer from `cardrail-web`, plus a
//! unified [`Error`] and a prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use cardrail_core::carousel::{
    Carousel, CarouselState, MotionPolicy, Presentation, SurfaceFlags, TickResult,
};
pub use cardrail_core::config::{
    AutoAdvanceConfig, CarouselConfig, ConfigError, GestureConfig, MomentumConfig, ReleasePolicy,
};
pub use cardrail_core::event::{
    CarouselEvent, ChangeCause, ClickDisposition, MouseButton, MoveResponse, PointerEvent,
    PointerKind,
};
pub use cardrail_core::layout::{LayoutSample, MeasureError, TrackMetrics};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use cardrail_web::{
    AttachError, AttachOptions, ClickTarget, DeterministicClock, Dispatch, HostEvent, MemoryDom,
    NodeId, SliderBinding, SliderDom, SliderRegistry, SliderSelectors,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for cardrail hosts.
#[derive(Debug)]
pub enum Error {
    /// Tunables out of range.
    Config(ConfigError),
    /// Layout not measurable.
    Measure(MeasureError),
    /// Slider markup incomplete.
    #[cfg(feature = "web")]
    Attach(AttachError),
    /// Malformed event or options JSON.
    #[cfg(feature = "web")]
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Measure(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Attach(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Json(err) => write!(f, "invalid json: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Measure(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Attach(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<MeasureError> for Error {
    fn from(err: MeasureError) -> Self {
        Self::Measure(err)
    }
}

#[cfg(feature = "web")]
impl From<AttachError> for Error {
    fn from(err: AttachError) -> Self {
        Self::Attach(err)
    }
}

#[cfg(feature = "web")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Standard result type for cardrail APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Helpers --------------------------------------------------------------

/// Attach the slider under `root` with options given as JSON.
#[cfg(feature = "web")]
pub fn attach_json<D: SliderDom>(
    dom: &mut D,
    root: &D::Node,
    options_json: &str,
    now: std::time::Duration,
) -> Result<SliderBinding<D::Node>> {
    let options = AttachOptions::from_json_str(options_json)?;
    Ok(cardrail_web::attach(dom, root, &options, now)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Carousel, CarouselConfig, CarouselEvent, CarouselState, ChangeCause, Error, LayoutSample,
        MotionPolicy, PointerEvent, Presentation, Result,
    };

    #[cfg(feature = "web")]
    pub use crate::{AttachOptions, Dispatch, HostEvent, SliderBinding, SliderDom, SliderRegistry};

    pub use crate::core;
    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use cardrail_core as core;
#[cfg(feature = "web")]
pub use cardrail_web as web;
