#![forbid(unsafe_code)]

//! Core: headless carousel state machine, gesture physics, and scheduling.
//!
//! Nothing in this crate touches a clock or a DOM. The host supplies
//! monotonic time as a [`Duration`](std::time::Duration) and layout reads as
//! a [`layout::LayoutSample`]; the controller answers with a
//! [`carousel::Presentation`] and a queue of [`event::CarouselEvent`]s.

pub mod animation;
pub mod carousel;
pub mod config;
pub mod event;
pub mod gesture;
pub mod layout;
pub mod logging;
pub mod momentum;
pub mod resize;
pub mod schedule;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
