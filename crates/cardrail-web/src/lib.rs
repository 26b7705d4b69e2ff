#![forbid(unsafe_code)]

//! `cardrail-web` binds the headless [`cardrail_core`] controller to a
//! DOM-like element tree.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) forwards DOM events
//!   as [`HostEvent`]s and drives frames with its own clock.
//! - **Deterministic time**: every entry point takes the host's monotonic
//!   time; [`DeterministicClock`] stands in for it in headless hosts.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The DOM boundary is the [`SliderDom`] trait. [`MemoryDom`] implements it
//! in memory for tests and headless use; on `wasm32` the `wasm` module
//! implements it over `web-sys` and exports the `CardRail` class.

pub mod binding;
pub mod dom;
pub mod event;
pub mod memory_dom;
pub mod registry;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::CardRail;

use core::time::Duration;

pub use binding::{AttachError, AttachOptions, SliderBinding, SliderSelectors, attach};
pub use dom::SliderDom;
pub use event::{ClickTarget, Dispatch, HostEvent};
pub use memory_dom::{MemoryDom, NodeId};
pub use registry::SliderRegistry;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Set current monotonic time from a JS `performance.now()` reading.
    pub fn set_ms(&mut self, now_ms: f64) {
        if now_ms.is_finite() && now_ms >= 0.0 {
            // Microsecond resolution; the cast saturates on absurd readings.
            self.set(Duration::from_micros((now_ms * 1000.0).round() as u64));
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}
