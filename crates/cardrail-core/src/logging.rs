#![forbid(unsafe_code)]

//! Logging support.
//!
//! With the `tracing` feature the carousel's lifecycle transitions (activation,
//! relayout, momentum, settle, auto-advance pause/resume, detach) are emitted
//! through `tracing`. Without it every macro expands to nothing, so a
//! `wasm32` build that never installs a subscriber pays nothing.
//!
//! Call sites inside the crate use the `crate::debug!` form so both
//! configurations resolve to the same path.
//!
//! Only the levels the controller actually emits are provided: `debug` for
//! state transitions, `trace` for per-sample gesture detail, and `warn` for
//! rejected host input.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op `debug!` when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op `trace!` when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op `warn!` when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
